//! Flightcard CLI - flight status cards in the terminal
//!
//! Type a flight number, get a card.

mod cli;
mod commands;
mod error;
mod settings_store;

#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};
use crate::commands::completions::run_completions;
use crate::commands::lookup::run_lookup;
use crate::commands::settings::{load_settings_or_default, run_settings};
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flightcard=info".parse().expect("Invalid directive")),
        )
        .init();

    let cli = Cli::parse();
    let settings_path = cli.settings_path.as_deref();

    match cli.command {
        Some(Commands::Lookup { query, json, all }) => {
            let settings = load_settings_or_default(settings_path);
            run_lookup(&query, json, all, &settings).await?;
        }
        Some(Commands::Watch { query }) => {
            let settings = load_settings_or_default(settings_path);
            run_watch(&query, settings).await?;
        }
        Some(Commands::Settings { command }) => run_settings(command, settings_path)?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            // Quick lookup: flightcard aa100
            if cli.query.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                let settings = load_settings_or_default(settings_path);
                run_lookup(&cli.query, false, false, &settings).await?;
            }
        }
    }

    Ok(())
}
