use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "flightcard")]
#[command(about = "Look up live flight status from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to the settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub settings_path: Option<PathBuf>,

    /// Quick lookup: flightcard aa100
    #[arg(trailing_var_arg = true)]
    pub query: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a flight once and print its status card
    #[command(alias = "status")]
    Lookup {
        /// Flight number, e.g. AA100
        query: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Show every matching flight instead of only the first
        #[arg(long)]
        all: bool,
    },
    /// Keep a flight card on screen and refresh it when it goes stale
    Watch {
        /// Flight number, e.g. AA100
        query: Vec<String>,
    },
    /// Show or change presentation settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update one or more settings
    Set {
        /// Theme mode
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        /// Enable or disable status-change alerts
        #[arg(long, value_name = "BOOL")]
        alerts: Option<bool>,
    },
    /// Switch to the opposite of the theme currently in effect
    ToggleTheme,
}
