use std::path::Path;

use flightcard_core::models::{SettingsStore, ThemeMode};
use flightcard_core::Settings;

use crate::cli::{SettingsCommands, ThemeArg};
use crate::commands::common::terminal_prefers_dark;
use crate::error::CliError;
use crate::settings_store::{default_settings_path, JsonFileSettingsStore};

pub fn run_settings(command: SettingsCommands, path: Option<&Path>) -> Result<(), CliError> {
    let store = settings_store(path)?;
    match command {
        SettingsCommands::Show { json } => {
            let settings = store.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                for line in format_settings_lines(&settings) {
                    println!("{line}");
                }
            }
        }
        SettingsCommands::Set { theme, alerts } => {
            let current = store.load()?;
            let updated = apply_settings_change(current, theme, alerts)?;
            save_and_print(&store, &updated)?;
        }
        SettingsCommands::ToggleTheme => {
            let updated = toggle_theme(store.load()?, terminal_prefers_dark());
            save_and_print(&store, &updated)?;
        }
    }
    Ok(())
}

fn save_and_print(store: &JsonFileSettingsStore, settings: &Settings) -> Result<(), CliError> {
    store.save(settings)?;
    tracing::info!(path = %store.path().display(), "Saved settings");
    for line in format_settings_lines(settings) {
        println!("{line}");
    }
    Ok(())
}

/// Flip to the explicit opposite of what is shown now; `System` resolves
/// through the terminal background first.
pub fn toggle_theme(mut settings: Settings, terminal_prefers_dark: bool) -> Settings {
    settings.theme = settings.theme.toggled(terminal_prefers_dark);
    settings
}

pub fn settings_store(path: Option<&Path>) -> Result<JsonFileSettingsStore, CliError> {
    path.map(Path::to_path_buf)
        .or_else(default_settings_path)
        .map(JsonFileSettingsStore::new)
        .ok_or_else(|| CliError::Settings("Could not determine a config directory".to_string()))
}

/// Settings for a session; a missing or unreadable file falls back to defaults.
pub fn load_settings_or_default(path: Option<&Path>) -> Settings {
    let loaded = settings_store(path).and_then(|store| store.load().map_err(CliError::from));
    match loaded {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(%error, "Using default settings");
            Settings::default()
        }
    }
}

pub fn apply_settings_change(
    mut settings: Settings,
    theme: Option<ThemeArg>,
    alerts: Option<bool>,
) -> Result<Settings, CliError> {
    if theme.is_none() && alerts.is_none() {
        return Err(CliError::NoSettingsChange);
    }
    if let Some(theme) = theme {
        settings.theme = theme.into();
    }
    if let Some(alerts) = alerts {
        settings.alerts_enabled = alerts;
    }
    Ok(settings)
}

pub fn format_settings_lines(settings: &Settings) -> Vec<String> {
    vec![
        format!("theme:  {}", theme_label(settings.theme)),
        format!(
            "alerts: {}",
            if settings.alerts_enabled { "on" } else { "off" }
        ),
    ]
}

const fn theme_label(theme: ThemeMode) -> &'static str {
    match theme {
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
        ThemeMode::System => "system",
    }
}

impl From<ThemeArg> for ThemeMode {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::System => Self::System,
        }
    }
}
