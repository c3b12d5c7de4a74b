//! Settings persisted as JSON in the user config directory.

use std::path::{Path, PathBuf};

use flightcard_core::models::SettingsStore;
use flightcard_core::{Error, Settings};

const SETTINGS_FILE_NAME: &str = "settings.json";

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flightcard").join(SETTINGS_FILE_NAME))
}

#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileSettingsStore {
    /// Missing files yield defaults.
    fn load(&self) -> flightcard_core::Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|error| {
            Error::Settings(format!(
                "Failed to read settings at {}: {}",
                self.path.display(),
                error
            ))
        })?;
        serde_json::from_str::<Settings>(&raw).map_err(|error| {
            Error::Settings(format!(
                "Failed to parse settings at {}: {}",
                self.path.display(),
                error
            ))
        })
    }

    fn save(&self, settings: &Settings) -> flightcard_core::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                Error::Settings(format!(
                    "Failed to create settings directory {}: {}",
                    parent.display(),
                    error
                ))
            })?;
        }

        let serialized = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, serialized).map_err(|error| {
            Error::Settings(format!(
                "Failed to write settings at {}: {}",
                self.path.display(),
                error
            ))
        })
    }
}
