//! Application settings model

use serde::{Deserialize, Serialize};

use crate::Result;

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow system preference
    #[default]
    System,
}

impl ThemeMode {
    /// Whether the dark palette should be used.
    ///
    /// An explicit choice wins; `System` defers to the platform preference.
    pub const fn is_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::System => system_prefers_dark,
        }
    }

    /// The opposite explicit mode of whatever is currently displayed.
    pub const fn toggled(self, system_prefers_dark: bool) -> Self {
        if self.is_dark(system_prefers_dark) {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

/// Per-user presentation settings.
///
/// Passed into a session at start-up instead of being read from ambient
/// storage; persistence goes through a [`SettingsStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Theme mode
    #[serde(default)]
    pub theme: ThemeMode,
    /// Whether status-change alerts are enabled for tracked flights
    #[serde(default)]
    pub alerts_enabled: bool,
}

/// Explicit read/write interface for [`Settings`].
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}
