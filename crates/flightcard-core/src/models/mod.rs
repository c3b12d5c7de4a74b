//! Data models for Flightcard

mod flight;
mod settings;

pub use flight::{Flight, FlightStatus};
pub use settings::{Settings, SettingsStore, ThemeMode};
