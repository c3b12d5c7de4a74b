use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] flightcard_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Flight number cannot be empty")]
    EmptyQuery,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    ResolutionFailed(&'static str),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error("Nothing to update. Pass --theme and/or --alerts.")]
    NoSettingsChange,
}
