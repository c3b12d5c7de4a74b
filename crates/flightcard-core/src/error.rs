//! Error types for flightcard-core

use thiserror::Error;

/// Result type alias using flightcard-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in flightcard-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Environment or file configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Live provider client could not be constructed
    #[error("Provider error: {0}")]
    Provider(#[from] crate::provider::ProviderError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Settings could not be loaded or stored
    #[error("Settings error: {0}")]
    Settings(String),
}
