//! flightcard-core - Core library for Flightcard
//!
//! This crate resolves flight numbers against a live provider with a static
//! fallback, and derives everything a status card shows from the resolved
//! record. Shared by the CLI and the HTTP API.

pub mod config;
pub mod derive;
pub mod error;
pub mod fallback;
pub mod models;
pub mod provider;
pub mod query;
pub mod refresh;
pub mod resolver;
pub mod session;
pub mod util;

pub use error::{Error, Result};
pub use models::{Flight, FlightStatus, Settings};
pub use resolver::{FlightResolver, ResolutionOutcome};
pub use session::FlightSession;

use config::AppConfig;
use fallback::FallbackDataset;
use provider::AviationStackClient;

/// Resolver wired from configuration: AviationStack when a key is set, the
/// built-in sample flights anchored at the current time as fallback.
pub fn build_resolver(config: &AppConfig) -> Result<FlightResolver<AviationStackClient>> {
    let provider = AviationStackClient::from_config(&config.provider)?;
    if provider.is_none() {
        tracing::info!("No AviationStack key configured, serving fallback flights only");
    }
    Ok(
        FlightResolver::new(provider, FallbackDataset::anchored_at(chrono::Utc::now()))
            .with_failure_policy(config.failure_policy),
    )
}
