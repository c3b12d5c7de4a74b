//! Flight resolution: live provider first, static fallback second.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::FailurePolicy;
use crate::fallback::FallbackDataset;
use crate::models::Flight;
use crate::provider::{FlightProvider, ProviderError};
use crate::util::compact_text;

pub const NOT_FOUND_MESSAGE: &str = "Flight not found. Please check the flight number.";
pub const CONNECT_FAILED_MESSAGE: &str = "Couldn't connect to flight data. Please try again.";

/// Result of resolving a normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// At least one matching flight. The first entry is the one to display.
    Found(Vec<Flight>),
    /// Neither the provider nor the fallback dataset knows the flight.
    NotFound,
    /// The provider could not be reached and nothing else matched.
    ResolutionFailed(String),
}

impl ResolutionOutcome {
    /// The flight a presentation layer should display, if any.
    pub fn primary(&self) -> Option<&Flight> {
        match self {
            Self::Found(flights) => flights.first(),
            Self::NotFound | Self::ResolutionFailed(_) => None,
        }
    }

    /// All resolved flights; empty for every non-`Found` outcome.
    pub fn flights(&self) -> &[Flight] {
        match self {
            Self::Found(flights) => flights,
            Self::NotFound | Self::ResolutionFailed(_) => &[],
        }
    }

    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// User-facing explanation for an absent flight.
    ///
    /// Provider error details never leak into this text.
    pub const fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Found(_) => None,
            Self::NotFound => Some(NOT_FOUND_MESSAGE),
            Self::ResolutionFailed(_) => Some(CONNECT_FAILED_MESSAGE),
        }
    }
}

/// Where a `Found` outcome came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Live,
    Fallback,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// Turns normalized queries into [`ResolutionOutcome`]s.
///
/// The live provider is optional; without one every query goes straight to
/// the fallback dataset.
#[derive(Debug, Clone)]
pub struct FlightResolver<P> {
    provider: Option<P>,
    fallback: FallbackDataset,
    policy: FailurePolicy,
}

impl<P: FlightProvider> FlightResolver<P> {
    pub fn new(provider: Option<P>, fallback: FallbackDataset) -> Self {
        Self {
            provider,
            fallback,
            policy: FailurePolicy::MaskFailures,
        }
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn has_live_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub const fn fallback(&self) -> &FallbackDataset {
        &self.fallback
    }

    /// Resolve an already-normalized query.
    ///
    /// Provider failures are logged and absorbed; they only influence the
    /// outcome when the failure policy asks for them to be reported and the
    /// fallback dataset has no match.
    pub async fn resolve(&self, normalized_query: &str) -> ResolutionOutcome {
        let mut provider_failure = None;

        if let Some(provider) = &self.provider {
            match provider.fetch_flights(normalized_query).await {
                Ok(records) if !records.is_empty() => {
                    let flights = records
                        .into_iter()
                        .map(crate::provider::RawFlightRecord::into_flight)
                        .collect::<Vec<_>>();
                    log_found(normalized_query, Source::Live, flights.len());
                    return ResolutionOutcome::Found(flights);
                }
                Ok(_) => {
                    debug!(query = normalized_query, "Live provider returned no flights");
                }
                Err(error) => {
                    warn!(
                        query = normalized_query,
                        error = %compact_text(&error.to_string()),
                        "Live provider lookup failed, using fallback data"
                    );
                    provider_failure = Some(error);
                }
            }
        }

        if let Some(flight) = self.fallback.lookup(normalized_query) {
            log_found(normalized_query, Source::Fallback, 1);
            return ResolutionOutcome::Found(vec![flight.clone()]);
        }

        match (self.policy, provider_failure) {
            (FailurePolicy::ReportFailures, Some(error)) => {
                ResolutionOutcome::ResolutionFailed(failure_reason(&error))
            }
            _ => {
                info!(query = normalized_query, "Flight not found");
                ResolutionOutcome::NotFound
            }
        }
    }
}

fn log_found(query: &str, source: Source, count: usize) {
    info!(query, source = %source, count, "Resolved flight");
}

fn failure_reason(error: &ProviderError) -> String {
    match error {
        ProviderError::Http(_) => "provider unreachable".to_string(),
        ProviderError::Status { status, .. } => format!("provider returned HTTP {status}"),
        ProviderError::Api(message) => format!("provider error: {}", compact_text(message)),
        ProviderError::InvalidPayload(_) => "provider returned an unreadable response".to_string(),
        ProviderError::InvalidConfiguration(message) => {
            format!("provider misconfigured: {message}")
        }
    }
}
