//! Live flight data providers.
//!
//! The resolver only depends on [`FlightProvider`] and the record shape in
//! [`RawFlightRecord`]; transport details live in the concrete clients.

mod aviationstack;

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Flight, FlightStatus};

pub use aviationstack::AviationStackClient;

const DEFAULT_TIME_ZONE: &str = "UTC";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid provider configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Provider HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Provider API error: {0}")]
    Api(String),
    #[error("Invalid provider payload: {0}")]
    InvalidPayload(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A source of live flight records keyed by IATA flight identifier.
pub trait FlightProvider: Send + Sync {
    /// Issue a single lookup for `flight_iata`. Implementations must not retry.
    fn fetch_flights(
        &self,
        flight_iata: &str,
    ) -> impl Future<Output = ProviderResult<Vec<RawFlightRecord>>> + Send;
}

/// One flight record as delivered by the provider.
///
/// Every field is optional: the provider is not trusted to be complete and a
/// missing field degrades to an empty string instead of failing the lookup.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawFlightRecord {
    #[serde(default)]
    pub flight: Option<RawFlightIdent>,
    #[serde(default)]
    pub airline: Option<RawAirline>,
    #[serde(default)]
    pub departure: Option<RawEndpoint>,
    #[serde(default)]
    pub arrival: Option<RawEndpoint>,
    #[serde(default)]
    pub flight_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawFlightIdent {
    #[serde(default)]
    pub iata: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawAirline {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawEndpoint {
    #[serde(default)]
    pub airport: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub scheduled: Option<String>,
}

impl RawFlightRecord {
    /// Map into a [`Flight`], collapsing the status vocabulary.
    pub fn into_flight(self) -> Flight {
        let departure = self.departure.unwrap_or_default();
        let arrival = self.arrival.unwrap_or_default();

        let time_zone = departure
            .timezone
            .clone()
            .filter(|zone| !zone.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());

        Flight {
            flight_number: self
                .flight
                .and_then(|flight| flight.iata)
                .unwrap_or_default(),
            airline: self
                .airline
                .and_then(|airline| airline.name)
                .unwrap_or_default(),
            start_time: departure.scheduled.clone().unwrap_or_default(),
            end_time: arrival.scheduled.clone().unwrap_or_default(),
            start_location: departure.location_label(),
            end_location: arrival.location_label(),
            time_zone,
            status: FlightStatus::from_provider(self.flight_status.as_deref()),
        }
    }
}

impl RawEndpoint {
    fn location_label(&self) -> String {
        format!(
            "{} ({})",
            self.airport.as_deref().unwrap_or_default(),
            self.iata.as_deref().unwrap_or_default()
        )
    }
}

/// Parse a provider response body into its flight records.
///
/// An `error` object in the payload is reported as [`ProviderError::Api`] even
/// when a data array is also present.
pub fn parse_flights_payload(payload: &str) -> ProviderResult<Vec<RawFlightRecord>> {
    let envelope: ResponseEnvelope = serde_json::from_str(payload)
        .map_err(|error| ProviderError::InvalidPayload(error.to_string()))?;

    if let Some(error) = envelope.error {
        return Err(ProviderError::Api(error.describe()));
    }

    Ok(envelope.data.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    error: Option<ResponseErrorBody>,
    #[serde(default)]
    data: Option<Vec<RawFlightRecord>>,
}

#[derive(Debug, Deserialize)]
struct ResponseErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ResponseErrorBody {
    fn describe(&self) -> String {
        let message = self
            .message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or("unknown provider error");
        match &self.code {
            Some(serde_json::Value::String(code)) => format!("{message} ({code})"),
            Some(serde_json::Value::Number(code)) => format!("{message} ({code})"),
            _ => message.to_string(),
        }
    }
}
