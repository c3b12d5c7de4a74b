//! Flight model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of statuses a resolved flight can carry.
///
/// Upstream providers speak a wider vocabulary; see
/// [`FlightStatus::from_provider`] for how it collapses into this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FlightStatus {
    #[default]
    #[serde(rename = "On Time")]
    OnTime,
    #[serde(rename = "Delayed")]
    Delayed,
    #[serde(rename = "Cancelled")]
    Cancelled,
    #[serde(rename = "Boarding")]
    Boarding,
    #[serde(rename = "Landed")]
    Landed,
}

impl FlightStatus {
    /// Map an upstream status string into the closed enumeration.
    ///
    /// Matching is case-insensitive. Unknown or missing values default to
    /// [`FlightStatus::OnTime`] and are never treated as errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use flightcard_core::FlightStatus;
    ///
    /// assert_eq!(FlightStatus::from_provider(Some("LANDED")), FlightStatus::Landed);
    /// assert_eq!(FlightStatus::from_provider(Some("diverted")), FlightStatus::OnTime);
    /// assert_eq!(FlightStatus::from_provider(None), FlightStatus::OnTime);
    /// ```
    #[must_use]
    pub fn from_provider(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::OnTime;
        };

        match raw.to_lowercase().as_str() {
            "landed" => Self::Landed,
            "delayed" => Self::Delayed,
            "cancelled" => Self::Cancelled,
            "boarding" => Self::Boarding,
            // "active" and "scheduled" land here along with everything unknown
            _ => Self::OnTime,
        }
    }

    /// Human-readable label shown on the status badge.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTime => "On Time",
            Self::Delayed => "Delayed",
            Self::Cancelled => "Cancelled",
            Self::Boarding => "Boarding",
            Self::Landed => "Landed",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved flight record.
///
/// Timestamps are kept exactly as the source delivered them. Malformed values
/// are tolerated here and surface as `None` from [`Flight::departure`] and
/// [`Flight::arrival`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Canonical uppercase identifier, e.g. `AA100`
    pub flight_number: String,
    /// Airline display name
    pub airline: String,
    /// Scheduled departure (ISO 8601)
    pub start_time: String,
    /// Scheduled arrival (ISO 8601)
    pub end_time: String,
    /// Departure airport as `"Name (IATA)"`
    pub start_location: String,
    /// Arrival airport as `"Name (IATA)"`
    pub end_location: String,
    /// Short zone label, display only
    pub time_zone: String,
    pub status: FlightStatus,
}

impl Flight {
    /// Parsed departure instant, if the stored timestamp is valid.
    #[must_use]
    pub fn departure(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start_time)
    }

    /// Parsed arrival instant, if the stored timestamp is valid.
    #[must_use]
    pub fn arrival(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.end_time)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
