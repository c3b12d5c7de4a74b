//! Time-relative values derived from a resolved flight.
//!
//! Everything here is a pure function of its inputs; "now" is always passed
//! in so callers decide which clock drives the card.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Flight, FlightStatus};

/// Default age after which a resolved flight is considered stale.
pub const DEFAULT_STALE_AFTER_MINUTES: i64 = 5;

static AIRPORT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("Invalid regex"));

/// Visual bucket for a status badge. Boarding shares the on-time styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayClass {
    OnTime,
    Delayed,
    Cancelled,
    Landed,
}

impl DisplayClass {
    /// CSS-style class name, e.g. `status-on-time`.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::OnTime => "status-on-time",
            Self::Delayed => "status-delayed",
            Self::Cancelled => "status-cancelled",
            Self::Landed => "status-landed",
        }
    }
}

/// Percentage of the journey completed at `now`, clamped to `[0, 100]`.
///
/// Flights whose arrival is not after departure, or whose timestamps do not
/// parse, report `0.0`.
pub fn progress(flight: &Flight, now: DateTime<Utc>) -> f64 {
    let (Some(start), Some(end)) = (flight.departure(), flight.arrival()) else {
        return 0.0;
    };
    if end <= start {
        return 0.0;
    }

    let total = (end - start).num_milliseconds() as f64;
    let elapsed = (now - start).num_milliseconds() as f64;
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

/// Whether more than `threshold` has passed since `last_resolved_at`.
///
/// A flight that has never been resolved is not stale.
pub fn is_stale(
    last_resolved_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> bool {
    last_resolved_at.is_some_and(|resolved_at| now - resolved_at > threshold)
}

pub const fn status_display_class(status: FlightStatus) -> DisplayClass {
    match status {
        FlightStatus::OnTime | FlightStatus::Boarding => DisplayClass::OnTime,
        FlightStatus::Delayed => DisplayClass::Delayed,
        FlightStatus::Cancelled => DisplayClass::Cancelled,
        FlightStatus::Landed => DisplayClass::Landed,
    }
}

/// Contextual sentence shown under the status badge.
///
/// Cancelled flights intentionally have no copy.
pub const fn micro_copy(status: FlightStatus) -> &'static str {
    match status {
        FlightStatus::OnTime => "Everything's on schedule. Sit back and relax.",
        FlightStatus::Delayed => "Running a little late. Keep an eye on the board.",
        FlightStatus::Boarding => "Boarding now. Head to your gate.",
        FlightStatus::Landed => "Touched down. Welcome to your destination.",
        FlightStatus::Cancelled => "",
    }
}

/// IATA code between the first `(` and the following `)`.
///
/// # Examples
///
/// ```
/// use flightcard_core::derive::airport_code;
///
/// assert_eq!(airport_code("JFK Airport (JFK)"), "JFK");
/// assert_eq!(airport_code("No Parens Here"), "");
/// ```
pub fn airport_code(location: &str) -> String {
    AIRPORT_CODE
        .captures(location)
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str().to_string())
        .unwrap_or_default()
}

/// Airport name without the trailing code.
pub fn airport_name(location: &str) -> String {
    location
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Scheduled block time as `"{hours}h{minutes}m"`, empty for invalid ranges.
pub fn duration_label(flight: &Flight) -> String {
    let (Some(start), Some(end)) = (flight.departure(), flight.arrival()) else {
        return String::new();
    };
    if end <= start {
        return String::new();
    }

    let minutes = (end - start).num_minutes();
    format!("{}h{}m", minutes / 60, minutes % 60)
}

/// Every derived value a status card needs, computed for one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedState {
    pub progress: f64,
    pub display_class: DisplayClass,
    pub micro_copy: &'static str,
    pub departure_code: String,
    pub arrival_code: String,
    pub duration: String,
}

impl DerivedState {
    pub fn compute(flight: &Flight, now: DateTime<Utc>) -> Self {
        Self {
            progress: progress(flight, now),
            display_class: status_display_class(flight.status),
            micro_copy: micro_copy(flight.status),
            departure_code: airport_code(&flight.start_location),
            arrival_code: airport_code(&flight.end_location),
            duration: duration_label(flight),
        }
    }
}
