//! Static fallback flights used when the live provider is unavailable.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::models::{Flight, FlightStatus};

/// Fixed mapping from canonical flight identifier to a complete record.
///
/// Schedules are expressed relative to the instant the dataset is anchored
/// at, so the sample flights always sit at a meaningful point in their
/// journey.
#[derive(Debug, Clone, Default)]
pub struct FallbackDataset {
    flights: BTreeMap<String, Flight>,
}

struct Entry {
    flight_number: &'static str,
    airline: &'static str,
    departs_in_hours: i64,
    arrives_in_hours: i64,
    start_location: &'static str,
    end_location: &'static str,
    time_zone: &'static str,
    status: FlightStatus,
}

const ENTRIES: &[Entry] = &[
    Entry {
        flight_number: "AA100",
        airline: "American Airlines",
        departs_in_hours: 2,
        arrives_in_hours: 8,
        start_location: "John F. Kennedy International Airport (JFK)",
        end_location: "Los Angeles International Airport (LAX)",
        time_zone: "EST",
        status: FlightStatus::OnTime,
    },
    Entry {
        flight_number: "BA11",
        airline: "British Airways",
        departs_in_hours: 3,
        arrives_in_hours: 10,
        start_location: "London Heathrow Airport (LHR)",
        end_location: "Singapore Changi Airport (SIN)",
        time_zone: "GMT",
        status: FlightStatus::Boarding,
    },
    Entry {
        flight_number: "DL123",
        airline: "Delta Air Lines",
        departs_in_hours: -1,
        arrives_in_hours: 4,
        start_location: "Hartsfield-Jackson Atlanta International Airport (ATL)",
        end_location: "Miami International Airport (MIA)",
        time_zone: "EST",
        status: FlightStatus::Delayed,
    },
    Entry {
        flight_number: "UA456",
        airline: "United Airlines",
        departs_in_hours: -6,
        arrives_in_hours: -1,
        start_location: "San Francisco International Airport (SFO)",
        end_location: "Tokyo Narita International Airport (NRT)",
        time_zone: "PST",
        status: FlightStatus::Landed,
    },
    Entry {
        flight_number: "EK202",
        airline: "Emirates",
        departs_in_hours: 1,
        arrives_in_hours: 15,
        start_location: "Dubai International Airport (DXB)",
        end_location: "New York John F. Kennedy International Airport (JFK)",
        time_zone: "GST",
        status: FlightStatus::OnTime,
    },
];

impl FallbackDataset {
    /// The built-in sample flights, scheduled around `anchor`.
    #[must_use]
    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        let flights = ENTRIES
            .iter()
            .map(|entry| {
                let flight = Flight {
                    flight_number: entry.flight_number.to_string(),
                    airline: entry.airline.to_string(),
                    start_time: offset_timestamp(anchor, entry.departs_in_hours),
                    end_time: offset_timestamp(anchor, entry.arrives_in_hours),
                    start_location: entry.start_location.to_string(),
                    end_location: entry.end_location.to_string(),
                    time_zone: entry.time_zone.to_string(),
                    status: entry.status,
                };
                (flight.flight_number.clone(), flight)
            })
            .collect();
        Self { flights }
    }

    /// An arbitrary dataset, keyed by each flight's number.
    pub fn from_flights(flights: impl IntoIterator<Item = Flight>) -> Self {
        Self {
            flights: flights
                .into_iter()
                .map(|flight| (flight.flight_number.clone(), flight))
                .collect(),
        }
    }

    /// Exact-match lookup on the canonical identifier.
    pub fn lookup(&self, flight_number: &str) -> Option<&Flight> {
        self.flights.get(flight_number)
    }

    /// Identifiers available in this dataset, sorted.
    pub fn flight_numbers(&self) -> impl Iterator<Item = &str> {
        self.flights.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

fn offset_timestamp(anchor: DateTime<Utc>, hours: i64) -> String {
    (anchor + Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Millis, true)
}
