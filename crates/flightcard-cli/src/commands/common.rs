use std::fmt::Display;
use std::io::{self, IsTerminal};

use chrono::{DateTime, TimeZone, Utc};
use flightcard_core::config::AppConfig;
use flightcard_core::derive::{airport_name, DerivedState, DisplayClass};
use flightcard_core::models::ThemeMode;
use flightcard_core::provider::AviationStackClient;
use flightcard_core::query::normalize;
use flightcard_core::{build_resolver, Flight, FlightResolver, ResolutionOutcome};
use serde::Serialize;

use crate::error::CliError;

const PROGRESS_BAR_WIDTH: usize = 24;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightCardItem {
    pub flight: Flight,
    pub derived: DerivedState,
}

/// How the status badge on a card is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Plain,
    LightTerminal,
    DarkTerminal,
}

impl BadgeStyle {
    /// Pick a palette for `theme`; `colored` is false for pipes and `NO_COLOR`.
    pub fn for_output(theme: ThemeMode, colored: bool) -> Self {
        if !colored {
            Self::Plain
        } else if theme.is_dark(terminal_prefers_dark()) {
            Self::DarkTerminal
        } else {
            Self::LightTerminal
        }
    }

    pub fn paint(self, class: DisplayClass, text: &str) -> String {
        let color = match (self, class) {
            (Self::Plain, _) => return text.to_string(),
            (Self::DarkTerminal, DisplayClass::OnTime) => "92",
            (Self::DarkTerminal, DisplayClass::Delayed) => "93",
            (Self::DarkTerminal, DisplayClass::Cancelled) => "91",
            (Self::DarkTerminal, DisplayClass::Landed) => "96",
            (Self::LightTerminal, DisplayClass::OnTime) => "32",
            (Self::LightTerminal, DisplayClass::Delayed) => "33",
            (Self::LightTerminal, DisplayClass::Cancelled) => "31",
            (Self::LightTerminal, DisplayClass::Landed) => "34",
        };
        format!("\x1b[1;{color}m{text}\x1b[0m")
    }
}

pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

pub fn terminal_prefers_dark() -> bool {
    prefers_dark_background(std::env::var("COLORFGBG").ok().as_deref())
}

/// Read the background index from a `COLORFGBG` value such as `"15;0"`.
///
/// Unknown or missing values count as dark.
pub fn prefers_dark_background(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|background| background.trim().parse::<u8>().ok())
        .is_none_or(|background| background < 7 || background == 8)
}

pub fn load_config() -> Result<AppConfig, CliError> {
    AppConfig::from_env().map_err(|error| CliError::Core(error.into()))
}

pub fn resolver_from_env() -> Result<(AppConfig, FlightResolver<AviationStackClient>), CliError> {
    let config = load_config()?;
    let resolver = build_resolver(&config)?;
    Ok((config, resolver))
}

/// Join positional words and normalize; `aa 100` stays a single query.
pub fn normalize_query_parts(parts: &[String]) -> Result<String, CliError> {
    let query = normalize(&parts.join(" "));
    if query.is_empty() {
        Err(CliError::EmptyQuery)
    } else {
        Ok(query)
    }
}

/// Map a non-`Found` outcome to the error the user should see.
pub fn outcome_error(outcome: &ResolutionOutcome) -> Option<CliError> {
    match outcome {
        ResolutionOutcome::Found(_) => None,
        ResolutionOutcome::NotFound => outcome.user_message().map(CliError::NotFound),
        ResolutionOutcome::ResolutionFailed(_) => {
            outcome.user_message().map(CliError::ResolutionFailed)
        }
    }
}

pub fn card_item(flight: &Flight, now: DateTime<Utc>) -> FlightCardItem {
    FlightCardItem {
        flight: flight.clone(),
        derived: DerivedState::compute(flight, now),
    }
}

pub fn format_card_lines<Tz>(
    flight: &Flight,
    now: DateTime<Utc>,
    zone: &Tz,
    style: BadgeStyle,
) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let derived = DerivedState::compute(flight, now);
    let mut lines = vec![
        format!(
            "{} {}  {}",
            flight.airline,
            flight.flight_number,
            style.paint(derived.display_class, &format!("[{}]", flight.status))
        ),
        format!(
            "{:<4} -> {:>4}",
            display_code(&derived.departure_code),
            display_code(&derived.arrival_code)
        ),
        format!(
            "{}  ->  {}",
            airport_name(&flight.start_location),
            airport_name(&flight.end_location)
        ),
        format!(
            "Departure  {}",
            format_schedule(flight.departure(), &flight.time_zone, zone)
        ),
        format!(
            "Arrival    {}",
            format_schedule(flight.arrival(), &flight.time_zone, zone)
        ),
    ];

    if !derived.duration.is_empty() {
        lines.push(format!("Duration   {}", derived.duration));
    }
    lines.push(format!("Progress   {}", progress_bar(derived.progress)));
    if !derived.micro_copy.is_empty() {
        lines.push(derived.micro_copy.to_string());
    }
    lines
}

pub fn progress_bar(progress: f64) -> String {
    let clamped = progress.clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((clamped / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        clamped.round()
    )
}

fn display_code(code: &str) -> &str {
    if code.is_empty() {
        "---"
    } else {
        code
    }
}

fn format_schedule<Tz>(instant: Option<DateTime<Utc>>, label: &str, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.map_or_else(
        || "unknown".to_string(),
        |instant| {
            let local = instant.with_timezone(zone);
            format!("{} {}  {}", local.format("%H:%M"), label, local.format("%a, %b %-d"))
        },
    )
}
