use chrono::{Local, Utc};
use flightcard_core::Settings;

use crate::commands::common::{
    card_item, color_enabled, format_card_lines, normalize_query_parts, outcome_error,
    resolver_from_env, BadgeStyle, FlightCardItem,
};
use crate::error::CliError;

pub async fn run_lookup(
    query_parts: &[String],
    as_json: bool,
    all: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let query = normalize_query_parts(query_parts)?;
    let (_, resolver) = resolver_from_env()?;

    let outcome = resolver.resolve(&query).await;
    if let Some(error) = outcome_error(&outcome) {
        return Err(error);
    }

    let now = Utc::now();
    let flights = if all {
        outcome.flights()
    } else {
        outcome
            .primary()
            .map(std::slice::from_ref)
            .unwrap_or_default()
    };

    if as_json {
        let items = flights
            .iter()
            .map(|flight| card_item(flight, now))
            .collect::<Vec<FlightCardItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let style = BadgeStyle::for_output(settings.theme, color_enabled());
    for (index, flight) in flights.iter().enumerate() {
        if index > 0 {
            println!();
        }
        for line in format_card_lines(flight, now, &Local, style) {
            println!("{line}");
        }
    }
    Ok(())
}
