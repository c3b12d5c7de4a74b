use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use clap::Parser;
use flightcard_core::config::RefreshConfig;
use flightcard_core::derive::DisplayClass;
use flightcard_core::fallback::FallbackDataset;
use flightcard_core::models::{SettingsStore, ThemeMode};
use flightcard_core::provider::{FlightProvider, ProviderResult, RawFlightRecord};
use flightcard_core::{
    Flight, FlightResolver, FlightSession, FlightStatus, ResolutionOutcome, Settings,
};
use pretty_assertions::assert_eq;

use crate::cli::{Cli, Commands, CompletionShell, SettingsCommands, ThemeArg};
use crate::commands::common::{
    card_item, format_card_lines, normalize_query_parts, outcome_error, prefers_dark_background,
    progress_bar, BadgeStyle,
};
use crate::commands::completions::{completion_script, run_completions};
use crate::commands::settings::{
    apply_settings_change, format_settings_lines, load_settings_or_default, settings_store,
    toggle_theme,
};
use crate::commands::watch::{parse_watch_command, status_alert, WatchCommand, WatchLoop};
use crate::error::CliError;

fn sample_flight() -> Flight {
    Flight {
        flight_number: "AA100".to_string(),
        airline: "American Airlines".to_string(),
        start_time: "2025-11-22T14:20:00Z".to_string(),
        end_time: "2025-11-23T02:25:00Z".to_string(),
        start_location: "John F. Kennedy International Airport (JFK)".to_string(),
        end_location: "Los Angeles International Airport (LAX)".to_string(),
        time_zone: "EST".to_string(),
        status: FlightStatus::OnTime,
    }
}

fn unique_temp_path(label: &str, extension: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "flightcard-{label}-{}-{}.{extension}",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_nanos())
    ))
}

fn words(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

#[test]
fn normalize_query_parts_joins_and_uppercases() {
    assert_eq!(normalize_query_parts(&words(&["aa100"])).unwrap(), "AA100");
    assert_eq!(
        normalize_query_parts(&words(&[" ba", "11 "])).unwrap(),
        "BA 11"
    );
}

#[test]
fn normalize_query_parts_rejects_blank_input() {
    assert!(matches!(
        normalize_query_parts(&[]),
        Err(CliError::EmptyQuery)
    ));
    assert!(matches!(
        normalize_query_parts(&words(&["   ", "\t"])),
        Err(CliError::EmptyQuery)
    ));
}

#[test]
fn outcome_error_maps_user_messages() {
    assert!(outcome_error(&ResolutionOutcome::Found(vec![sample_flight()])).is_none());

    let not_found = outcome_error(&ResolutionOutcome::NotFound).unwrap();
    assert!(matches!(not_found, CliError::NotFound(_)));
    assert_eq!(
        not_found.to_string(),
        "Flight not found. Please check the flight number."
    );

    let failed =
        outcome_error(&ResolutionOutcome::ResolutionFailed("timeout".to_string())).unwrap();
    assert!(matches!(failed, CliError::ResolutionFailed(_)));
    assert_eq!(
        failed.to_string(),
        "Couldn't connect to flight data. Please try again."
    );
}

#[test]
fn progress_bar_fills_proportionally() {
    assert_eq!(progress_bar(0.0), "[------------------------]   0%");
    assert_eq!(progress_bar(50.0), "[############------------]  50%");
    assert_eq!(progress_bar(100.0), "[########################] 100%");
}

#[test]
fn progress_bar_clamps_out_of_range_values() {
    assert_eq!(progress_bar(-20.0), progress_bar(0.0));
    assert_eq!(progress_bar(250.0), progress_bar(100.0));
}

#[test]
fn format_card_lines_renders_full_card() {
    let now = Utc.with_ymd_and_hms(2025, 11, 22, 20, 22, 30).unwrap();
    let lines = format_card_lines(&sample_flight(), now, &Utc, BadgeStyle::Plain);

    assert_eq!(
        lines,
        vec![
            "American Airlines AA100  [On Time]".to_string(),
            "JFK  ->  LAX".to_string(),
            "John F. Kennedy International Airport  ->  Los Angeles International Airport"
                .to_string(),
            "Departure  14:20 EST  Sat, Nov 22".to_string(),
            "Arrival    02:25 EST  Sun, Nov 23".to_string(),
            "Duration   12h5m".to_string(),
            "Progress   [############------------]  50%".to_string(),
            "Everything's on schedule. Sit back and relax.".to_string(),
        ]
    );
}

#[test]
fn format_card_lines_handles_missing_data() {
    let flight = Flight {
        start_time: "not a time".to_string(),
        end_time: String::new(),
        start_location: "Somewhere".to_string(),
        status: FlightStatus::Cancelled,
        ..sample_flight()
    };
    let now = Utc.with_ymd_and_hms(2025, 11, 22, 20, 0, 0).unwrap();
    let lines = format_card_lines(&flight, now, &Utc, BadgeStyle::Plain);

    assert_eq!(lines[0], "American Airlines AA100  [Cancelled]");
    assert_eq!(lines[1], "---  ->  LAX");
    assert_eq!(lines[3], "Departure  unknown");
    assert_eq!(lines[4], "Arrival    unknown");
    assert!(!lines.iter().any(|line| line.starts_with("Duration")));
    assert_eq!(
        lines.last().map(String::as_str),
        Some("Progress   [------------------------]   0%")
    );
}

#[test]
fn card_item_serializes_flight_and_derived_state() {
    let now = Utc.with_ymd_and_hms(2025, 11, 22, 20, 22, 30).unwrap();
    let value = serde_json::to_value(card_item(&sample_flight(), now)).unwrap();

    assert_eq!(value["flight"]["flightNumber"], "AA100");
    assert_eq!(value["flight"]["status"], "On Time");
    assert_eq!(value["derived"]["departureCode"], "JFK");
    assert_eq!(value["derived"]["displayClass"], "on-time");
    assert_eq!(value["derived"]["progress"], 50.0);
}

#[test]
fn parse_watch_command_accepts_short_and_long_forms() {
    assert_eq!(parse_watch_command("r"), Some(WatchCommand::Refresh));
    assert_eq!(parse_watch_command(" Refresh \n"), Some(WatchCommand::Refresh));
    assert_eq!(parse_watch_command("q"), Some(WatchCommand::Quit));
    assert_eq!(parse_watch_command("EXIT"), Some(WatchCommand::Quit));
    assert_eq!(parse_watch_command(""), None);
    assert_eq!(parse_watch_command("x"), None);
}

fn session_showing(status: FlightStatus, alerts_enabled: bool) -> FlightSession {
    let settings = Settings {
        alerts_enabled,
        ..Settings::default()
    };
    let mut session = FlightSession::new(settings, &RefreshConfig::default());
    let ticket = session.begin_search("aa100").unwrap();
    let flight = Flight {
        status,
        ..sample_flight()
    };
    session.complete(ticket, ResolutionOutcome::Found(vec![flight]), Utc::now());
    session
}

#[test]
fn status_alert_reports_changes_when_enabled() {
    let session = session_showing(FlightStatus::Delayed, true);
    assert_eq!(
        status_alert(&session, Some(FlightStatus::OnTime)).as_deref(),
        Some("\u{7}AA100 is now Delayed (was On Time)")
    );
    assert_eq!(status_alert(&session, Some(FlightStatus::Delayed)), None);
    assert_eq!(status_alert(&session, None), None);
}

#[test]
fn status_alert_is_silent_when_disabled() {
    let session = session_showing(FlightStatus::Delayed, false);
    assert_eq!(status_alert(&session, Some(FlightStatus::OnTime)), None);
}

#[test]
fn apply_settings_change_requires_a_field() {
    assert!(matches!(
        apply_settings_change(Settings::default(), None, None),
        Err(CliError::NoSettingsChange)
    ));
}

#[test]
fn apply_settings_change_keeps_untouched_fields() {
    let current = Settings {
        theme: ThemeMode::Light,
        alerts_enabled: true,
    };

    let updated = apply_settings_change(current.clone(), Some(ThemeArg::Dark), None).unwrap();
    assert_eq!(updated.theme, ThemeMode::Dark);
    assert!(updated.alerts_enabled);

    let updated = apply_settings_change(current, None, Some(false)).unwrap();
    assert_eq!(updated.theme, ThemeMode::Light);
    assert!(!updated.alerts_enabled);
}

#[test]
fn format_settings_lines_lists_every_field() {
    let settings = Settings {
        theme: ThemeMode::System,
        alerts_enabled: true,
    };
    assert_eq!(
        format_settings_lines(&settings),
        vec!["theme:  system".to_string(), "alerts: on".to_string()]
    );
}

#[test]
fn settings_store_prefers_explicit_path() {
    let path = unique_temp_path("settings-explicit", "json");
    let store = settings_store(Some(&path)).unwrap();
    assert_eq!(store.path(), path.as_path());

    let settings = Settings {
        theme: ThemeMode::Dark,
        alerts_enabled: false,
    };
    store.save(&settings).unwrap();
    assert_eq!(load_settings_or_default(Some(&path)), settings);

    let _ = std::fs::remove_file(path);
}

#[test]
fn load_settings_or_default_ignores_corrupt_files() {
    let path = unique_temp_path("settings-corrupt", "json");
    std::fs::write(&path, "[]").unwrap();

    assert_eq!(load_settings_or_default(Some(&path)), Settings::default());

    let _ = std::fs::remove_file(path);
}

#[test]
fn bare_words_parse_as_quick_lookup() {
    let cli = Cli::try_parse_from(["flightcard", "aa", "100"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.query, words(&["aa", "100"]));
}

#[test]
fn status_is_an_alias_for_lookup() {
    let cli = Cli::try_parse_from(["flightcard", "status", "ba11", "--json"]).unwrap();
    match cli.command {
        Some(Commands::Lookup { query, json, all }) => {
            assert_eq!(query, words(&["ba11"]));
            assert!(json);
            assert!(!all);
        }
        _ => panic!("expected lookup command"),
    }
}

#[test]
fn settings_set_parses_theme_and_alerts() {
    let cli = Cli::try_parse_from([
        "flightcard",
        "settings",
        "set",
        "--theme",
        "dark",
        "--alerts",
        "true",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Settings {
            command: SettingsCommands::Set { theme, alerts },
        }) => {
            assert_eq!(theme, Some(ThemeArg::Dark));
            assert_eq!(alerts, Some(true));
        }
        _ => panic!("expected settings set command"),
    }
}

#[test]
fn run_completions_writes_bash_script_file() {
    let output_path = unique_temp_path("completions-test", "bash");

    run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("_flightcard()"));
    assert!(script.contains("complete -F _flightcard"));

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn completion_script_uses_binary_name_for_each_shell() {
    let zsh = String::from_utf8(completion_script(CompletionShell::Zsh)).unwrap();
    assert!(zsh.starts_with("#compdef flightcard"));

    let fish = String::from_utf8(completion_script(CompletionShell::Fish)).unwrap();
    assert!(fish.contains("complete -c flightcard"));
}

#[test]
fn badge_style_plain_leaves_text_alone() {
    assert_eq!(
        BadgeStyle::Plain.paint(DisplayClass::Delayed, "[Delayed]"),
        "[Delayed]"
    );
    assert_eq!(
        BadgeStyle::for_output(ThemeMode::Dark, false),
        BadgeStyle::Plain
    );
}

#[test]
fn badge_style_follows_explicit_theme() {
    assert_eq!(
        BadgeStyle::for_output(ThemeMode::Dark, true),
        BadgeStyle::DarkTerminal
    );
    assert_eq!(
        BadgeStyle::for_output(ThemeMode::Light, true),
        BadgeStyle::LightTerminal
    );
}

#[test]
fn badge_colors_differ_per_theme_and_class() {
    assert_eq!(
        BadgeStyle::DarkTerminal.paint(DisplayClass::Cancelled, "[Cancelled]"),
        "\x1b[1;91m[Cancelled]\x1b[0m"
    );
    assert_eq!(
        BadgeStyle::LightTerminal.paint(DisplayClass::Cancelled, "[Cancelled]"),
        "\x1b[1;31m[Cancelled]\x1b[0m"
    );
    assert_ne!(
        BadgeStyle::DarkTerminal.paint(DisplayClass::OnTime, "x"),
        BadgeStyle::DarkTerminal.paint(DisplayClass::Landed, "x")
    );
}

#[test]
fn card_header_carries_themed_badge() {
    let now = Utc.with_ymd_and_hms(2025, 11, 22, 20, 0, 0).unwrap();
    let flight = Flight {
        status: FlightStatus::Delayed,
        ..sample_flight()
    };
    let lines = format_card_lines(&flight, now, &Utc, BadgeStyle::LightTerminal);
    assert_eq!(lines[0], "American Airlines AA100  \x1b[1;33m[Delayed]\x1b[0m");
}

#[test]
fn prefers_dark_background_reads_colorfgbg() {
    assert!(prefers_dark_background(Some("15;0")));
    assert!(prefers_dark_background(Some("7;8")));
    assert!(!prefers_dark_background(Some("0;15")));
    assert!(!prefers_dark_background(Some("0;default;7")));
    assert!(prefers_dark_background(Some("garbage")));
    assert!(prefers_dark_background(None));
}

#[test]
fn toggle_theme_flips_what_is_shown() {
    let light = Settings {
        theme: ThemeMode::Light,
        alerts_enabled: true,
    };
    let toggled = toggle_theme(light, true);
    assert_eq!(toggled.theme, ThemeMode::Dark);
    assert!(toggled.alerts_enabled);

    let system = Settings::default();
    assert_eq!(toggle_theme(system.clone(), true).theme, ThemeMode::Light);
    assert_eq!(toggle_theme(system, false).theme, ThemeMode::Dark);
}

#[test]
fn settings_toggle_theme_parses() {
    let cli = Cli::try_parse_from(["flightcard", "settings", "toggle-theme"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Settings {
            command: SettingsCommands::ToggleTheme
        })
    ));
}

struct NeverRespondingProvider;

impl FlightProvider for NeverRespondingProvider {
    async fn fetch_flights(&self, _flight_iata: &str) -> ProviderResult<Vec<RawFlightRecord>> {
        std::future::pending().await
    }
}

struct CrashingProvider;

impl FlightProvider for CrashingProvider {
    async fn fetch_flights(&self, _flight_iata: &str) -> ProviderResult<Vec<RawFlightRecord>> {
        panic!("provider crashed");
    }
}

fn watch_loop<P>(resolver: Arc<FlightResolver<P>>) -> WatchLoop<P> {
    WatchLoop {
        resolver,
        session: FlightSession::new(Settings::default(), &RefreshConfig::default()),
        tick_interval: Duration::from_secs(3_600),
        style: BadgeStyle::Plain,
    }
}

#[tokio::test]
async fn watch_renders_card_until_shutdown() {
    let resolver: FlightResolver<NeverRespondingProvider> =
        FlightResolver::new(None, FallbackDataset::anchored_at(Utc::now()));
    let mut out = Vec::new();

    watch_loop(Arc::new(resolver))
        .run(
            " aa100",
            &b""[..],
            &mut out,
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await
        .unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("Watching AA100."));
    assert!(printed.contains("American Airlines AA100  [On Time]"));
}

#[tokio::test]
async fn watch_exits_when_first_search_misses() {
    let resolver: FlightResolver<NeverRespondingProvider> =
        FlightResolver::new(None, FallbackDataset::from_flights([]));
    let mut out = Vec::new();

    let error = watch_loop(Arc::new(resolver))
        .run("zz999", &b""[..], &mut out, std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::NotFound(_)));
}

#[tokio::test]
async fn watch_quit_aborts_running_resolution() {
    let resolver = Arc::new(FlightResolver::new(
        Some(NeverRespondingProvider),
        FallbackDataset::anchored_at(Utc::now()),
    ));
    let mut out = Vec::new();

    watch_loop(Arc::clone(&resolver))
        .run("aa100", &b"q\n"[..], &mut out, std::future::pending())
        .await
        .unwrap();

    for _ in 0..100 {
        if Arc::strong_count(&resolver) == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(Arc::strong_count(&resolver), 1);
}

#[tokio::test]
async fn watch_reports_crashed_first_resolution() {
    let resolver = FlightResolver::new(
        Some(CrashingProvider),
        FallbackDataset::anchored_at(Utc::now()),
    );
    let mut out = Vec::new();

    let error = watch_loop(Arc::new(resolver))
        .run("aa100", &b""[..], &mut out, std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::ResolutionFailed(_)));
}
