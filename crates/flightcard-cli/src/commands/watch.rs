use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use flightcard_core::provider::FlightProvider;
use flightcard_core::resolver::CONNECT_FAILED_MESSAGE;
use flightcard_core::session::{Completion, RefreshRequest, ResolutionTicket};
use flightcard_core::{FlightResolver, FlightSession, FlightStatus, ResolutionOutcome, Settings};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;

use crate::commands::common::{
    color_enabled, format_card_lines, normalize_query_parts, outcome_error, resolver_from_env,
    BadgeStyle,
};
use crate::error::CliError;

type Resolved = (ResolutionTicket, ResolutionOutcome);

/// Input a user can type while a card is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    Refresh,
    Quit,
}

pub fn parse_watch_command(line: &str) -> Option<WatchCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "refresh" => Some(WatchCommand::Refresh),
        "q" | "quit" | "exit" => Some(WatchCommand::Quit),
        _ => None,
    }
}

pub async fn run_watch(query_parts: &[String], settings: Settings) -> Result<(), CliError> {
    let query = normalize_query_parts(query_parts)?;
    let (config, resolver) = resolver_from_env()?;

    let watch = WatchLoop {
        resolver: Arc::new(resolver),
        style: BadgeStyle::for_output(settings.theme, color_enabled()),
        session: FlightSession::new(settings, &config.refresh),
        tick_interval: config.refresh.tick_interval,
    };
    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    watch
        .run(
            &query,
            BufReader::new(tokio::io::stdin()),
            &mut std::io::stdout(),
            shutdown,
        )
        .await
}

/// Keeps one flight card on screen: ticks drive automatic refreshes, input
/// lines drive manual ones, and at most one resolution task runs at a time.
pub struct WatchLoop<P> {
    pub resolver: Arc<FlightResolver<P>>,
    pub session: FlightSession,
    pub tick_interval: Duration,
    pub style: BadgeStyle,
}

impl<P: FlightProvider + 'static> WatchLoop<P> {
    /// Run until `q`, `shutdown` resolving, or the first search failing.
    pub async fn run<R, W, S>(
        mut self,
        query: &str,
        input: R,
        out: &mut W,
        shutdown: S,
    ) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        S: Future<Output = ()>,
    {
        let ticket = self.session.begin_search(query).ok_or(CliError::EmptyQuery)?;
        writeln!(
            out,
            "Watching {}. Type r + Enter to refresh, q + Enter to quit.",
            ticket.query()
        )?;

        let mut in_flight = InFlight::default();
        in_flight.start(self.spawn(ticket));
        let mut awaiting_first_result = true;

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        let mut lines = input.lines();
        let mut input_open = true;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    let now = Utc::now();
                    if let Some(ticket) = self.session.on_tick(now) {
                        in_flight.start(self.spawn(ticket));
                    }
                    self.render(out, now)?;
                }
                joined = in_flight.join() => {
                    let (ticket, outcome) = match joined {
                        Ok(resolved) => resolved,
                        Err(error) => {
                            tracing::warn!(%error, "Flight resolution task failed");
                            self.session.abandon();
                            if awaiting_first_result {
                                return Err(CliError::ResolutionFailed(CONNECT_FAILED_MESSAGE));
                            }
                            continue;
                        }
                    };

                    let now = Utc::now();
                    let previous_status = self.session.current_flight().map(|flight| flight.status);
                    if self.session.complete(ticket, outcome, now) == Completion::Discarded {
                        continue;
                    }
                    if awaiting_first_result {
                        awaiting_first_result = false;
                        if let Some(error) = self.session.outcome().and_then(outcome_error) {
                            return Err(error);
                        }
                    }
                    if let Some(line) = status_alert(&self.session, previous_status) {
                        writeln!(out, "{line}")?;
                    }
                    self.render(out, now)?;
                }
                line = lines.next_line(), if input_open => {
                    let Some(line) = line? else {
                        input_open = false;
                        continue;
                    };
                    match parse_watch_command(&line) {
                        Some(WatchCommand::Quit) => break,
                        Some(WatchCommand::Refresh) => match self.session.request_refresh(Utc::now()) {
                            RefreshRequest::Started(ticket) => in_flight.start(self.spawn(ticket)),
                            RefreshRequest::Throttled | RefreshRequest::Busy | RefreshRequest::NoQuery => {
                                tracing::debug!("Manual refresh ignored");
                            }
                        },
                        None => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn spawn(&self, ticket: ResolutionTicket) -> JoinHandle<Resolved> {
        let resolver = Arc::clone(&self.resolver);
        tokio::spawn(async move { ticket.resolve_with(&resolver).await })
    }

    fn render<W: Write>(&self, out: &mut W, now: DateTime<Utc>) -> std::io::Result<()> {
        let Some(flight) = self.session.current_flight() else {
            return Ok(());
        };

        let updated = self
            .session
            .scheduler()
            .state()
            .last_resolved_at
            .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        let stale = if self.session.is_stale(now) { " (stale)" } else { "" };

        writeln!(out)?;
        writeln!(out, "Updated {updated}{stale}")?;
        for line in format_card_lines(flight, now, &Local, self.style) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

/// The running resolution task; aborted when replaced or dropped.
#[derive(Default)]
struct InFlight(Option<JoinHandle<Resolved>>);

impl InFlight {
    fn start(&mut self, handle: JoinHandle<Resolved>) {
        if let Some(previous) = self.0.replace(handle) {
            previous.abort();
        }
    }

    /// Wait for the running task; pending forever when there is none.
    async fn join(&mut self) -> Result<Resolved, JoinError> {
        let Some(handle) = self.0.as_mut() else {
            return std::future::pending().await;
        };
        let joined = handle.await;
        self.0 = None;
        joined
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

/// Alert text when a refresh changed the status and alerts are enabled.
pub fn status_alert(session: &FlightSession, previous: Option<FlightStatus>) -> Option<String> {
    if !session.settings().alerts_enabled {
        return None;
    }
    let previous = previous?;
    let current = session.current_flight()?;
    (current.status != previous).then(|| {
        format!(
            "\u{7}{} is now {} (was {})",
            current.flight_number, current.status, previous
        )
    })
}
