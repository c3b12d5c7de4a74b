//! Per-viewer lookup session.
//!
//! A [`FlightSession`] owns the state a status card is rendered from: the
//! active query, the latest outcome, refresh timing and settings. It is the
//! only writer of that state. Network work happens outside it: the session
//! hands out a [`ResolutionTicket`], the caller resolves it (possibly on
//! another task) and feeds the result back through [`FlightSession::complete`].
//! Results for a query that has since been replaced are discarded.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::config::RefreshConfig;
use crate::derive::DerivedState;
use crate::models::{Flight, Settings};
use crate::provider::FlightProvider;
use crate::query::normalize;
use crate::refresh::{ManualRefresh, Phase, RefreshScheduler, RefreshTrigger};
use crate::resolver::{FlightResolver, ResolutionOutcome};

/// What started a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Search,
    Refresh(RefreshTrigger),
}

/// Permission to run one resolution for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    query: String,
    kind: TicketKind,
}

impl ResolutionTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn kind(&self) -> TicketKind {
        self.kind
    }

    /// Run the resolution this ticket stands for.
    pub async fn resolve_with<P: FlightProvider>(
        self,
        resolver: &FlightResolver<P>,
    ) -> (Self, ResolutionOutcome) {
        let outcome = resolver.resolve(&self.query).await;
        (self, outcome)
    }
}

/// Answer to [`FlightSession::request_refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshRequest {
    Started(ResolutionTicket),
    Throttled,
    Busy,
    /// Nothing has been searched yet.
    NoQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The ticket belonged to a superseded search.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct FlightSession {
    settings: Settings,
    scheduler: RefreshScheduler,
    stale_after: Duration,
    query: Option<String>,
    outcome: Option<ResolutionOutcome>,
    generation: u64,
}

impl FlightSession {
    pub fn new(settings: Settings, refresh: &RefreshConfig) -> Self {
        Self {
            settings,
            scheduler: RefreshScheduler::new(refresh),
            stale_after: Duration::from_std(refresh.stale_after).unwrap_or(Duration::MAX),
            query: None,
            outcome: None,
            generation: 0,
        }
    }

    /// Start a new search from raw user input.
    ///
    /// Returns `None` when the input normalizes to nothing. Any resolution
    /// still running for an earlier search is superseded and its result will
    /// be discarded.
    pub fn begin_search(&mut self, raw_query: &str) -> Option<ResolutionTicket> {
        let query = normalize(raw_query);
        if query.is_empty() {
            return None;
        }

        if self.scheduler.phase() == Phase::Resolving {
            debug!("New search supersedes in-flight resolution");
        }
        self.generation += 1;
        self.scheduler.reset();
        self.scheduler.begin_search();
        self.outcome = None;
        self.query = Some(query.clone());

        info!(query = %query, generation = self.generation, "Starting flight search");
        Some(self.ticket(query, TicketKind::Search))
    }

    /// Evaluate the staleness timer; returns a ticket when an automatic
    /// refresh should run.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<ResolutionTicket> {
        let query = self.query.clone()?;
        let trigger = self.scheduler.on_tick(now)?;
        Some(self.ticket(query, TicketKind::Refresh(trigger)))
    }

    /// Ask for a manual refresh of the current query.
    pub fn request_refresh(&mut self, now: DateTime<Utc>) -> RefreshRequest {
        let Some(query) = self.query.clone() else {
            return RefreshRequest::NoQuery;
        };

        match self.scheduler.request_manual(now) {
            ManualRefresh::Accepted => RefreshRequest::Started(
                self.ticket(query, TicketKind::Refresh(RefreshTrigger::Manual)),
            ),
            ManualRefresh::Throttled => RefreshRequest::Throttled,
            ManualRefresh::Busy => RefreshRequest::Busy,
        }
    }

    /// Feed back the outcome of a ticket.
    ///
    /// A search replaces the displayed outcome whatever it is. A refresh only
    /// replaces it when it found the flight; a failed refresh keeps showing
    /// the last good record.
    pub fn complete(
        &mut self,
        ticket: ResolutionTicket,
        outcome: ResolutionOutcome,
        now: DateTime<Utc>,
    ) -> Completion {
        if ticket.generation != self.generation {
            debug!(
                query = %ticket.query,
                generation = ticket.generation,
                current = self.generation,
                "Discarding superseded resolution"
            );
            return Completion::Discarded;
        }

        let found = outcome.is_found();
        self.scheduler.complete(now, found);

        match ticket.kind {
            TicketKind::Search => self.outcome = Some(outcome),
            TicketKind::Refresh(_) if found => self.outcome = Some(outcome),
            TicketKind::Refresh(trigger) => {
                info!(
                    query = %ticket.query,
                    ?trigger,
                    "Refresh did not find the flight, keeping previous result"
                );
            }
        }
        Completion::Applied
    }

    /// Forget a resolution that will never report back, such as a task that
    /// panicked. The displayed outcome and refresh timestamps are kept.
    pub fn abandon(&mut self) {
        if self.scheduler.phase() == Phase::Resolving {
            debug!(query = ?self.query, "Abandoning in-flight resolution");
        }
        self.scheduler.abandon();
    }

    /// Drop the current flight and query. In-flight results will be discarded.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.scheduler.reset();
        self.query = None;
        self.outcome = None;
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub const fn outcome(&self) -> Option<&ResolutionOutcome> {
        self.outcome.as_ref()
    }

    /// The flight to display: the first entry of the latest `Found` outcome.
    pub fn current_flight(&self) -> Option<&Flight> {
        self.outcome.as_ref().and_then(ResolutionOutcome::primary)
    }

    pub fn derived(&self, now: DateTime<Utc>) -> Option<DerivedState> {
        self.current_flight()
            .map(|flight| DerivedState::compute(flight, now))
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        crate::derive::is_stale(self.scheduler.state().last_resolved_at, now, self.stale_after)
    }

    pub fn is_resolving(&self) -> bool {
        self.scheduler.phase() == Phase::Resolving
    }

    pub const fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    fn ticket(&self, query: String, kind: TicketKind) -> ResolutionTicket {
        ResolutionTicket {
            generation: self.generation,
            query,
            kind,
        }
    }
}
