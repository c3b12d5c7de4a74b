//! Refresh timing policy.
//!
//! Two independent rules decide when a flight is re-resolved: a staleness
//! timer evaluated on every tick, and a throttle gate that swallows manual
//! refresh requests for a cool-down after each attempt. At most one
//! resolution is in flight at any time.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::config::RefreshConfig;
use crate::derive::is_stale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Resolving,
}

/// Why a resolution was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The staleness timer fired.
    Automatic,
    /// The user asked for a refresh.
    Manual,
}

/// Answer to a manual refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualRefresh {
    Accepted,
    /// Inside the cool-down window; the request is dropped.
    Throttled,
    /// A resolution is already running; the request is dropped.
    Busy,
}

/// Timestamps the scheduler keeps between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshState {
    pub last_resolved_at: Option<DateTime<Utc>>,
    pub throttled_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    stale_after: Duration,
    throttle: Duration,
    state: RefreshState,
    phase: Phase,
}

impl RefreshScheduler {
    pub fn new(config: &RefreshConfig) -> Self {
        Self {
            stale_after: to_chrono(config.stale_after),
            throttle: to_chrono(config.throttle),
            state: RefreshState::default(),
            phase: Phase::Idle,
        }
    }

    pub const fn state(&self) -> RefreshState {
        self.state
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        is_stale(self.state.last_resolved_at, now, self.stale_after)
    }

    pub fn is_throttled(&self, now: DateTime<Utc>) -> bool {
        self.state.throttled_until.is_some_and(|until| now < until)
    }

    /// Evaluate the staleness timer.
    ///
    /// Returns `Some(Automatic)` and enters `Resolving` when the last
    /// successful resolution has gone stale and nothing is in flight. The
    /// throttle gate does not apply to automatic refreshes.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<RefreshTrigger> {
        if self.phase == Phase::Resolving || !self.is_stale(now) {
            return None;
        }

        debug!("Resolved flight is stale, starting automatic refresh");
        self.phase = Phase::Resolving;
        Some(RefreshTrigger::Automatic)
    }

    /// Gate a manual refresh request.
    pub fn request_manual(&mut self, now: DateTime<Utc>) -> ManualRefresh {
        if self.phase == Phase::Resolving {
            return ManualRefresh::Busy;
        }
        if self.is_throttled(now) {
            debug!("Manual refresh ignored during cool-down");
            return ManualRefresh::Throttled;
        }

        self.phase = Phase::Resolving;
        ManualRefresh::Accepted
    }

    /// Enter `Resolving` for a fresh search. Searches are never throttled.
    ///
    /// Returns `false` when a resolution is already in flight.
    pub fn begin_search(&mut self) -> bool {
        if self.phase == Phase::Resolving {
            return false;
        }
        self.phase = Phase::Resolving;
        true
    }

    /// Record the end of an attempt and start the cool-down.
    pub fn complete(&mut self, now: DateTime<Utc>, succeeded: bool) {
        self.phase = Phase::Idle;
        if succeeded {
            self.state.last_resolved_at = Some(now);
        }
        self.state.throttled_until = Some(now + self.throttle);
    }

    /// Drop any in-flight marker without touching timestamps.
    ///
    /// Used when the resolution that was running is abandoned.
    pub fn abandon(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Forget everything, as when the view is cleared.
    pub fn reset(&mut self) {
        self.state = RefreshState::default();
        self.phase = Phase::Idle;
    }
}

fn to_chrono(duration: std::time::Duration) -> Duration {
    Duration::from_std(duration).unwrap_or(Duration::MAX)
}
