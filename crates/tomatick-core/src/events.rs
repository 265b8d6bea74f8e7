use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{IntervalKind, SessionType, TimerState};

/// Every state change in the engine produces an Event.
///
/// The presentation layer polls for events; `TimerStopped` and
/// `IntervalCompleted` carry exactly the `(type, duration, completed)`
/// triple the session store persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        kind: IntervalKind,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Interval abandoned mid-countdown. Persisted with `completed = false`.
    TimerStopped {
        session_type: SessionType,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero naturally. Persisted with `completed = true`.
    IntervalCompleted {
        finished: SessionType,
        duration_secs: u64,
        next: IntervalKind,
        cycle_count: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        kind: IntervalKind,
        session_type: SessionType,
        remaining_secs: u64,
        total_secs: u64,
        display: String,
        status: String,
        progress: f64,
        cycle_count: u64,
        today_completed: u64,
        at: DateTime<Utc>,
    },
}
