//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |  \
//!           |   `-- stop()  -> Idle (fresh work interval, incomplete record)
//!           `------ tick()==0 -> Idle (next interval selected, complete record)
//! ```
//!
//! Work and break are orthogonal to the running/paused axis: [`IntervalKind`]
//! selects which configured duration governs the countdown.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Durations::default());
//! engine.start();
//! // In a loop:
//! engine.tick(); // Returns Some(Event) on completion
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::format::{format_mmss, status_label};
use super::interval::{Durations, IntervalKind};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread. Commands that need
/// a reference instant come in pairs: `start()` reads the system clock,
/// `start_at(now_ms)` takes an explicit epoch-millisecond instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    durations: Durations,
    state: TimerState,
    kind: IntervalKind,
    /// Remaining whole seconds in the current interval.
    remaining_secs: u64,
    /// Configured length of the interval in progress.
    total_secs: u64,
    /// Completed work intervals since engine creation. Drives the
    /// every-4th-completion long-break rule.
    cycle_count: u64,
    /// Completed work intervals for `today`, seeded from storage and
    /// incremented locally on completion.
    #[serde(default)]
    today_completed: u64,
    /// The date `today_completed` was derived for. Callers re-seed via
    /// [`TimerEngine::sync_today`] when the local date rolls over.
    #[serde(default)]
    today: Option<NaiveDate>,
    /// Epoch-millisecond anchor for elapsed-time computation while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl TimerEngine {
    /// Create an idle engine holding a fresh work interval.
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            state: TimerState::Idle,
            kind: IntervalKind::Work,
            remaining_secs: durations.work_secs,
            total_secs: durations.work_secs,
            cycle_count: 0,
            today_completed: 0,
            today: None,
            last_tick_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn kind(&self) -> IntervalKind {
        self.kind
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn today_completed(&self) -> u64 {
        self.today_completed
    }

    pub fn today(&self) -> Option<NaiveDate> {
        self.today
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            kind: self.kind,
            session_type: self.kind.session_type(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            display: format_mmss(self.remaining_secs),
            status: status_label(self.state, self.kind).to_string(),
            progress: self.progress(),
            cycle_count: self.cycle_count,
            today_completed: self.today_completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. No-op unless idle.
    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    pub fn start_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now_ms);
                Some(Event::TimerStarted {
                    kind: self.kind,
                    duration_secs: self.total_secs,
                    at: Utc::now(),
                })
            }
            // Already running (possibly paused): ignore, not an error.
            TimerState::Running | TimerState::Paused => None,
        }
    }

    /// Flip between running and paused. No-op while idle.
    ///
    /// Resuming re-anchors the tick reference so paused wall-clock time is
    /// never counted against the interval.
    pub fn toggle_pause(&mut self) -> Option<Event> {
        self.toggle_pause_at(now_ms())
    }

    pub fn toggle_pause_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.consume_elapsed(now_ms);
                self.state = TimerState::Paused;
                self.last_tick_epoch_ms = None;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now_ms);
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Idle => None,
        }
    }

    /// Abandon the interval in progress.
    ///
    /// Emits a `TimerStopped` event carrying the elapsed seconds; the caller
    /// persists it with `completed = false`. Always resets to a fresh work
    /// interval, regardless of which interval kind was active.
    pub fn stop(&mut self) -> Option<Event> {
        self.stop_at(now_ms())
    }

    pub fn stop_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                if self.state == TimerState::Running {
                    self.consume_elapsed(now_ms);
                }
                let elapsed = self.total_secs.saturating_sub(self.remaining_secs);
                let session_type = self.kind.session_type();
                self.to_fresh_work();
                Some(Event::TimerStopped {
                    session_type,
                    elapsed_secs: elapsed,
                    at: Utc::now(),
                })
            }
            TimerState::Idle => None,
        }
    }

    /// Force idle with a fresh work interval. Emits no session record --
    /// unlike `stop()`, reset is "undo my own preview", not "I gave up".
    pub fn reset(&mut self) -> Option<Event> {
        self.to_fresh_work();
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Advance the countdown. Call on every scheduling opportunity.
    ///
    /// No-op unless running and unpaused. Consumes every whole elapsed
    /// second since the anchor and moves the anchor forward by exactly the
    /// consumed amount, so sub-second scheduling jitter and late invocation
    /// lose no time. Returns `Some(Event::IntervalCompleted)` on the tick
    /// in which the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.consume_elapsed(now_ms);
        if self.remaining_secs == 0 {
            return Some(self.complete_interval());
        }
        None
    }

    /// Replace the configured durations.
    ///
    /// While idle this also resets the pending countdown to a fresh work
    /// interval; a live countdown keeps its current length.
    pub fn set_durations(&mut self, durations: Durations) {
        self.durations = durations;
        if self.state == TimerState::Idle {
            self.to_fresh_work();
        }
    }

    /// Seed the cached today-completed count from storage.
    pub fn sync_today(&mut self, completed: u64, date: NaiveDate) {
        self.today_completed = completed;
        self.today = Some(date);
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Consume whole elapsed seconds and advance the anchor by exactly the
    /// consumed amount. The sub-second remainder stays anchored.
    fn consume_elapsed(&mut self, now_ms: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed_secs = now_ms.saturating_sub(last) / 1000;
            if elapsed_secs > 0 {
                self.remaining_secs = self.remaining_secs.saturating_sub(elapsed_secs);
                self.last_tick_epoch_ms = Some(last + elapsed_secs * 1000);
            }
        }
    }

    /// The countdown reached zero naturally: log the finished interval and
    /// select the next one. The engine returns to idle -- completion never
    /// auto-starts the next countdown.
    fn complete_interval(&mut self) -> Event {
        let finished = self.kind;
        let duration_secs = self.total_secs;

        if finished.is_work() {
            self.cycle_count += 1;
            self.today_completed += 1;
            // Long break precisely on every 4th completed work interval.
            self.kind = if self.cycle_count % 4 == 0 {
                IntervalKind::LongBreak
            } else {
                IntervalKind::ShortBreak
            };
        } else {
            self.kind = IntervalKind::Work;
        }

        self.total_secs = self.durations.for_kind(self.kind);
        self.remaining_secs = self.total_secs;
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;

        Event::IntervalCompleted {
            finished: finished.session_type(),
            duration_secs,
            next: self.kind,
            cycle_count: self.cycle_count,
            at: Utc::now(),
        }
    }

    fn to_fresh_work(&mut self) {
        self.state = TimerState::Idle;
        self.kind = IntervalKind::Work;
        self.remaining_secs = self.durations.work_secs;
        self.total_secs = self.durations.work_secs;
        self.last_tick_epoch_ms = None;
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
