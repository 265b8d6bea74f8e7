//! # Tomatick Core Library
//!
//! Core business logic for the Tomatick Pomodoro timer. The library is
//! CLI-first: every operation is available through the standalone CLI
//! binary, and any richer front-end stays a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates
//! - **Storage**: SQLite-based append-only session history and TOML-based
//!   configuration
//! - **Stats**: Daily and weekly aggregates over completed sessions
//! - **Cue**: Capability interface for the audio/notification sink
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Database`]: Session history and aggregate persistence
//! - [`Config`]: Application configuration management
//! - [`CueBus`]: Trait for platform cue sinks

pub mod clock;
pub mod cue;
pub mod error;
pub mod events;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::Clock;
pub use cue::{cue_for_event, CueBus, CueKind, NullCue};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use stats::{DailySummary, DayCounts, TypeTotals, WeeklyReport};
pub use storage::{Config, Database};
pub use timer::{Durations, IntervalKind, SessionType, TimerEngine, TimerState};
