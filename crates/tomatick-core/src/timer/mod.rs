mod engine;
mod format;
mod interval;

pub use engine::{TimerEngine, TimerState};
pub use format::{format_hm, format_mmss, status_label};
pub use interval::{
    Durations, IntervalKind, SessionType, LONG_BREAK_MINUTES, SHORT_BREAK_MINUTES, WORK_MINUTES,
};
