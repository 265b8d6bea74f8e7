//! Display formatting for the countdown and statistics views.

use super::{IntervalKind, TimerState};

/// Format seconds as a zero-padded `MM:SS` countdown string.
pub fn format_mmss(secs: u64) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format seconds as `"Xh Ym"` for the daily totals display.
pub fn format_hm(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{hours}h {minutes}m")
}

/// Status label for the current engine state.
///
/// Paused dominates; otherwise the label reflects interval kind and
/// whether the countdown is live.
pub fn status_label(state: TimerState, kind: IntervalKind) -> &'static str {
    match (state, kind) {
        (TimerState::Paused, _) => "Paused",
        (TimerState::Running, IntervalKind::Work) => "Work session",
        (TimerState::Running, IntervalKind::ShortBreak) => "Short break",
        (TimerState::Running, IntervalKind::LongBreak) => "Long break",
        (TimerState::Idle, IntervalKind::Work) => "Ready to work",
        (TimerState::Idle, IntervalKind::ShortBreak) => "Short break up next",
        (TimerState::Idle, IntervalKind::LongBreak) => "Long break up next",
    }
}
