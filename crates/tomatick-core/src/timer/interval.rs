use serde::{Deserialize, Serialize};

/// Which interval the engine is currently counting down.
///
/// Only the work/break distinction is persisted; short vs long break is a
/// transient property of the running cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl IntervalKind {
    /// Fold both break kinds into the persisted classification.
    pub fn session_type(self) -> SessionType {
        match self {
            IntervalKind::Work => SessionType::Work,
            IntervalKind::ShortBreak | IntervalKind::LongBreak => SessionType::Break,
        }
    }

    pub fn is_work(self) -> bool {
        self == IntervalKind::Work
    }
}

/// Persisted session classification, stored as `work` / `break` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Work,
    Break,
}

impl SessionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::Break => "break",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "work" => Some(SessionType::Work),
            "break" => Some(SessionType::Break),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allowed configuration bounds, in minutes.
pub const WORK_MINUTES: std::ops::RangeInclusive<u64> = 1..=60;
pub const SHORT_BREAK_MINUTES: std::ops::RangeInclusive<u64> = 1..=30;
pub const LONG_BREAK_MINUTES: std::ops::RangeInclusive<u64> = 1..=60;

/// Configured interval lengths in seconds.
///
/// Durations are clamped into the documented bounds at construction, so a
/// zero-length interval can never reach the progress-fraction divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub work_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
}

impl Durations {
    /// Build from configured minutes, clamping out-of-range values.
    pub fn from_minutes(work: u64, short_break: u64, long_break: u64) -> Self {
        Self {
            work_secs: clamp_range(work, WORK_MINUTES) * 60,
            short_break_secs: clamp_range(short_break, SHORT_BREAK_MINUTES) * 60,
            long_break_secs: clamp_range(long_break, LONG_BREAK_MINUTES) * 60,
        }
    }

    pub fn for_kind(&self, kind: IntervalKind) -> u64 {
        match kind {
            IntervalKind::Work => self.work_secs,
            IntervalKind::ShortBreak => self.short_break_secs,
            IntervalKind::LongBreak => self.long_break_secs,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
        }
    }
}

fn clamp_range(value: u64, range: std::ops::RangeInclusive<u64>) -> u64 {
    value.clamp(*range.start(), *range.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let d = Durations::default();
        assert_eq!(d.work_secs, 1500);
        assert_eq!(d.short_break_secs, 300);
        assert_eq!(d.long_break_secs, 900);
    }

    #[test]
    fn from_minutes_clamps_to_bounds() {
        let d = Durations::from_minutes(0, 0, 0);
        assert_eq!(d.work_secs, 60);
        assert_eq!(d.short_break_secs, 60);
        assert_eq!(d.long_break_secs, 60);

        let d = Durations::from_minutes(600, 600, 600);
        assert_eq!(d.work_secs, 60 * 60);
        assert_eq!(d.short_break_secs, 30 * 60);
        assert_eq!(d.long_break_secs, 60 * 60);
    }

    #[test]
    fn both_breaks_persist_as_break() {
        assert_eq!(IntervalKind::ShortBreak.session_type(), SessionType::Break);
        assert_eq!(IntervalKind::LongBreak.session_type(), SessionType::Break);
        assert_eq!(IntervalKind::Work.session_type(), SessionType::Work);
    }

    #[test]
    fn session_type_round_trips_through_text() {
        assert_eq!(SessionType::parse("work"), Some(SessionType::Work));
        assert_eq!(SessionType::parse("break"), Some(SessionType::Break));
        assert_eq!(SessionType::parse("focus"), None);
    }
}
