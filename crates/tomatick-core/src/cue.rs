//! Audio/notification cue abstraction.
//!
//! The engine never synthesizes sound. It emits events; the platform layer
//! decides what a cue sounds like (terminal bell, OS notification, UI audio).

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::timer::SessionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    /// A countdown began (timer started, or a break ended and work is next).
    Start,
    /// A work interval finished.
    Complete,
}

/// Capability interface for playing cues.
pub trait CueBus {
    fn play(&self, kind: CueKind);
}

/// Sink that plays nothing. Used when notifications are disabled.
#[derive(Debug, Default)]
pub struct NullCue;

impl CueBus for NullCue {
    fn play(&self, _kind: CueKind) {}
}

/// Which cue, if any, an event maps to.
///
/// Mirrors the running cycle: a start cue when the countdown begins and
/// when a finished break hands over to work; a complete cue when a work
/// interval finishes.
pub fn cue_for_event(event: &Event) -> Option<CueKind> {
    match event {
        Event::TimerStarted { .. } => Some(CueKind::Start),
        Event::IntervalCompleted {
            finished: SessionType::Work,
            ..
        } => Some(CueKind::Complete),
        Event::IntervalCompleted {
            finished: SessionType::Break,
            ..
        } => Some(CueKind::Start),
        _ => None,
    }
}
