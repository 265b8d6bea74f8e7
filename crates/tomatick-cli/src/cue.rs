//! Terminal cue sink.
//!
//! The platform-level implementation of [`CueBus`]: an ASCII BEL to the
//! controlling terminal. Richer sinks (OS notification sound, UI audio)
//! belong to richer front-ends.

use std::io::Write;

use tomatick_core::{CueBus, CueKind};

#[derive(Debug, Default)]
pub struct TerminalBell;

impl CueBus for TerminalBell {
    fn play(&self, kind: CueKind) {
        // The BEL goes to stderr: it rings the controlling terminal just the
        // same, while keeping stdout a clean machine-readable JSON stream.
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
        log::debug!("cue played: {kind:?}");
    }
}
