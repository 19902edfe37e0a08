//! Process-wide verbosity and terminal color flag.
//!
//! Both are written once while logging is initialized and read on every log call.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

static VERBOSITY: AtomicU32 = AtomicU32::new(0);
static TERMINAL_COLOR: AtomicBool = AtomicBool::new(false);

pub fn verbosity() -> u32 {
    VERBOSITY.load(Ordering::Relaxed)
}

pub fn set_verbosity(level: u32) {
    VERBOSITY.store(level, Ordering::Relaxed);
}

/// Whether a call site requiring verbosity `required` should log.
///
/// A requirement of 0 always logs.
#[inline]
pub fn enabled(required: u32) -> bool {
    required == 0 || verbosity() >= required
}

pub fn terminal_color() -> bool {
    TERMINAL_COLOR.load(Ordering::Relaxed)
}

pub(crate) fn set_terminal_color(yes: bool) {
    TERMINAL_COLOR.store(yes, Ordering::Relaxed);
}
