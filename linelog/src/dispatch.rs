//! Entry points behind the logging macros.
//!
//! Every function renders its prefix and message into the calling thread's [`LineBuffer`]
//! and hands the finished line to the active handler. None of them fail: a message longer
//! than the buffer is cut short with a marker.
//!
//! [`LineBuffer`]: linelog_core::LineBuffer

use std::{
    fmt::{self, Write},
    io,
    sync::atomic::{AtomicBool, Ordering},
};

use linelog_core::{
    Level, LineBuffer, Location, with_line_buffer, write_debug_prefix, write_prefix,
    write_system_error_prefix,
};

use crate::handler;

/// What [`critical`] does once the message is flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalPolicy {
    /// Abort the process, like [`fatal`].
    Abort,
    /// Carry on, as for an error.
    Continue,
}

static CRITICAL_ABORTS: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Debug builds abort on critical messages by default, release builds continue.
pub fn critical_policy() -> CriticalPolicy {
    if CRITICAL_ABORTS.load(Ordering::Relaxed) {
        CriticalPolicy::Abort
    } else {
        CriticalPolicy::Continue
    }
}

pub fn set_critical_policy(policy: CriticalPolicy) {
    CRITICAL_ABORTS.store(policy == CriticalPolicy::Abort, Ordering::Relaxed);
}

fn emit(level: Level, render: impl FnOnce(&mut LineBuffer)) {
    with_line_buffer(|buffer| {
        render(buffer);
        let line = buffer.finish();
        handler::with_active(|handler| handler.write(level, line));
    });
}

fn flush() {
    handler::with_active(|handler| handler.flush());
}

pub fn dispatch(level: Level, verbosity: u32, location: Location<'_>, args: fmt::Arguments<'_>) {
    emit(level, |buffer| {
        write_prefix(buffer, verbosity, location);
        let _ = buffer.write_fmt(args);
    });
}

pub fn debug(verbosity: u32, location: Location<'_>, args: fmt::Arguments<'_>) {
    emit(Level::Debug, |buffer| {
        write_debug_prefix(buffer, verbosity, location);
        let _ = buffer.write_fmt(args);
    });
}

/// Logs a warning describing `error`, which should be captured before any argument is
/// evaluated.
pub fn system_error(
    verbosity: u32,
    location: Location<'_>,
    error: &io::Error,
    args: fmt::Arguments<'_>,
) {
    emit(Level::Warning, |buffer| {
        write_system_error_prefix(buffer, verbosity, location, error);
        let _ = buffer.write_fmt(args);
    });
}

/// Logs and flushes, then aborts if the [`CriticalPolicy`] says so.
pub fn critical(location: Location<'_>, args: fmt::Arguments<'_>) {
    dispatch(Level::Critical, 0, location, args);
    flush();
    if critical_policy() == CriticalPolicy::Abort {
        std::process::abort();
    }
}

/// Logs and flushes, then aborts.
pub fn fatal(location: Location<'_>, args: fmt::Arguments<'_>) -> ! {
    dispatch(Level::Critical, 0, location, args);
    flush();
    std::process::abort()
}

/// Logs a critical message and flushes without ever aborting.
pub(crate) fn report(location: Location<'_>, args: fmt::Arguments<'_>) {
    dispatch(Level::Critical, 0, location, args);
    flush();
}
