//! The process-wide handler slot.
//!
//! At most one custom [`Handler`] is installed at a time; whenever none is, log calls go to
//! the built-in [`StandardHandler`]. Installing and removing handlers is meant to happen while
//! the process is starting up or shutting down, not concurrently with logging from other
//! threads: the slot's lock keeps such races memory-safe but gives no ordering guarantees
//! about which handler a racing log call reaches.

use std::sync::{
    PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};

use linelog_core::Level;

use crate::{
    error::{Error, Result},
    standard::StandardHandler,
};

/// Destination of finished log lines.
pub trait Handler: Send + Sync {
    fn write(&self, level: Level, message: &str);

    /// Blocks until everything written so far has reached its destination.
    fn flush(&self) {}
}

struct Installed {
    id: u64,
    handler: Box<dyn Handler>,
}

static ACTIVE: RwLock<Option<Installed>> = RwLock::new(None);
static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static DEFAULT_HANDLER: StandardHandler = StandardHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Log calls go to the built-in standard handler.
    Default,
    /// A custom handler is installed.
    Custom,
}

pub fn state() -> HandlerState {
    let slot = ACTIVE.read().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        HandlerState::Custom
    } else {
        HandlerState::Default
    }
}

/// Makes `handler` the destination of every log call until the guard is dropped.
///
/// Fails with [`Error::HandlerAlreadyInstalled`] while another custom handler is installed.
pub fn install(handler: Box<dyn Handler>) -> Result<HandlerGuard> {
    let mut slot = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(Error::HandlerAlreadyInstalled);
    }
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    *slot = Some(Installed { id, handler });
    Ok(HandlerGuard { id })
}

/// Flushes and removes the custom handler, if any. Returns whether one was installed.
pub fn uninstall() -> bool {
    let installed = ACTIVE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    release(installed)
}

fn uninstall_id(id: u64) -> bool {
    let installed = {
        let mut slot = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(current) if current.id == id => slot.take(),
            _ => None,
        }
    };
    release(installed)
}

// flushed and dropped outside the lock so that a slow sink does not stall log calls
fn release(installed: Option<Installed>) -> bool {
    match installed {
        Some(installed) => {
            installed.handler.flush();
            true
        }
        None => false,
    }
}

/// Runs `f` with the installed handler, or the standard handler when there is none.
pub fn with_active<R>(f: impl FnOnce(&dyn Handler) -> R) -> R {
    let slot = ACTIVE.read().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
        Some(installed) => f(installed.handler.as_ref()),
        None => f(&DEFAULT_HANDLER),
    }
}

/// Keeps a handler installed. Dropping it flushes the handler and restores the default.
///
/// Dropping a guard whose handler was already removed with [`uninstall`] does nothing.
#[must_use = "the handler is removed as soon as the guard is dropped"]
pub struct HandlerGuard {
    id: u64,
}

impl HandlerGuard {
    pub fn is_installed(&self) -> bool {
        let slot = ACTIVE.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().is_some_and(|installed| installed.id == self.id)
    }
}

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        uninstall_id(self.id);
    }
}
