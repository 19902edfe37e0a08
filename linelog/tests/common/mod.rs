#![allow(dead_code)]

use std::{
    ffi::OsStr,
    process::{Command, Output},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use linelog::{Handler, HandlerGuard, Level};

/// Keeps every line it is given.
#[derive(Clone, Default)]
pub struct Capture {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
    flushes: Arc<AtomicUsize>,
}

impl Capture {
    pub fn install(&self) -> HandlerGuard {
        linelog::install(Box::new(self.clone())).unwrap()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, line)| line).collect()
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl Handler for Capture {
    fn write(&self, level: Level, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_owned()));
    }

    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Runs the test `name` alone in a new process of the current test binary, with `var` set.
///
/// Used for behavior that ends the process or needs the real stdout.
pub fn rerun(name: &str, var: &str, value: impl AsRef<OsStr>) -> Output {
    Command::new(std::env::current_exe().unwrap())
        .args([name, "--exact", "--nocapture", "--quiet", "--test-threads=1"])
        .env(var, value)
        .output()
        .unwrap()
}
