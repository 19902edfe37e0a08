use std::{
    io,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use crossbeam_channel::{RecvTimeoutError, Sender, bounded, unbounded};

use crate::{level::Level, log_writer::LogWriter, pattern::Pattern};

const BATCH_SIZE: usize = 32;

static NEXT_THREAD_NUMBER: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_NUMBER: u64 = NEXT_THREAD_NUMBER.fetch_add(1, Ordering::Relaxed);
}

/// Small process-unique number of the calling thread, used by the `%t` pattern token.
pub fn thread_number() -> u64 {
    THREAD_NUMBER.try_with(|number| *number).unwrap_or(0)
}

/// A finished log line on its way to a writer.
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub level: Level,
    pub message: String,
    pub time: DateTime<Utc>,
    pub thread: u64,
}

impl LogMessage {
    /// Stamps `message` with the current time and thread.
    pub fn new(level: Level, message: &str) -> Self {
        Self {
            level,
            message: message.into(),
            time: Utc::now(),
            thread: thread_number(),
        }
    }
}

enum Command {
    Message(LogMessage),
    Flush(Sender<()>),
    Shutdown,
}

/// Handle to a writer thread started by [`spawn_log_thread`].
///
/// Dropping the sender drains the queue, flushes the writer and joins the thread.
pub struct LogSender {
    sender: Sender<Command>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for LogSender {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl LogSender {
    fn new(sender: Sender<Command>, handler: JoinHandle<()>) -> Self {
        Self {
            sender,
            handler: Mutex::new(Some(handler)),
        }
    }

    /// Queues a message. Never blocks; a message sent after shutdown is dropped.
    pub fn send(&self, message: LogMessage) {
        self.sender.send(Command::Message(message)).ok();
    }

    /// Blocks until every message queued so far is written and the writer is flushed.
    pub fn flush(&self) {
        let (reply, done) = bounded(1);
        if self.sender.send(Command::Flush(reply)).is_ok() {
            done.recv().ok();
        }
    }

    pub fn shutdown(&self) {
        let mut guard = self.handler.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = guard.take() {
            // ignore error if the thread is already gone
            let _ = self.sender.send(Command::Shutdown);
            if handle.join().is_err() {
                eprintln!("linelog: writer thread panicked");
            }
        }
    }
}

/// Reports the first writer error to stderr and swallows the rest.
#[derive(Default)]
struct ErrorReporter {
    reported: bool,
}

impl ErrorReporter {
    fn check(&mut self, result: io::Result<()>) {
        if let Err(err) = result
            && !self.reported
        {
            eprintln!("linelog: unable to write log: {err}");
            self.reported = true;
        }
    }
}

/// Starts a thread that renders messages with `pattern` and hands them to `writer`.
///
/// Messages are processed in batches. The writer is flushed every `flush_interval` (never
/// periodically if zero), right after a batch holding a warning or worse, on
/// [`LogSender::flush`] and at shutdown.
pub fn spawn_log_thread<W: LogWriter + Send + 'static>(
    mut writer: W,
    pattern: Pattern,
    flush_interval: Duration,
) -> LogSender {
    let (sender, receiver) = unbounded::<Command>();
    let handler = std::thread::spawn(move || {
        let flush_interval = (!flush_interval.is_zero()).then_some(flush_interval);
        let mut batch = Vec::with_capacity(BATCH_SIZE);
        let mut waiters = Vec::new();
        let mut line = String::new();
        let mut reporter = ErrorReporter::default();
        let mut last_flush = Instant::now();
        let mut dirty = false;
        loop {
            let first = match flush_interval {
                Some(interval) => {
                    let timeout = interval
                        .saturating_sub(last_flush.elapsed())
                        .max(Duration::from_millis(1));
                    match receiver.recv_timeout(timeout) {
                        Ok(command) => command,
                        Err(RecvTimeoutError::Timeout) => {
                            if dirty {
                                reporter.check(writer.flush());
                                dirty = false;
                            }
                            last_flush = Instant::now();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match receiver.recv() {
                    Ok(command) => command,
                    Err(_) => break,
                },
            };
            batch.push(first);
            while batch.len() < BATCH_SIZE {
                match receiver.try_recv() {
                    Ok(command) => batch.push(command),
                    Err(_) => break,
                }
            }

            let mut should_shutdown = false;
            let mut urgent = false;
            for command in batch.drain(..) {
                match command {
                    Command::Message(message) => {
                        line.clear();
                        pattern.render(&mut line, &message);
                        reporter.check(writer.regular(&line));
                        dirty = true;
                        urgent |= message.level >= Level::Warning;
                    }
                    Command::Flush(reply) => {
                        urgent = true;
                        waiters.push(reply);
                    }
                    Command::Shutdown => {
                        should_shutdown = true;
                        break;
                    }
                }
            }

            let due = flush_interval.is_some_and(|interval| last_flush.elapsed() >= interval);
            if should_shutdown || urgent || due {
                reporter.check(writer.flush());
                dirty = false;
                last_flush = Instant::now();
            }
            for reply in waiters.drain(..) {
                reply.send(()).ok();
            }
            if should_shutdown {
                return;
            }
        }
        reporter.check(writer.flush());
    });
    LogSender::new(sender, handler)
}
