use std::{io, time::Duration};

use linelog_core::{
    Level, LogMessage, LogSender, LogStderr, LogStdout, LogWriter, Pattern, RotatingFile,
    RotationConfig, paint, spawn_log_thread,
};

use crate::handler::Handler;

/// Renders and writes each line on the calling thread, then flushes.
///
/// Errors and criticals go to stderr, everything else to stdout.
pub struct ConsoleHandler {
    pattern: Pattern,
    color: bool,
}

impl ConsoleHandler {
    pub fn new(pattern: Pattern, color: bool) -> Self {
        Self { pattern, color }
    }
}

impl Handler for ConsoleHandler {
    fn write(&self, level: Level, message: &str) {
        let mut line = self.pattern.format(&LogMessage::new(level, message));
        if self.color {
            line = paint(level, &line);
        }
        let _ = if level >= Level::Error {
            write_line(&mut LogStderr, &line)
        } else {
            write_line(&mut LogStdout, &line)
        };
    }

    fn flush(&self) {
        let _ = LogStdout.flush();
        let _ = LogStderr.flush();
    }
}

fn write_line(writer: &mut impl LogWriter, line: &str) -> io::Result<()> {
    writer.regular(line)?;
    writer.flush()
}

/// Hands lines to a background writer thread.
///
/// The thread flushes every `flush_interval`, after any warning or worse, and when
/// [`Handler::flush`] is called. Dropping the handler drains the queue and joins the thread.
pub struct ThreadedHandler {
    sender: LogSender,
    color: bool,
}

impl ThreadedHandler {
    pub fn stdout(pattern: Pattern, color: bool, flush_interval: Duration) -> Self {
        Self {
            sender: spawn_log_thread(LogStdout, pattern, flush_interval),
            color,
        }
    }

    pub fn file(
        config: RotationConfig,
        pattern: Pattern,
        flush_interval: Duration,
    ) -> io::Result<Self> {
        let file = RotatingFile::new(config)?;
        Ok(Self::with_writer(file, pattern, flush_interval))
    }

    pub fn with_writer<W: LogWriter + Send + 'static>(
        writer: W,
        pattern: Pattern,
        flush_interval: Duration,
    ) -> Self {
        Self {
            sender: spawn_log_thread(writer, pattern, flush_interval),
            color: false,
        }
    }
}

impl Handler for ThreadedHandler {
    fn write(&self, level: Level, message: &str) {
        let message = if self.color {
            LogMessage::new(level, &paint(level, message))
        } else {
            LogMessage::new(level, message)
        };
        self.sender.send(message);
    }

    fn flush(&self) {
        self.sender.flush();
    }
}
