use std::io::{self, Write};

/// Destination of rendered lines, driven by the writer thread.
pub trait LogWriter {
    fn regular(&mut self, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

#[derive(Default, Debug)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

#[derive(Default, Debug)]
pub struct LogStderr;

impl LogWriter for LogStderr {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[test]
fn test_log_stdout() {
    let mut log_stdout = LogStdout;
    log_stdout.regular("Hello, world!").unwrap();
    log_stdout.flush().unwrap();
    let mut log_stderr = LogStderr;
    log_stderr.regular("rust is awesome !").unwrap();
    log_stderr.flush().unwrap();
}
