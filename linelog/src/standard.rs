use std::io::{self, Write};

use linelog_core::Level;

use crate::handler::Handler;

/// Writes every line, unadorned, to stdout and flushes it right away.
///
/// This is where log calls go while no other handler is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardHandler;

impl Handler for StandardHandler {
    fn write(&self, _level: Level, message: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{message}");
        let _ = stdout.flush();
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

#[test]
fn test_standard_handler() {
    let handler = StandardHandler;
    handler.write(Level::Info, "hello from the standard handler");
    handler.write(Level::Critical, "");
    handler.flush();
}
