use std::{
    io::{self, IsTerminal},
    str::FromStr,
};

use linelog_core::{Pattern, RotationConfig, Settings, SinkMode};

use crate::{
    error::{Error, Result},
    handler::Handler,
    standard::StandardHandler,
    threaded::{ConsoleHandler, ThreadedHandler},
};

/// Which handler `initialize` builds, chosen through `LINELOG_HANDLER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Plain lines to stdout, like the default fallback.
    Standard,
    /// Pattern-rendered lines to the console or a rotating file.
    Threaded,
}

impl FromStr for HandlerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.eq_ignore_ascii_case("std") || s.eq_ignore_ascii_case("standard") {
            Ok(HandlerKind::Standard)
        } else if s.eq_ignore_ascii_case("threaded") {
            Ok(HandlerKind::Threaded)
        } else {
            Err(Error::UnknownHandler(s.into()))
        }
    }
}

/// Builds the handler for already merged `settings`.
///
/// A threaded handler writes synchronously to the console when stdout is a terminal and no
/// path is set, and through a writer thread otherwise. `Standard` ignores the settings.
/// Nothing process-wide is changed.
pub fn create(
    kind: HandlerKind,
    settings: &Settings,
    program_name: &str,
) -> Result<Box<dyn Handler>> {
    let is_terminal = io::stdout().is_terminal();
    let color = settings.color_mode()?.resolve(is_terminal);
    match kind {
        HandlerKind::Standard => Ok(Box::new(StandardHandler)),
        HandlerKind::Threaded => create_threaded(settings, program_name, is_terminal, color),
    }
}

fn create_threaded(
    settings: &Settings,
    program_name: &str,
    is_terminal: bool,
    color: bool,
) -> Result<Box<dyn Handler>> {
    let pattern = Pattern::parse(&settings.pattern).with_name(program_name);
    let handler: Box<dyn Handler> = match settings.sink_mode(is_terminal) {
        SinkMode::Synchronous => Box::new(ConsoleHandler::new(pattern, color)),
        SinkMode::Asynchronous if settings.has_path() => {
            let config = RotationConfig {
                path: settings.path.clone(),
                max_file_size: settings.max_size,
                max_files: settings.max_files,
                rotate_on_open: settings.rotate_on_open(),
            };
            Box::new(ThreadedHandler::file(config, pattern, settings.flush_freq)?)
        }
        SinkMode::Asynchronous => {
            Box::new(ThreadedHandler::stdout(pattern, color, settings.flush_freq))
        }
    };
    Ok(handler)
}
