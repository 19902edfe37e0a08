use std::{
    any::Any,
    backtrace::Backtrace,
    io::{self, IsTerminal},
    panic,
    sync::Once,
};

use linelog_core::{LINELOG_CONFIG, Level, Location, Settings, merge};
use log::{LevelFilter, Log};

use crate::{
    dispatch,
    error::{Error, Result},
    factory::{self, HandlerKind},
    gate,
    handler::{self, HandlerGuard, HandlerState},
};

/// Sets up process-wide logging.
///
/// `settings` are merged over [`Settings::defaults`]. The verbosity comes from
/// `LINELOG_V` when that is set and non-negative, from `settings` otherwise. The handler
/// kind comes from `LINELOG_HANDLER`. With `crash_handler`, panics are logged at critical
/// level with a backtrace before the previous panic hook runs.
///
/// Logging is shut down when the returned guard is dropped.
///
/// ```rust
/// use linelog::Settings;
///
/// let settings = Settings {
///     color: "none".into(),
///     ..Default::default()
/// };
/// let _guard = linelog::initialize("demo", &settings, false).unwrap();
/// linelog::info!("Hello, world!");
/// ```
pub fn initialize(
    program_name: &str,
    settings: &Settings,
    crash_handler: bool,
) -> Result<LoggerGuard> {
    let settings = merge(settings, &Settings::defaults());
    let color_mode = settings.color_mode()?;
    let kind: HandlerKind = LINELOG_CONFIG.HANDLER.parse()?;
    if handler::state() == HandlerState::Custom {
        return Err(Error::HandlerAlreadyInstalled);
    }

    let handler = factory::create(kind, &settings, program_name)?;
    let guard = handler::install(handler)?;

    // process-wide state is only touched once the handler is in place
    let color = color_mode.resolve(io::stdout().is_terminal());
    gate::set_terminal_color(color);
    if color {
        colored::control::set_override(true);
    }
    let verbosity = LINELOG_CONFIG
        .verbosity()
        .or(settings.verbosity)
        .unwrap_or(0);
    gate::set_verbosity(verbosity);

    bridge_log_crate();
    if crash_handler {
        install_crash_hook();
    }
    crate::info!(v = 1; "Logging initialized for {program_name}: {settings}");
    Ok(LoggerGuard { _handler: guard })
}

/// Flushes and removes the handler installed by [`initialize`].
///
/// Calling it again, or logging afterwards, is fine: log calls go to the default handler.
pub fn shutdown() {
    handler::uninstall();
}

/// Shuts logging down when dropped.
#[must_use = "LoggerGuard must be kept alive to keep logging set up. Do \"let _guard = linelog::initialize(...)?;\""]
pub struct LoggerGuard {
    _handler: HandlerGuard,
}

/// Routes records of the `log` crate to the active handler.
struct Bridge;

impl Log for Bridge {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let location = Location::new(
            record.file().unwrap_or("<unknown>"),
            record.line().unwrap_or(0),
        );
        match Level::from(record.level()) {
            Level::Debug => dispatch::debug(0, location, *record.args()),
            level => dispatch::dispatch(level, 0, location, *record.args()),
        }
    }

    fn flush(&self) {
        handler::with_active(|handler| handler.flush());
    }
}

/// Installs the `log` bridge once. Leaves any other `log` logger in place.
pub fn bridge_log_crate() {
    static BRIDGE: Once = Once::new();
    BRIDGE.call_once(|| {
        if log::set_boxed_logger(Box::new(Bridge)).is_ok() {
            let level = if cfg!(debug_assertions) {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            log::set_max_level(level);
        }
    });
}

fn install_crash_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|location| Location::new(location.file(), location.line()))
                .unwrap_or(Location::new("<unknown>", 0));
            let backtrace = Backtrace::force_capture();
            dispatch::report(
                location,
                format_args!(
                    "panic: {} at {}:{}\n{backtrace}",
                    panic_message(info.payload()),
                    location.file,
                    location.line
                ),
            );
            previous(info);
        }));
    });
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "Box<dyn Any>"
    }
}

#[test]
fn test_panic_message() {
    let payload: Box<dyn Any + Send> = Box::new("static text");
    assert_eq!(panic_message(payload.as_ref()), "static text");
    let payload: Box<dyn Any + Send> = Box::new(String::from("owned text"));
    assert_eq!(panic_message(payload.as_ref()), "owned text");
    let payload: Box<dyn Any + Send> = Box::new(7_u8);
    assert_eq!(panic_message(payload.as_ref()), "Box<dyn Any>");
}
