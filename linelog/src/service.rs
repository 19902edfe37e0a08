use std::{
    ffi::OsString,
    fmt::Display,
    panic::{self, AssertUnwindSafe},
    path::Path,
};

use clap::Parser;
use linelog_core::{Settings, merge};

use crate::{
    error::Result,
    flags::LogFlags,
    logger::{self, LoggerGuard, panic_message},
};

/// Line pattern of long running services: level letter, date, time, thread and message.
pub const SERVICE_PATTERN: &str = "%L%m%d %T.%f %t %v";
/// Line pattern of command line tools: the message only.
pub const TOOL_PATTERN: &str = "%v";

/// Build information reported when a service starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Info {
    pub description: &'static str,
    pub package_name: &'static str,
    pub build_version: &'static str,
    pub build_type: &'static str,
    pub git_hash: &'static str,
}

#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    log: LogFlags,

    /// Arguments passed on to the program
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

struct Launch {
    args: Vec<String>,
    logger: LoggerGuard,
}

/// Parses the logging flags out of `args` and initializes logging with `pattern` unless
/// `--log-pattern` is given. Exits the process on a command line error.
fn launch<I, T>(args: I, pattern: &str) -> Result<Launch>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let program_name = args
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| e.exit());
    let defaults = Settings {
        pattern: pattern.into(),
        ..Settings::defaults()
    };
    let settings = merge(&cli.log.settings(), &defaults);
    let logger = logger::initialize(&program_name, &settings, true)?;
    Ok(Launch {
        args: cli.args,
        logger,
    })
}

/// A long running process. Logging stays up until the service is dropped.
///
/// ```rust,no_run
/// use linelog::{Info, Service};
///
/// let service = Service::new(std::env::args(), Info::default()).unwrap();
/// let code = service.run(|args| {
///     linelog::info!("args={args:?}");
///     Ok::<_, std::io::Error>(0)
/// });
/// std::process::exit(code);
/// ```
pub struct Service {
    info: Info,
    args: Vec<String>,
    _logger: LoggerGuard,
}

pub type Application = Service;

impl Service {
    pub fn new<I, T>(args: I, info: Info) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let Launch { args, logger } = launch(args, SERVICE_PATTERN)?;
        Ok(Self {
            info,
            args,
            _logger: logger,
        })
    }

    /// Arguments left after the logging flags were parsed.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Runs `main` between start and stop markers and returns its exit code.
    pub fn run<E, F>(self, main: F) -> i32
    where
        E: Display,
        F: FnOnce(&[String]) -> std::result::Result<i32, E>,
    {
        run_main(&self.info, || main(&self.args))
    }
}

/// A command line tool: plain message lines, no start and stop markers.
pub struct Tool {
    args: Vec<String>,
    _logger: LoggerGuard,
}

impl Tool {
    pub fn new<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let Launch { args, logger } = launch(args, TOOL_PATTERN)?;
        Ok(Self {
            args,
            _logger: logger,
        })
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn run<E, F>(self, main: F) -> i32
    where
        E: Display,
        F: FnOnce(&[String]) -> std::result::Result<i32, E>,
    {
        run_guarded(|| main(&self.args))
    }
}

/// Brackets `main` with `===== START =====` and `===== STOP =====`.
///
/// A non-zero exit code is logged as a warning. An error or a panic escaping `main` is
/// logged as an error and turned into exit code 1.
pub fn run_main<E, F>(info: &Info, main: F) -> i32
where
    E: Display,
    F: FnOnce() -> std::result::Result<i32, E>,
{
    crate::info!("===== START =====");
    crate::info!(
        r#"Process: name="{}", description="{}", version="{}", build="{}", git="{}""#,
        info.package_name,
        info.description,
        info.build_version,
        info.build_type,
        info.git_hash
    );
    let code = run_guarded(main);
    if code != 0 {
        crate::warn!("exit-code={code}");
    }
    crate::info!("===== STOP =====");
    code
}

fn run_guarded<E, F>(main: F) -> i32
where
    E: Display,
    F: FnOnce() -> std::result::Result<i32, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(main)) {
        Ok(Ok(code)) => code,
        Ok(Err(err)) => {
            crate::error!("Unhandled error: {err}");
            1
        }
        Err(payload) => {
            crate::error!("Unhandled panic: {}", panic_message(payload.as_ref()));
            1
        }
    }
}
