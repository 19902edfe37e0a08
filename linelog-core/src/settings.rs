use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

/// Logging settings. Empty strings, zero numbers and `None` mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub pattern: String,
    pub flush_freq: Duration,
    pub path: PathBuf,
    pub max_size: u64,
    pub max_files: u32,
    pub rotate_on_open: Option<bool>,
    pub color: String,
    pub verbosity: Option<u32>,
}

impl Settings {
    pub const DEFAULT_FLUSH_FREQ: Duration = Duration::from_secs(3);
    pub const DEFAULT_MAX_SIZE: u64 = 1 << 30;
    pub const DEFAULT_MAX_FILES: u32 = 3;
    pub const DEFAULT_ROTATE_ON_OPEN: bool = true;
    pub const DEFAULT_COLOR: &'static str = "auto";

    /// The documented defaults, used beneath any explicit settings.
    pub fn defaults() -> Self {
        Self {
            pattern: String::new(),
            flush_freq: Self::DEFAULT_FLUSH_FREQ,
            path: PathBuf::new(),
            max_size: Self::DEFAULT_MAX_SIZE,
            max_files: Self::DEFAULT_MAX_FILES,
            rotate_on_open: Some(Self::DEFAULT_ROTATE_ON_OPEN),
            color: Self::DEFAULT_COLOR.into(),
            verbosity: None,
        }
    }

    pub fn has_path(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    pub fn rotate_on_open(&self) -> bool {
        self.rotate_on_open.unwrap_or(Self::DEFAULT_ROTATE_ON_OPEN)
    }

    pub fn color_mode(&self) -> Result<ColorMode, UnknownColor> {
        self.color.parse()
    }

    pub fn sink_mode(&self, is_terminal: bool) -> SinkMode {
        SinkMode::select(self.has_path(), is_terminal)
    }
}

fn pick_string(explicit: &str, default: &str) -> String {
    (if explicit.is_empty() { default } else { explicit }).to_owned()
}

fn pick_number<T: Copy + Default + PartialEq>(explicit: T, default: T) -> T {
    if explicit == T::default() {
        default
    } else {
        explicit
    }
}

/// Field by field, an explicitly set value wins over the one from `defaults`.
pub fn merge(explicit: &Settings, defaults: &Settings) -> Settings {
    Settings {
        pattern: pick_string(&explicit.pattern, &defaults.pattern),
        flush_freq: pick_number(explicit.flush_freq, defaults.flush_freq),
        path: if explicit.has_path() {
            explicit.path.clone()
        } else {
            defaults.path.clone()
        },
        max_size: pick_number(explicit.max_size, defaults.max_size),
        max_files: pick_number(explicit.max_files, defaults.max_files),
        rotate_on_open: explicit.rotate_on_open.or(defaults.rotate_on_open),
        color: pick_string(&explicit.color, &defaults.color),
        verbosity: explicit.verbosity.or(defaults.verbosity),
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"{{pattern="{}", flush_freq={:?}, path="{}", max_size={}, max_files={}, rotate_on_open={}, color="{}", verbosity={}}}"#,
            self.pattern,
            self.flush_freq,
            self.path.display(),
            self.max_size,
            self.max_files,
            self.rotate_on_open(),
            self.color,
            self.verbosity.map_or_else(|| "-".to_owned(), |v| v.to_string()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown color: \"{0}\" (expected one of: always, auto, none)")]
pub struct UnknownColor(pub String);

/// Whether console output is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    Always,
    #[default]
    Auto,
    Never,
}

impl FromStr for ColorMode {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            Ok(ColorMode::Auto)
        } else if s.eq_ignore_ascii_case("always") {
            Ok(ColorMode::Always)
        } else if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("never") {
            Ok(ColorMode::Never)
        } else {
            Err(UnknownColor(s.into()))
        }
    }
}

impl ColorMode {
    /// `Auto` colors only when stdout is an interactive terminal.
    pub fn resolve(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Auto => is_terminal,
            ColorMode::Never => false,
        }
    }
}

/// How a sink hands lines to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// Written and flushed by the calling thread.
    Synchronous,
    /// Queued to a writer thread that flushes periodically.
    Asynchronous,
}

impl SinkMode {
    /// Interactive sessions (terminal, no file) are synchronous, everything else is not.
    pub fn select(has_path: bool, is_terminal: bool) -> Self {
        if !has_path && is_terminal {
            SinkMode::Synchronous
        } else {
            SinkMode::Asynchronous
        }
    }
}
