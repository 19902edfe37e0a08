use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Args};
use linelog_core::Settings;

/// Command line flags controlling logging. Flatten them into a program's own parser.
#[derive(Debug, Clone, Args)]
pub struct LogFlags {
    /// Pattern of log lines, e.g. "%L%m%d %T.%f %t %v"
    #[arg(long)]
    pub log_pattern: Option<String>,

    /// Interval between flushes of buffered output (e.g. 500ms, 3s, 1m)
    #[arg(long, default_value = "3s", value_parser = parse_duration)]
    pub log_flush_freq: Duration,

    /// Log to this file instead of stdout
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Size in bytes at which the log file is rotated, at least 1
    #[arg(
        long,
        default_value_t = Settings::DEFAULT_MAX_SIZE,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub log_max_size: u64,

    /// Number of rotated log files to keep, at least 1
    #[arg(
        long,
        default_value_t = Settings::DEFAULT_MAX_FILES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub log_max_files: u32,

    /// Rotate a non-empty log file when it is opened
    #[arg(long, default_value_t = Settings::DEFAULT_ROTATE_ON_OPEN, action = ArgAction::Set)]
    pub log_rotate_on_open: bool,

    /// Terminal colors: always, auto or none
    #[arg(long, default_value = Settings::DEFAULT_COLOR)]
    pub color: String,

    /// Verbosity level, overridden by LINELOG_V
    #[arg(long)]
    pub log_verbosity: Option<u32>,
}

impl LogFlags {
    pub fn settings(&self) -> Settings {
        Settings {
            pattern: self.log_pattern.clone().unwrap_or_default(),
            flush_freq: self.log_flush_freq,
            path: self.log_path.clone().unwrap_or_default(),
            max_size: self.log_max_size,
            max_files: self.log_max_files,
            rotate_on_open: Some(self.log_rotate_on_open),
            color: self.color.clone(),
            verbosity: self.log_verbosity,
        }
    }
}

/// Parses an integer with an optional unit: `ns`, `us`, `ms`, `s`, `m` or `h`. No unit
/// means seconds.
fn parse_duration(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    let split = text
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, unit) = text.split_at(split);
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration: \"{text}\""))?;
    let duration = match unit.trim() {
        "ns" => Duration::from_nanos(value),
        "us" => Duration::from_micros(value),
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        "h" => Duration::from_secs(value.saturating_mul(3600)),
        other => return Err(format!("unknown duration unit: \"{other}\"")),
    };
    Ok(duration)
}
