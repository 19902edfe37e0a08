//! # linelog-core
//! Core building blocks for linelog - line buffers, patterns, settings and log writers.

mod config;
mod format;
mod level;
mod line_buffer;
mod log_rotation;
mod log_writer;
mod pattern;
mod settings;
mod utils;

pub use config::{LINELOG_CONFIG, LinelogConfig, verbosity_override};
pub use format::{
    Location, basename, describe_os_error, write_debug_prefix, write_prefix,
    write_system_error_prefix,
};
pub use level::Level;
pub use line_buffer::{LineBuffer, MESSAGE_BUFFER_SIZE, TRUNCATION_MARKER, with_line_buffer};
pub use log_rotation::{RotatingFile, RotationConfig, rotated_path};
pub use log_writer::{LogStderr, LogStdout, LogWriter};
pub use pattern::{DEFAULT_PATTERN, Pattern, paint};
pub use settings::{ColorMode, Settings, SinkMode, UnknownColor, merge};
pub use utils::{LogMessage, LogSender, spawn_log_thread, thread_number};
