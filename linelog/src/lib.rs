//! # linelog
//! Line-oriented logging with verbosity gating, one process-wide handler and service wrappers.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! linelog = "0.1.0"
//! ```
//!
//! Log calls work before any setup: they go to stdout, one line each.
//! ```rust
//! linelog::info!("Hello, world!");
//! ```
//!
//! ## Initialization
//! Each line is prefixed with the call's verbosity and location, e.g.
//! `L0 main.rs:12] count=42`, then rendered by the installed handler's pattern.
//! ```rust
//! use linelog::Settings;
//!
//! let settings = Settings {
//!     pattern: "%L%m%d %T.%f %t %v".into(),
//!     color: "none".into(),
//!     ..Default::default()
//! };
//! let _guard = linelog::initialize("demo", &settings, false).unwrap();
//! linelog::warn!("count={}", 42);
//! linelog::info!(v = 1; "only shown with LINELOG_V=1 or more");
//! // guard flushes and restores the default handler when dropped
//! ```
//!
//! ## Logging to files
//! A path selects a rotating log file written by a background thread.
//! ```rust
//! use linelog::Settings;
//!
//! let settings = Settings {
//!     path: "/tmp/linelog-demo.log".into(),
//!     max_size: 1 << 20,
//!     max_files: 2,
//!     ..Default::default()
//! };
//! let guard = linelog::initialize("demo", &settings, false).unwrap();
//! linelog::error!("written to the file");
//! drop(guard);
//! assert!(std::fs::read_to_string("/tmp/linelog-demo.log").unwrap().contains("written to the file"));
//! ```
//!
//! ## Services and tools
//! [`Service`] and [`Tool`] parse the logging flags (see [`LogFlags`]) out of the command
//! line, initialize logging and run a `main` closure, turning errors and panics into exit
//! code 1.

pub mod dispatch;
mod error;
mod factory;
mod flags;
mod gate;
mod handler;
mod logger;
mod macros;
mod service;
mod standard;
mod threaded;

pub use dispatch::{CriticalPolicy, critical_policy, set_critical_policy};
pub use error::{Error, Result};
pub use factory::{HandlerKind, create};
pub use flags::LogFlags;
pub use gate::{enabled, set_verbosity, terminal_color, verbosity};
pub use handler::{Handler, HandlerGuard, HandlerState, install, state, uninstall, with_active};
pub use linelog_core::{
    ColorMode, LINELOG_CONFIG, Level, LineBuffer, Location, MESSAGE_BUFFER_SIZE, Pattern,
    RotationConfig, Settings, SinkMode, TRUNCATION_MARKER, UnknownColor, basename, merge,
};
pub use logger::{LoggerGuard, bridge_log_crate, initialize, shutdown};
pub use service::{Application, Info, SERVICE_PATTERN, Service, TOOL_PATTERN, Tool, run_main};
pub use standard::StandardHandler;
pub use threaded::{ConsoleHandler, ThreadedHandler};
