use linelog_core::UnknownColor;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors. Log calls themselves never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    UnknownColor(#[from] UnknownColor),

    #[error("Unknown logging type: \"{0}\"")]
    UnknownHandler(String),

    #[error("Logger is singleton: a handler is already installed")]
    HandlerAlreadyInstalled,

    #[error("Unable to open log: {0}")]
    Io(#[from] std::io::Error),
}
