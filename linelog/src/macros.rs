//! Logging macros.
//!
//! `info!`, `warn!`, `error!`, `debug!` and `system_error!` accept an optional leading
//! `v = N;` (a constant) so that the call only logs while the process verbosity is at least
//! `N`. A call that does not log evaluates none of its arguments.
//!
//! ```rust
//! let answer = 42;
//! linelog::info!("answer={answer}");
//! linelog::warn!(v = 2; "only logged with verbosity 2 or more: {}", answer);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level:expr, $v:expr, $($arg:tt)+) => {{
        const __REQUIRED: u32 = $v;
        if $crate::enabled(__REQUIRED) {
            $crate::dispatch::dispatch(
                $level,
                __REQUIRED,
                $crate::Location::new(file!(), line!()),
                format_args!($($arg)+),
            );
        }
    }};
}

#[macro_export]
macro_rules! info {
    (v = $v:expr; $($arg:tt)+) => { $crate::__log!($crate::Level::Info, $v, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Info, 0, $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    (v = $v:expr; $($arg:tt)+) => { $crate::__log!($crate::Level::Warning, $v, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Warning, 0, $($arg)+) };
}

#[macro_export]
macro_rules! error {
    (v = $v:expr; $($arg:tt)+) => { $crate::__log!($crate::Level::Error, $v, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Error, 0, $($arg)+) };
}

/// Like `info!` with a `DEBUG: ` marker. Compiled out unless `debug_assertions` is on.
#[macro_export]
macro_rules! debug {
    (v = $v:expr; $($arg:tt)+) => {{
        if cfg!(debug_assertions) {
            const __REQUIRED: u32 = $v;
            if $crate::enabled(__REQUIRED) {
                $crate::dispatch::debug(
                    __REQUIRED,
                    $crate::Location::new(file!(), line!()),
                    format_args!($($arg)+),
                );
            }
        }
    }};
    ($($arg:tt)+) => { $crate::debug!(v = 0; $($arg)+) };
}

/// Logs a warning prefixed with the last OS error, read before the arguments are evaluated.
#[macro_export]
macro_rules! system_error {
    (v = $v:expr; $($arg:tt)+) => {{
        let __error = ::std::io::Error::last_os_error();
        const __REQUIRED: u32 = $v;
        if $crate::enabled(__REQUIRED) {
            $crate::dispatch::system_error(
                __REQUIRED,
                $crate::Location::new(file!(), line!()),
                &__error,
                format_args!($($arg)+),
            );
        }
    }};
    ($($arg:tt)+) => { $crate::system_error!(v = 0; $($arg)+) };
}

/// Logs and flushes a critical message. Aborts when the critical policy is `Abort`.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::dispatch::critical(
            $crate::Location::new(file!(), line!()),
            format_args!($($arg)+),
        )
    };
}

/// Logs and flushes a critical message, then aborts.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::dispatch::fatal(
            $crate::Location::new(file!(), line!()),
            format_args!($($arg)+),
        )
    };
}
