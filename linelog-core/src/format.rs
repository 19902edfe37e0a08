use std::{fmt::Write, io};

use crate::line_buffer::LineBuffer;

/// Source location of a log call, captured where the call is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl<'a> Location<'a> {
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }
}

impl Location<'static> {
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), location.line())
    }
}

fn is_separator(ch: char) -> bool {
    ch == '/' || (cfg!(windows) && ch == '\\')
}

/// Returns the last component of `path`.
///
/// Trailing separators are skipped, so `"abc/def/"` yields `"def"`. A path made only of
/// separators is returned unchanged.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        return path;
    }
    match trimmed.rfind(is_separator) {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// `L{verbosity} {file}:{line}] `
pub fn write_prefix(buffer: &mut LineBuffer, verbosity: u32, location: Location<'_>) {
    let _ = write!(
        buffer,
        "L{verbosity} {}:{}] ",
        basename(location.file),
        location.line
    );
}

/// `L{verbosity} {file}:{line}] DEBUG: `
pub fn write_debug_prefix(buffer: &mut LineBuffer, verbosity: u32, location: Location<'_>) {
    write_prefix(buffer, verbosity, location);
    buffer.append("DEBUG: ");
}

/// `L{verbosity} {file}:{line}] {description} [{code}] `
pub fn write_system_error_prefix(
    buffer: &mut LineBuffer,
    verbosity: u32,
    location: Location<'_>,
    error: &io::Error,
) {
    write_prefix(buffer, verbosity, location);
    match error.raw_os_error() {
        Some(code) => {
            let _ = write!(buffer, "{} [{code}] ", describe_os_error(code));
        }
        None => {
            let _ = write!(buffer, "{error} [-] ");
        }
    }
}

/// Text of an OS error code without the ` (os error N)` suffix std appends.
pub fn describe_os_error(code: i32) -> String {
    let text = io::Error::from_raw_os_error(code).to_string();
    let suffix = format!(" (os error {code})");
    match text.strip_suffix(&suffix) {
        Some(description) => description.to_owned(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename(""), "");
        assert_eq!(basename("abc"), "abc");
        assert_eq!(basename("abc/def"), "def");
        assert_eq!(basename("abc/def/ghi"), "ghi");
        assert_eq!(basename("/abs/path/main.rs"), "main.rs");
        assert_eq!(basename("abc/def/"), "def");
        assert_eq!(basename("abc//"), "abc");
        assert_eq!(basename("/"), "/");
    }

    #[test]
    fn test_basename_idempotent() {
        for path in [
            "",
            "/",
            "//",
            "abc",
            "abc/",
            "abc/def",
            "abc/def/ghi",
            "/usr/lib/",
            "src/bin/main.rs",
        ] {
            let once = basename(path);
            assert_eq!(basename(once), once, "path: {path:?}");
        }
    }

    #[test]
    fn test_prefix() {
        let mut buffer = LineBuffer::with_capacity(128);
        write_prefix(&mut buffer, 0, Location::new("src/server/session.rs", 42));
        buffer.append("hello");
        assert_eq!(buffer.finish(), "L0 session.rs:42] hello");
    }

    #[test]
    fn test_debug_prefix() {
        let mut buffer = LineBuffer::with_capacity(128);
        write_debug_prefix(&mut buffer, 3, Location::new("main.rs", 7));
        assert_eq!(buffer.finish(), "L3 main.rs:7] DEBUG: ");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_error_prefix() {
        let mut buffer = LineBuffer::with_capacity(128);
        let error = io::Error::from_raw_os_error(2);
        write_system_error_prefix(&mut buffer, 0, Location::new("a/io.rs", 9), &error);
        assert_eq!(buffer.finish(), "L0 io.rs:9] No such file or directory [2] ");
    }

    #[test]
    fn test_caller_location() {
        let location = Location::caller();
        assert_eq!(basename(location.file), "format.rs");
        assert_eq!(location.line, line!() - 2);
    }
}
