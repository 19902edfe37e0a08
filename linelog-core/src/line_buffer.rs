use std::{cell::RefCell, fmt};

/// Capacity of the per-thread line buffer.
pub const MESSAGE_BUFFER_SIZE: usize = 65_536;

/// Written in place of the overflowed tail of a line.
pub const TRUNCATION_MARKER: &str = " ...";

const MARKER_LEN: usize = TRUNCATION_MARKER.len();

/// Fixed-capacity, append-only text buffer used to render one log line.
///
/// The last [`TRUNCATION_MARKER`] bytes of the capacity are reserved: writes that do not fit
/// are dropped and flag the buffer as overflowed, and [`LineBuffer::finish`] then fills the
/// reserved space with the marker. Writing never fails and never reallocates.
#[derive(Debug)]
pub struct LineBuffer {
    text: String,
    capacity: usize,
    overflow: bool,
    marked: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MESSAGE_BUFFER_SIZE)
    }

    /// Capacities too small to hold the marker are raised to the smallest usable one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MARKER_LEN + 1);
        Self {
            text: String::with_capacity(capacity),
            capacity,
            overflow: false,
            marked: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    fn remain(&self) -> usize {
        self.capacity
            .saturating_sub(MARKER_LEN)
            .saturating_sub(self.text.len())
    }

    /// Copies as much of `text` as fits, never splitting a character.
    pub fn append(&mut self, text: &str) {
        if self.overflow {
            return;
        }
        let remain = self.remain();
        if text.len() <= remain {
            self.text.push_str(text);
            return;
        }
        let mut end = remain;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.text.push_str(&text[..end]);
        self.overflow = true;
    }

    pub fn push_back(&mut self, ch: char) {
        if !self.overflow && ch.len_utf8() <= self.remain() {
            self.text.push(ch);
        } else {
            self.overflow = true;
        }
    }

    /// Terminates the line and returns it. An overflowed line ends with the marker.
    pub fn finish(&mut self) -> &str {
        if self.overflow && !self.marked {
            self.text.push_str(TRUNCATION_MARKER);
            self.marked = true;
        }
        &self.text
    }

    /// Resets the buffer for the next line, keeping its storage.
    pub fn clear(&mut self) {
        self.text.clear();
        self.overflow = false;
        self.marked = false;
    }
}

impl fmt::Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.push_back(c);
        Ok(())
    }
}

thread_local! {
    /// Scratch buffer owned by each thread, reused across log calls.
    static LINE_BUFFER: RefCell<LineBuffer> = RefCell::new(LineBuffer::new());
}

/// Runs `f` with the calling thread's line buffer, cleared.
///
/// A re-entrant call (a `Display` impl that logs while being formatted) or a call during
/// thread teardown gets a temporary buffer instead.
pub fn with_line_buffer<R>(f: impl FnOnce(&mut LineBuffer) -> R) -> R {
    let reusable = LINE_BUFFER
        .try_with(|buffer| buffer.try_borrow_mut().is_ok())
        .unwrap_or(false);
    if reusable {
        LINE_BUFFER.with_borrow_mut(|buffer| {
            buffer.clear();
            f(buffer)
        })
    } else {
        f(&mut LineBuffer::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_fits_without_marker() {
        let mut buffer = LineBuffer::with_capacity(16);
        buffer.append("hello");
        buffer.push_back('!');
        assert!(!buffer.overflowed());
        assert_eq!(buffer.finish(), "hello!");
    }

    #[test]
    fn test_truncation_fills_capacity_exactly() {
        for capacity in [5, 8, 16, 100, MESSAGE_BUFFER_SIZE] {
            for extra in [1, 3, 4, 57, 10_000] {
                let mut buffer = LineBuffer::with_capacity(capacity);
                let message = "x".repeat(capacity + extra);
                write!(buffer, "{message}").unwrap();
                let line = buffer.finish();
                assert_eq!(line.len(), capacity);
                assert!(line.ends_with(TRUNCATION_MARKER));
                assert!(line[..capacity - MARKER_LEN].bytes().all(|b| b == b'x'));
            }
        }
    }

    #[test]
    fn test_exactly_reserved_limit_is_not_truncated() {
        let mut buffer = LineBuffer::with_capacity(10);
        buffer.append("abcdef");
        assert!(!buffer.overflowed());
        buffer.push_back('g');
        assert!(buffer.overflowed());
        assert_eq!(buffer.finish(), "abcdef ...");
    }

    #[test]
    fn test_writes_after_overflow_are_dropped() {
        let mut buffer = LineBuffer::with_capacity(12);
        buffer.append("0123456789");
        buffer.append("z");
        buffer.push_back('y');
        assert_eq!(buffer.finish(), "01234567 ...");
    }

    #[test]
    fn test_finish_is_stable() {
        let mut buffer = LineBuffer::with_capacity(8);
        buffer.append("too long for this");
        let first = buffer.finish().to_owned();
        assert_eq!(buffer.finish(), first);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_multibyte_is_never_split() {
        let mut buffer = LineBuffer::with_capacity(9);
        buffer.append("aéééé");
        let line = buffer.finish();
        assert!(line.len() <= 9);
        assert_eq!(line, "aéé ...");
    }

    #[test]
    fn test_clear_keeps_storage() {
        let mut buffer = LineBuffer::with_capacity(8);
        buffer.append("overflowing");
        buffer.finish();
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(!buffer.overflowed());
        buffer.append("ok");
        assert_eq!(buffer.finish(), "ok");
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn test_tiny_capacity_is_raised() {
        let buffer = LineBuffer::with_capacity(0);
        assert_eq!(buffer.capacity(), MARKER_LEN + 1);
    }

    #[test]
    fn test_thread_buffer_is_cleared_between_uses() {
        with_line_buffer(|buffer| buffer.append("first"));
        let second = with_line_buffer(|buffer| {
            buffer.append("second");
            buffer.finish().to_owned()
        });
        assert_eq!(second, "second");
    }

    #[test]
    fn test_reentrant_use_gets_scratch_buffer() {
        let (outer, inner) = with_line_buffer(|outer| {
            outer.append("outer");
            let inner = with_line_buffer(|inner| {
                inner.append("inner");
                inner.finish().to_owned()
            });
            (outer.finish().to_owned(), inner)
        });
        assert_eq!(outer, "outer");
        assert_eq!(inner, "inner");
    }
}
