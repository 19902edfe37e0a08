use std::fmt::Write;

use chrono::{Datelike, Timelike};
use colored::Colorize;

use crate::{level::Level, utils::LogMessage};

/// Pattern used when the `pattern` setting is empty.
pub const DEFAULT_PATTERN: &str = "[%Y-%m-%dT%H:%M:%S.%e %l] %v";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Message,
    LevelLetter,
    LevelName,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Time,
    Millis,
    Micros,
    Thread,
    Name,
}

/// Decoration applied by sinks around each rendered line.
///
/// | token | expands to |
/// |-------|------------|
/// | `%v`  | the message |
/// | `%L`  | level letter (`I`, `W`, ...) |
/// | `%l`  | level name |
/// | `%Y` `%m` `%d` | date |
/// | `%H` `%M` `%S` | time of day, `%T` is `%H:%M:%S` |
/// | `%e` `%f` | milliseconds, microseconds |
/// | `%t`  | thread number |
/// | `%n`  | program name |
/// | `%%`  | a literal `%` |
///
/// Anything else is copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
    name: String,
}

impl Default for Pattern {
    fn default() -> Self {
        Self::parse(DEFAULT_PATTERN)
    }
}

impl Pattern {
    pub fn parse(pattern: &str) -> Self {
        let pattern = if pattern.is_empty() {
            DEFAULT_PATTERN
        } else {
            pattern
        };
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                literal.push(ch);
                continue;
            }
            let token = match chars.next() {
                Some('v') => Token::Message,
                Some('L') => Token::LevelLetter,
                Some('l') => Token::LevelName,
                Some('Y') => Token::Year,
                Some('m') => Token::Month,
                Some('d') => Token::Day,
                Some('H') => Token::Hour,
                Some('M') => Token::Minute,
                Some('S') => Token::Second,
                Some('T') => Token::Time,
                Some('e') => Token::Millis,
                Some('f') => Token::Micros,
                Some('t') => Token::Thread,
                Some('n') => Token::Name,
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some(other) => {
                    literal.push('%');
                    literal.push(other);
                    continue;
                }
                None => {
                    literal.push('%');
                    continue;
                }
            };
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        Self {
            tokens,
            name: String::new(),
        }
    }

    /// Sets the program name substituted for `%n`.
    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn render(&self, out: &mut String, message: &LogMessage) {
        let time = &message.time;
        for token in &self.tokens {
            let _ = match token {
                Token::Literal(text) => {
                    out.push_str(text);
                    Ok(())
                }
                Token::Message => {
                    out.push_str(&message.message);
                    Ok(())
                }
                Token::LevelLetter => {
                    out.push(message.level.letter());
                    Ok(())
                }
                Token::LevelName => {
                    out.push_str(message.level.as_str());
                    Ok(())
                }
                Token::Year => write!(out, "{:04}", time.year()),
                Token::Month => write!(out, "{:02}", time.month()),
                Token::Day => write!(out, "{:02}", time.day()),
                Token::Hour => write!(out, "{:02}", time.hour()),
                Token::Minute => write!(out, "{:02}", time.minute()),
                Token::Second => write!(out, "{:02}", time.second()),
                Token::Time => write!(
                    out,
                    "{:02}:{:02}:{:02}",
                    time.hour(),
                    time.minute(),
                    time.second()
                ),
                Token::Millis => write!(out, "{:03}", time.timestamp_subsec_millis() % 1_000),
                Token::Micros => write!(out, "{:06}", time.timestamp_subsec_micros() % 1_000_000),
                Token::Thread => write!(out, "{}", message.thread),
                Token::Name => {
                    out.push_str(&self.name);
                    Ok(())
                }
            };
        }
    }

    pub fn format(&self, message: &LogMessage) -> String {
        let mut out = String::with_capacity(message.message.len() + 48);
        self.render(&mut out, message);
        out
    }
}

/// Terminal colors per level: debug yellow, warning bold, error and critical bold red.
pub fn paint(level: Level, line: &str) -> String {
    match level {
        Level::Debug => line.yellow().bold().to_string(),
        Level::Info => line.to_string(),
        Level::Warning => line.bold().to_string(),
        Level::Error | Level::Critical => line.red().bold().to_string(),
    }
}
