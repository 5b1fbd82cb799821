//! The `Logger` contract every backend implements
//!
//! Backends compose a [`Loglet`](super::Loglet) with their own sink. All
//! chaining methods are pure: they return a new logger and leave the
//! receiver untouched, so one configured logger can be shared and branched
//! freely across threads.
//!
//! # Example
//!
//! ```
//! use loglet::prelude::*;
//!
//! let (logger, rx) = ChannelLogger::new(16).unwrap();
//!
//! let request = logger.info().with_field("request_id", "abc-123");
//! request.print(&[&"handled in", &42, &"ms"]);
//!
//! let msg = rx.recv().unwrap();
//! assert_eq!(msg.message, "handled in 42 ms");
//! assert_eq!(msg.level, LogLevel::Info);
//! ```

use super::fields::{FieldValue, ERROR_FIELD_KEY};
use super::format::Spaced;
use super::log_level::LogLevel;
use std::fmt;

pub trait Logger: Clone + Send + Sync + 'static {
    /// Whether a message printed right now would be recorded
    fn enabled(&self) -> bool;

    /// The logger itself together with [`Logger::enabled`], so callers can
    /// skip expensive field computation
    fn with_enabled(&self) -> (Self, bool) {
        (self.clone(), self.enabled())
    }

    /// Submit a `format_args!` message at the current level
    fn printf(&self, args: fmt::Arguments<'_>);

    /// Submit the operands joined by spaces
    fn print(&self, args: &[&dyn fmt::Display]) {
        self.printf(format_args!("{}", Spaced(args)));
    }

    /// Like [`Logger::print`] with a trailing line terminator
    fn println(&self, args: &[&dyn fmt::Display]) {
        self.printf(format_args!("{}\n", Spaced(args)));
    }

    /// # Panics
    ///
    /// Implementations panic when `level` is [`LogLevel::Undefined`].
    #[must_use]
    fn with_level(&self, level: LogLevel) -> Self;

    /// Attach a call stack snapshot omitting `skip` frames above the
    /// caller. Wrappers forwarding this call add one to `skip`.
    #[must_use]
    fn with_stack(&self, skip: usize) -> Self;

    #[must_use]
    fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>;

    #[must_use]
    fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>;

    #[must_use]
    fn with_error(&self, err: &dyn std::error::Error) -> Self {
        self.with_field(ERROR_FIELD_KEY, err.to_string())
    }

    #[must_use]
    fn debug(&self) -> Self {
        self.with_level(LogLevel::Debug)
    }

    #[must_use]
    fn info(&self) -> Self {
        self.with_level(LogLevel::Info)
    }

    #[must_use]
    fn warn(&self) -> Self {
        self.with_level(LogLevel::Warn)
    }

    #[must_use]
    fn error(&self) -> Self {
        self.with_level(LogLevel::Error)
    }

    #[must_use]
    fn fatal(&self) -> Self {
        self.with_level(LogLevel::Fatal)
    }

    #[must_use]
    fn panic(&self) -> Self {
        self.with_level(LogLevel::Panic)
    }
}

/// Exit status used after a Fatal message
pub const FATAL_EXIT_CODE: i32 = 1;

/// Finish a Fatal or Panic message once it has been emitted.
///
/// Fatal exits the process, Panic unwinds with `message` as payload. Other
/// levels return immediately.
pub fn terminate(level: LogLevel, message: &str) {
    match level {
        LogLevel::Fatal => std::process::exit(FATAL_EXIT_CODE),
        LogLevel::Panic => std::panic::panic_any(message.to_owned()),
        _ => {}
    }
}

/// Minimal last-resort output on stderr
pub fn fallback_print(level: LogLevel, message: &str) {
    eprintln!("[{}] {}", level, message);
}
