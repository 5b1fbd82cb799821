//! Discard backend: drops everything except Fatal and Panic
//!
//! Fields and stacks are not kept at all. A Fatal message is written to
//! stderr and exits the process; a Panic message is written to stderr and
//! then panics with the message.

use crate::core::{
    fallback_print, format, terminate, FieldValue, LogLevel, Logger, Loglet,
};
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct DiscardLogger {
    /// Only levels are ever pushed here
    loglet: Loglet,
}

impl DiscardLogger {
    pub const fn new() -> Self {
        Self {
            loglet: Loglet::new(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.loglet.level()
    }
}

impl Logger for DiscardLogger {
    fn enabled(&self) -> bool {
        self.loglet.level().is_terminal()
    }

    fn printf(&self, args: fmt::Arguments<'_>) {
        let level = self.loglet.level();
        if !level.is_terminal() {
            return;
        }

        let message = format::render(args);
        fallback_print(level, &message);
        terminate(level, &message);
    }

    #[track_caller]
    fn with_level(&self, level: LogLevel) -> Self {
        Self {
            loglet: self.loglet.with_level(level),
        }
    }

    fn with_stack(&self, _skip: usize) -> Self {
        self.clone()
    }

    fn with_field<K, V>(&self, _key: K, _value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.clone()
    }

    fn with_fields<I, K, V>(&self, _fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.clone()
    }
}
