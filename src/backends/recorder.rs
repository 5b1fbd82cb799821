//! Recording backend for tests
//!
//! Every enabled print is appended, as a [`Message`], to a list shared by
//! all loggers branched from the same root. Fatal and Panic messages are
//! recorded like any other and do not terminate anything, which is what
//! makes this backend usable to assert on them.

use crate::core::{format, FieldValue, LogLevel, Logger, Loglet, Message};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Recording {
    threshold: LogLevel,
    messages: Mutex<Vec<Message>>,
}

#[derive(Debug, Clone)]
pub struct RecorderLogger {
    loglet: Loglet,
    recording: Arc<Recording>,
}

impl RecorderLogger {
    /// Recorder accepting every level
    pub fn new() -> Self {
        Self::with_threshold(LogLevel::Debug)
    }

    /// Recorder accepting `threshold` and anything more severe
    ///
    /// # Panics
    ///
    /// Panics when `threshold` is [`LogLevel::Undefined`].
    #[track_caller]
    pub fn with_threshold(threshold: LogLevel) -> Self {
        if !threshold.is_valid() {
            panic!("{}", crate::LoggerError::invalid_level(threshold.into()));
        }

        Self {
            loglet: Loglet::new(),
            recording: Arc::new(Recording {
                threshold,
                messages: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of everything recorded so far, oldest first
    pub fn messages(&self) -> Vec<Message> {
        self.recording.messages.lock().clone()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<Message> {
        std::mem::take(&mut *self.recording.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.recording.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.recording.messages.lock().clear();
    }

    pub fn loglet(&self) -> &Loglet {
        &self.loglet
    }

    fn derive(&self, loglet: Loglet) -> Self {
        Self {
            loglet,
            recording: Arc::clone(&self.recording),
        }
    }
}

impl Default for RecorderLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for RecorderLogger {
    fn enabled(&self) -> bool {
        self.recording.threshold.enables(self.loglet.level())
    }

    fn printf(&self, args: fmt::Arguments<'_>) {
        if !self.enabled() {
            return;
        }

        let msg = Message::from_loglet(&self.loglet, format::render(args));
        self.recording.messages.lock().push(msg);
    }

    #[track_caller]
    fn with_level(&self, level: LogLevel) -> Self {
        self.derive(self.loglet.with_level(level))
    }

    #[inline(never)]
    fn with_stack(&self, skip: usize) -> Self {
        self.derive(self.loglet.with_stack(skip.saturating_add(1)))
    }

    fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.derive(self.loglet.with_field(key, value))
    }

    fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.derive(self.loglet.with_fields(fields))
    }
}
