//! Bridge to the `log` crate facade
//!
//! Messages are handed to whatever `log::Log` implementation the process
//! installed. `log` records carry no structured fields, so fields are
//! appended to the message text as sorted `key=value` pairs. Fatal and
//! Panic map to `log::Level::Error` and keep their semantics after the
//! record has been logged.

use crate::core::{format, terminate, FieldValue, LogLevel, Logger, Loglet};
use std::fmt;
use std::sync::Arc;

/// Target used when none is configured
pub const DEFAULT_TARGET: &str = "loglet";

#[derive(Debug, Clone)]
pub struct LogLogger {
    loglet: Loglet,
    target: Arc<str>,
}

impl LogLogger {
    pub fn new() -> Self {
        Self::with_target(DEFAULT_TARGET)
    }

    /// Logger emitting records under `target`
    pub fn with_target(target: impl Into<Arc<str>>) -> Self {
        Self {
            loglet: Loglet::new(),
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn loglet(&self) -> &Loglet {
        &self.loglet
    }

    fn derive(&self, loglet: Loglet) -> Self {
        Self {
            loglet,
            target: Arc::clone(&self.target),
        }
    }

    fn record_text(&self, message: &str) -> String {
        let fields = self.loglet.fields_map();
        let mut text = if fields.is_empty() {
            message.to_string()
        } else if message.is_empty() {
            fields.format_fields()
        } else {
            format!("{} {}", message, fields.format_fields())
        };

        if let Some(frame) = self.loglet.call_stack().as_deref().and_then(|s| s.top()) {
            text.push_str(" caller=");
            text.push_str(frame.name());
        }
        text
    }
}

impl Default for LogLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// `log` level a message is emitted at
pub fn to_log_level(level: LogLevel) -> log::Level {
    match level {
        LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => log::Level::Error,
        LogLevel::Warn => log::Level::Warn,
        LogLevel::Info | LogLevel::Undefined => log::Level::Info,
        LogLevel::Debug => log::Level::Debug,
    }
}

impl Logger for LogLogger {
    fn enabled(&self) -> bool {
        let level = self.loglet.level();
        if level.is_terminal() {
            return true;
        }

        let log_level = to_log_level(level);
        if log_level > log::max_level() {
            return false;
        }

        let metadata = log::Metadata::builder()
            .level(log_level)
            .target(&self.target)
            .build();
        log::logger().enabled(&metadata)
    }

    fn printf(&self, args: fmt::Arguments<'_>) {
        if !self.enabled() {
            return;
        }

        let level = self.loglet.level();
        let message = format::render(args);
        let text = self.record_text(&message);

        log::logger().log(
            &log::Record::builder()
                .args(format_args!("{}", text))
                .level(to_log_level(level))
                .target(&self.target)
                .build(),
        );

        if level.is_terminal() {
            log::logger().flush();
        }
        terminate(level, &message);
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
