//! Filter backend: a gate and rewriter in front of another logger
//!
//! The filter applies its own threshold on top of the parent's, can rewrite
//! or drop fields as they are attached, and can rewrite or drop messages
//! before they reach the parent. Fatal and Panic keep their semantics even
//! when the filter drops the message: it is then written to stderr before
//! the process exits or the panic unwinds.
//!
//! # Example
//!
//! ```
//! use loglet::prelude::*;
//!
//! let recorder = RecorderLogger::new();
//! let logger = FilterLogger::builder()
//!     .parent(recorder.clone())
//!     .threshold(LogLevel::Info)
//!     .field_filter(|key, value| {
//!         if key == "password" {
//!             Some((key.to_string(), FieldValue::from("***")))
//!         } else {
//!             Some((key.to_string(), value))
//!         }
//!     })
//!     .build()
//!     .unwrap();
//!
//! logger.info().with_field("password", "hunter2").print(&[&"login"]);
//! logger.debug().print(&[&"too verbose"]);
//!
//! let messages = recorder.messages();
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].fields.get("password"), Some(&FieldValue::from("***")));
//! ```

use crate::core::{
    fallback_print, format, terminate, FieldValue, LogLevel, Logger, LoggerError, Loglet, Result,
};
use std::fmt;
use std::sync::Arc;

/// Rewrites a message; `None` drops it
pub type MessageFilter = Arc<dyn Fn(LogLevel, String) -> Option<String> + Send + Sync>;

/// Rewrites a field as it is attached; `None` drops it
pub type FieldFilter = Arc<dyn Fn(&str, FieldValue) -> Option<(String, FieldValue)> + Send + Sync>;

struct Config {
    threshold: LogLevel,
    message_filter: Option<MessageFilter>,
    field_filter: Option<FieldFilter>,
}

impl Config {
    fn filter_field(&self, key: String, value: FieldValue) -> Option<(String, FieldValue)> {
        match self.field_filter {
            Some(ref filter) => filter(&key, value),
            None => Some((key, value)),
        }
    }
}

pub struct FilterLogger<L> {
    parent: L,
    /// Levels only; fields and stacks live in the parent
    loglet: Loglet,
    config: Arc<Config>,
}

impl<L: Clone> Clone for FilterLogger<L> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            loglet: self.loglet.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<L: Logger> FilterLogger<L> {
    /// Filter with only a threshold
    pub fn new(parent: L, threshold: LogLevel) -> Result<Self> {
        FilterLoggerBuilder::new()
            .parent(parent)
            .threshold(threshold)
            .build()
    }

    pub fn builder() -> FilterLoggerBuilder<L> {
        FilterLoggerBuilder::new()
    }

    pub fn parent(&self) -> &L {
        &self.parent
    }

    pub fn level(&self) -> LogLevel {
        self.loglet.level()
    }

    fn derive(&self, parent: L, loglet: Loglet) -> Self {
        Self {
            parent,
            loglet,
            config: Arc::clone(&self.config),
        }
    }

    fn finish_dropped(level: LogLevel, message: &str) {
        if level.is_terminal() {
            fallback_print(level, message);
            terminate(level, message);
        }
    }
}

impl<L: Logger> Logger for FilterLogger<L> {
    fn enabled(&self) -> bool {
        self.config.threshold.enables(self.loglet.level()) && self.parent.enabled()
    }

    fn printf(&self, args: fmt::Arguments<'_>) {
        let level = self.loglet.level();

        if !self.enabled() {
            if level.is_terminal() {
                Self::finish_dropped(level, &format::render(args));
            }
            return;
        }

        let rendered = format::render(args);
        // Fatal and Panic keep their own text even when the filter drops it
        let original = level.is_terminal().then(|| rendered.clone());
        let message = match self.config.message_filter {
            Some(ref filter) => filter(level, rendered),
            None => Some(rendered),
        };

        match (message, original) {
            (Some(message), _) => {
                self.parent.printf(format_args!("{}", message));
                // parents that record instead of terminating
                terminate(level, &message);
            }
            (None, Some(original)) => Self::finish_dropped(level, &original),
            (None, None) => {}
        }
    }

    #[track_caller]
    fn with_level(&self, level: LogLevel) -> Self {
        self.derive(self.parent.with_level(level), self.loglet.with_level(level))
    }

    #[inline(never)]
    fn with_stack(&self, skip: usize) -> Self {
        self.derive(
            self.parent.with_stack(skip.saturating_add(1)),
            self.loglet.clone(),
        )
    }

    fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let key = key.into();
        if key.is_empty() {
            return self.clone();
        }

        match self.config.filter_field(key, value.into()) {
            Some((key, value)) => self.derive(self.parent.with_field(key, value), self.loglet.clone()),
            None => self.clone(),
        }
    }

    fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let filtered: Vec<(String, FieldValue)> = fields
            .into_iter()
            .filter_map(|(k, v)| {
                let key: String = k.into();
                if key.is_empty() {
                    None
                } else {
                    self.config.filter_field(key, v.into())
                }
            })
            .collect();

        if filtered.is_empty() {
            return self.clone();
        }

        self.derive(self.parent.with_fields(filtered), self.loglet.clone())
    }
}

impl<L: fmt::Debug> fmt::Debug for FilterLogger<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterLogger")
            .field("level", &self.loglet.level())
            .field("threshold", &self.config.threshold)
            .field("parent", &self.parent)
            .finish()
    }
}

/// Builder for [`FilterLogger`]; a parent logger is required
pub struct FilterLoggerBuilder<L> {
    parent: Option<L>,
    threshold: LogLevel,
    message_filter: Option<MessageFilter>,
    field_filter: Option<FieldFilter>,
}

impl<L: Logger> FilterLoggerBuilder<L> {
    pub fn new() -> Self {
        Self {
            parent: None,
            threshold: LogLevel::Debug,
            message_filter: None,
            field_filter: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn parent(mut self, parent: L) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn message_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(LogLevel, String) -> Option<String> + Send + Sync + 'static,
    {
        self.message_filter = Some(Arc::new(filter));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn field_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, FieldValue) -> Option<(String, FieldValue)> + Send + Sync + 'static,
    {
        self.field_filter = Some(Arc::new(filter));
        self
    }

    pub fn build(self) -> Result<FilterLogger<L>> {
        let Some(parent) = self.parent else {
            return Err(LoggerError::config("FilterLogger", "missing parent logger"));
        };

        if !self.threshold.is_valid() {
            return Err(LoggerError::config(
                "FilterLogger",
                "threshold must be a defined level",
            ));
        }

        Ok(FilterLogger {
            parent,
            loglet: Loglet::new(),
            config: Arc::new(Config {
                threshold: self.threshold,
                message_filter: self.message_filter,
                field_filter: self.field_filter,
            }),
        })
    }
}

impl<L: Logger> Default for FilterLoggerBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}
