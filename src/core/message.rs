//! Materialized log message handed to backend sinks

use super::error::Result;
use super::fields::Fields;
use super::log_level::LogLevel;
use super::loglet::Loglet;
use super::stack::CallStack;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One emitted log message
///
/// This is what the channel and recorder backends deliver: the trimmed
/// message text together with the level, effective fields and call stack
/// the logger carried when it printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Fields::is_empty", default)]
    pub fields: Fields,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stack: Option<Arc<CallStack>>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            fields: Fields::new(),
            stack: None,
            timestamp: Utc::now(),
        }
    }

    /// Build a message from the state accumulated in `loglet`
    pub fn from_loglet(loglet: &Loglet, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: loglet.level(),
            fields: loglet.fields_map(),
            stack: loglet.call_stack(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: Arc<CallStack>) -> Self {
        self.stack = Some(stack);
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
