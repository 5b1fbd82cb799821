//! Timestamp rendering for text and logfmt output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a message timestamp is rendered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Seconds since the epoch
    Unix,

    /// Milliseconds since the epoch
    UnixMillis,

    /// Any strftime-compatible format string
    Custom(String),

    /// No timestamp in the output
    Omit,
}

impl TimestampFormat {
    /// Render `datetime`, or `None` for [`TimestampFormat::Omit`]
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> Option<String> {
        let rendered = match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
            TimestampFormat::Omit => return None,
        };
        Some(rendered)
    }

    /// JSON rendering: numbers for the Unix variants, strings otherwise
    #[must_use]
    pub fn to_json_value(&self, datetime: &DateTime<Utc>) -> Option<serde_json::Value> {
        match self {
            TimestampFormat::Unix => Some(datetime.timestamp().into()),
            TimestampFormat::UnixMillis => Some(datetime.timestamp_millis().into()),
            _ => self.format(datetime).map(serde_json::Value::String),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}
