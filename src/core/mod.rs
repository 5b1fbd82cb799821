//! Core types: levels, fields, the loglet chain and the logger contract

pub mod error;
pub mod fields;
pub mod format;
pub mod log_level;
pub mod logger;
pub mod loglet;
pub mod message;
pub mod metrics;
pub mod output_format;
pub mod overflow_policy;
pub mod stack;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields, ERROR_FIELD_KEY};
pub use log_level::LogLevel;
pub use logger::{fallback_print, terminate, Logger, FATAL_EXIT_CODE};
pub use loglet::{FieldsIter, Loglet};
pub use message::Message;
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use stack::{CallStack, Frame};
pub use timestamp::TimestampFormat;
