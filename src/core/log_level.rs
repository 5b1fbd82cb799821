//! Log level definitions
//!
//! Levels are ordered by severity with the most severe first: a lower value
//! is a more severe level. [`LogLevel::Undefined`] is the "not yet set"
//! sentinel and never a level messages can be emitted at.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum LogLevel {
    #[default]
    Undefined = 0,
    Panic = 1,
    Fatal = 2,
    Error = 3,
    Warn = 4,
    Info = 5,
    Debug = 6,
}

impl LogLevel {
    /// Every level a message can be emitted at, most severe first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Panic,
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Undefined => "UNDEFINED",
            LogLevel::Panic => "PANIC",
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// `true` for every level except [`LogLevel::Undefined`].
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != LogLevel::Undefined
    }

    /// Fatal and Panic end the program flow after the message is emitted.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, LogLevel::Panic | LogLevel::Fatal)
    }

    /// Whether a logger with `self` as threshold lets `level` through.
    ///
    /// Messages without a level are never filtered out.
    #[inline]
    pub fn enables(&self, level: LogLevel) -> bool {
        !level.is_valid() || level <= *self
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Undefined => White,
            LogLevel::Panic => BrightMagenta,
            LogLevel::Fatal => BrightRed,
            LogLevel::Error => Red,
            LogLevel::Warn => Yellow,
            LogLevel::Info => Green,
            LogLevel::Debug => Blue,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = LoggerError;

    fn try_from(value: u8) -> Result<Self, LoggerError> {
        match value {
            0 => Ok(LogLevel::Undefined),
            1 => Ok(LogLevel::Panic),
            2 => Ok(LogLevel::Fatal),
            3 => Ok(LogLevel::Error),
            4 => Ok(LogLevel::Warn),
            5 => Ok(LogLevel::Info),
            6 => Ok(LogLevel::Debug),
            _ => Err(LoggerError::invalid_level(value)),
        }
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level as u8
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PANIC" => Ok(LogLevel::Panic),
            "FATAL" => Ok(LogLevel::Fatal),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
