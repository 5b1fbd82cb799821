//! Formatting macros over any [`Logger`](crate::Logger)
//!
//! Each macro sets the level on the given logger and submits the message
//! through [`Logger::printf`](crate::Logger::printf), so the formatting is
//! only done when the backend decides to record the message.
//!
//! # Examples
//!
//! ```
//! use loglet::prelude::*;
//! use loglet::info;
//!
//! let recorder = RecorderLogger::new();
//! let logger = recorder.with_field("service", "api");
//!
//! info!(logger, "Server started");
//! let port = 8080;
//! info!(logger, "Listening on port {}", port);
//!
//! assert_eq!(recorder.messages()[1].message, "Listening on port 8080");
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use loglet::prelude::*;
/// # let logger = RecorderLogger::new();
/// use loglet::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::Logger::printf(
            &$crate::Logger::with_level(&$logger, $level),
            format_args!($($arg)+),
        )
    };
}

/// Log a debug-level message.
///
/// ```
/// # use loglet::prelude::*;
/// # let logger = RecorderLogger::new();
/// use loglet::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use loglet::prelude::*;
/// # let logger = RecorderLogger::new();
/// use loglet::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message; the backend exits the process afterwards.
///
/// ```no_run
/// # use loglet::prelude::*;
/// # let logger = DiscardLogger::new();
/// use loglet::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
