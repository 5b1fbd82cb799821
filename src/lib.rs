//! # Loglet
//!
//! A small structured-logging facade built around an immutable, branchable
//! chain of logger state.
//!
//! Every chaining call (`with_level`, `with_field`, `with_stack`, ...)
//! returns a new logger that shares its ancestry with the receiver, so a
//! configured logger can be handed to many threads and extended
//! independently by each of them without locks.
//!
//! ## Features
//!
//! - **Persistent state**: [`Loglet`] nodes are reference counted and never
//!   mutated; shadowed fields resolve to the most recent value
//! - **Backends**: channel, writer (text, JSON, logfmt), recorder, discard
//!   and filter, plus optional `log` and `tracing` bridges
//! - **Terminal levels**: Fatal exits the process, Panic unwinds, in every
//!   backend
//!
//! ## Example
//!
//! ```
//! use loglet::prelude::*;
//!
//! let (logger, rx) = ChannelLogger::new(64).unwrap();
//! let worker = logger.with_field("worker", 1);
//!
//! worker.info().print(&[&"started"]);
//! worker.with_field("job", "reindex").warn().print(&[&"slow"]);
//!
//! assert_eq!(rx.recv().unwrap().fields.len(), 1);
//! assert_eq!(rx.recv().unwrap().fields.len(), 2);
//! ```

pub mod backends;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::backends::{
        ChannelLogger, ChannelLoggerBuilder, DiscardLogger, FilterLogger, FilterLoggerBuilder,
        RecorderLogger, WriterLogger, WriterLoggerBuilder,
    };
    pub use crate::core::{
        CallStack, FieldValue, Fields, LogLevel, Logger, LoggerError, LoggerMetrics, Loglet,
        Message, OutputFormat, OverflowPolicy, Result, TimestampFormat,
    };

    #[cfg(feature = "log")]
    pub use crate::backends::LogLogger;
    #[cfg(feature = "tracing")]
    pub use crate::backends::TracingLogger;
}

pub use backends::{
    ChannelLogger, DiscardLogger, FilterLogger, RecorderLogger, WriterLogger,
};
pub use core::{
    fallback_print, terminate, CallStack, FieldValue, Fields, FieldsIter, Frame, LogLevel, Logger,
    LoggerError, LoggerMetrics, Loglet, Message, OutputFormat, OverflowCallback, OverflowPolicy,
    Result, TimestampFormat, ERROR_FIELD_KEY, FATAL_EXIT_CODE,
};
