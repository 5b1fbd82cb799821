//! Bridge to `tracing`
//!
//! Each message becomes a `tracing` event under the `loglet` target. The
//! accumulated fields are recorded as one `fields` value in `key=value`
//! form, and the innermost captured frame, if any, as `caller`. Fatal and
//! Panic are emitted at `ERROR` and then exit or panic.

use crate::core::{format, terminate, FieldValue, LogLevel, Logger, Loglet};
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    loglet: Loglet,
}

impl TracingLogger {
    pub const fn new() -> Self {
        Self {
            loglet: Loglet::new(),
        }
    }

    pub fn loglet(&self) -> &Loglet {
        &self.loglet
    }
}

/// `tracing` level a message is emitted at
pub fn to_tracing_level(level: LogLevel) -> tracing::Level {
    match level {
        LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info | LogLevel::Undefined => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
    }
}

macro_rules! emit {
    ($level:expr, $($field:tt)*) => {
        match $level {
            LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => {
                tracing::event!(target: "loglet", tracing::Level::ERROR, $($field)*)
            }
            LogLevel::Warn => tracing::event!(target: "loglet", tracing::Level::WARN, $($field)*),
            LogLevel::Info | LogLevel::Undefined => {
                tracing::event!(target: "loglet", tracing::Level::INFO, $($field)*)
            }
            LogLevel::Debug => tracing::event!(target: "loglet", tracing::Level::DEBUG, $($field)*),
        }
    };
}

impl Logger for TracingLogger {
    fn enabled(&self) -> bool {
        let level = self.loglet.level();
        if level.is_terminal() {
            return true;
        }

        match level {
            LogLevel::Error => tracing::enabled!(target: "loglet", tracing::Level::ERROR),
            LogLevel::Warn => tracing::enabled!(target: "loglet", tracing::Level::WARN),
            LogLevel::Debug => tracing::enabled!(target: "loglet", tracing::Level::DEBUG),
            _ => tracing::enabled!(target: "loglet", tracing::Level::INFO),
        }
    }

    fn printf(&self, args: fmt::Arguments<'_>) {
        if !self.enabled() {
            return;
        }

        let level = self.loglet.level();
        let message = format::render(args);
        let fields = self.loglet.fields_map();
        let stack = self.loglet.call_stack();
        let caller = stack.as_deref().and_then(|s| s.top()).map(|f| f.name());

        match (fields.is_empty(), caller) {
            (true, None) => emit!(level, "{}", message),
            (false, None) => emit!(level, fields = %fields, "{}", message),
            (true, Some(caller)) => emit!(level, caller, "{}", message),
            (false, Some(caller)) => {
                emit!(level, fields = %fields, caller, "{}", message)
            }
        }

        terminate(level, &message);
    }

    #[track_caller]
    fn with_level(&self, level: LogLevel) -> Self {
        Self {
            loglet: self.loglet.with_level(level),
        }
    }

    #[inline(never)]
    fn with_stack(&self, skip: usize) -> Self {
        Self {
            loglet: self.loglet.with_stack(skip.saturating_add(1)),
        }
    }

    fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            loglet: self.loglet.with_field(key, value),
        }
    }

    fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            loglet: self.loglet.with_fields(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn capture<R>(max_level: tracing::Level, f: impl FnOnce() -> R) -> (R, String) {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(max_level)
            .with_ansi(false)
            .without_time()
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, buffer.contents())
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(to_tracing_level(LogLevel::Panic), tracing::Level::ERROR);
        assert_eq!(to_tracing_level(LogLevel::Fatal), tracing::Level::ERROR);
        assert_eq!(to_tracing_level(LogLevel::Error), tracing::Level::ERROR);
        assert_eq!(to_tracing_level(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(to_tracing_level(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(to_tracing_level(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(to_tracing_level(LogLevel::Undefined), tracing::Level::INFO);
    }

    #[test]
    fn test_event_carries_fields() {
        let ((), output) = capture(tracing::Level::DEBUG, || {
            TracingLogger::new()
                .warn()
                .with_field("shard", 3)
                .print(&[&"rebalancing"]);
        });

        assert!(output.contains("WARN"));
        assert!(output.contains("rebalancing"));
        assert!(output.contains("shard=3"));
    }

    #[test]
    fn test_enabled_follows_subscriber() {
        let (enabled, output) = capture(tracing::Level::WARN, || {
            let logger = TracingLogger::new();
            logger.info().print(&[&"hidden"]);
            (logger.info().enabled(), logger.error().enabled())
        });

        assert_eq!(enabled, (false, true));
        assert!(!output.contains("hidden"));
    }

    #[test]
    fn test_panic_emits_then_panics() {
        let (result, output) = capture(tracing::Level::INFO, || {
            std::panic::catch_unwind(|| TracingLogger::new().panic().print(&[&"halt"]))
        });

        assert!(result.is_err());
        assert!(output.contains("ERROR"));
        assert!(output.contains("halt"));
    }
}
