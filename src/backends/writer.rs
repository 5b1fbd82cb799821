//! Writer backend: formatted lines on any `io::Write`
//!
//! Lines are written and flushed under a mutex, so loggers on many threads
//! can share one writer. Write failures are counted and reported on stderr;
//! they never reach the caller of `print`.

use crate::core::{
    format, terminate, FieldValue, LogLevel, Logger, LoggerError, LoggerMetrics, Loglet, Message,
    OutputFormat, Result, TimestampFormat,
};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

struct Shared<W> {
    writer: Mutex<W>,
    threshold: LogLevel,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    use_colors: bool,
    metrics: LoggerMetrics,
}

impl<W: Write> Shared<W> {
    fn write(&self, msg: &Message) {
        let line = self
            .output_format
            .format(msg, &self.timestamp_format, self.use_colors);

        let result = {
            let mut writer = self.writer.lock();
            writeln!(writer, "{}", line).and_then(|()| writer.flush())
        };

        match result {
            Ok(()) => {
                self.metrics.record_delivered();
            }
            Err(e) => {
                self.metrics.record_dropped();
                eprintln!("[LOGGER ERROR] Writer failed: {}", e);
            }
        }
    }
}

pub struct WriterLogger<W> {
    loglet: Loglet,
    shared: Arc<Shared<W>>,
}

impl<W> Clone for WriterLogger<W> {
    fn clone(&self) -> Self {
        Self {
            loglet: self.loglet.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<W: Write + Send + 'static> WriterLogger<W> {
    /// Text output with ISO 8601 timestamps and a `Debug` threshold
    pub fn new(writer: W) -> Self {
        Self::from_builder(WriterLoggerBuilder::new(writer))
    }

    pub fn builder(writer: W) -> WriterLoggerBuilder<W> {
        WriterLoggerBuilder::new(writer)
    }

    fn from_builder(builder: WriterLoggerBuilder<W>) -> Self {
        Self {
            loglet: Loglet::new(),
            shared: Arc::new(Shared {
                writer: Mutex::new(builder.writer),
                threshold: builder.threshold,
                output_format: builder.output_format,
                timestamp_format: builder.timestamp_format,
                use_colors: builder.use_colors,
                metrics: LoggerMetrics::new(),
            }),
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Run `f` with exclusive access to the underlying writer
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let mut writer = self.shared.writer.lock();
        f(&mut *writer)
    }

    fn derive(&self, loglet: Loglet) -> Self {
        Self {
            loglet,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl WriterLogger<io::Stderr> {
    /// Colored text lines on stderr
    pub fn stderr() -> Self {
        Self::from_builder(WriterLoggerBuilder::new(io::stderr()).colors(true))
    }
}

impl WriterLogger<io::Stdout> {
    /// Colored text lines on stdout
    pub fn stdout() -> Self {
        Self::from_builder(WriterLoggerBuilder::new(io::stdout()).colors(true))
    }
}

impl<W: Write + Send + 'static> Logger for WriterLogger<W> {
    fn enabled(&self) -> bool {
        self.shared.threshold.enables(self.loglet.level())
    }

    fn printf(&self, args: fmt::Arguments<'_>) {
        if !self.enabled() {
            return;
        }

        let msg = Message::from_loglet(&self.loglet, format::render(args));
        self.shared.write(&msg);
        terminate(msg.level, &msg.message);
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

impl<W> fmt::Debug for WriterLogger<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterLogger")
            .field("level", &self.loglet.level())
            .field("threshold", &self.shared.threshold)
            .field("output_format", &self.shared.output_format)
            .finish()
    }
}

/// Builder for [`WriterLogger`]
///
/// # Example
///
/// ```
/// use loglet::prelude::*;
///
/// let logger = WriterLogger::builder(Vec::new())
///     .threshold(LogLevel::Info)
///     .output_format(OutputFormat::Logfmt)
///     .timestamp_format(TimestampFormat::Omit)
///     .build()
///     .unwrap();
///
/// logger.info().with_field("port", 8080).print(&[&"listening"]);
///
/// let output = logger.with_writer(|buf| String::from_utf8(buf.clone()).unwrap());
/// assert_eq!(output, "level=INFO msg=\"listening\" port=8080\n");
/// ```
pub struct WriterLoggerBuilder<W> {
    writer: W,
    threshold: LogLevel,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    use_colors: bool,
}

impl<W: Write + Send + 'static> WriterLoggerBuilder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            threshold: LogLevel::Debug,
            output_format: OutputFormat::default(),
            timestamp_format: TimestampFormat::default(),
            use_colors: false,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Color the level label in text output (needs the `console` feature)
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn build(self) -> Result<WriterLogger<W>> {
        if !self.threshold.is_valid() {
            return Err(LoggerError::config(
                "WriterLogger",
                "threshold must be a defined level",
            ));
        }

        Ok(WriterLogger::from_builder(self))
    }
}
