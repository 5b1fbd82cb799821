//! Channel backend: every enabled print becomes a [`Message`] on a bounded
//! crossbeam queue
//!
//! The consumer owns the [`Receiver`] and decides what to do with messages.
//! When the queue is full the configured [`OverflowPolicy`] applies, except
//! for Fatal and Panic messages which always wait for room before the
//! process exits or the panic unwinds.

use crate::core::{
    format, terminate, FieldValue, LogLevel, Logger, LoggerError, LoggerMetrics, Loglet, Message,
    OverflowCallback, OverflowPolicy, Result,
};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use std::fmt;
use std::sync::Arc;

/// Default queue capacity used by [`ChannelLoggerBuilder`]
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

struct Shared {
    sender: Sender<Message>,
    /// Kept only for [`OverflowPolicy::DropOldest`]
    evictor: Option<Receiver<Message>>,
    threshold: LogLevel,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    metrics: LoggerMetrics,
}

/// Logger delivering messages over a channel
#[derive(Clone)]
pub struct ChannelLogger {
    loglet: Loglet,
    shared: Arc<Shared>,
}

impl ChannelLogger {
    /// Channel logger with `buffer_size` slots, `Debug` threshold and the
    /// default overflow policy
    pub fn new(buffer_size: usize) -> Result<(Self, Receiver<Message>)> {
        Self::builder().buffer_size(buffer_size).build()
    }

    pub fn builder() -> ChannelLoggerBuilder {
        ChannelLoggerBuilder::new()
    }

    /// Delivery counters shared by every logger branched from the same root
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn threshold(&self) -> LogLevel {
        self.shared.threshold
    }

    pub fn loglet(&self) -> &Loglet {
        &self.loglet
    }

    fn derive(&self, loglet: Loglet) -> Self {
        Self {
            loglet,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Shared {
    fn send(&self, msg: Message) {
        if msg.level.is_terminal() {
            self.send_terminal(msg);
            return;
        }

        match self.sender.try_send(msg) {
            Ok(()) => {
                self.metrics.record_delivered();
            }
            Err(TrySendError::Full(msg)) => self.handle_overflow(msg),
            Err(TrySendError::Disconnected(_)) => {
                self.metrics.record_dropped();
            }
        }
    }

    /// Fatal and Panic messages are never dropped
    fn send_terminal(&self, msg: Message) {
        match self.sender.try_send(msg) {
            Ok(()) => {
                self.metrics.record_delivered();
            }
            Err(TrySendError::Full(msg)) => {
                self.metrics.record_queue_full();
                self.metrics.record_terminal_preserved();
                // The evictor keeps the channel connected, so a blocking send
                // could wait forever once the consumer is gone.
                if self.evictor.is_some() {
                    self.evict_and_send(msg);
                } else {
                    self.blocking_send(msg);
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                self.metrics.record_dropped();
            }
        }
    }

    fn blocking_send(&self, msg: Message) {
        self.metrics.record_block();
        match self.sender.send(msg) {
            Ok(()) => {
                self.metrics.record_delivered();
            }
            Err(_) => {
                self.metrics.record_dropped();
            }
        }
    }

    fn handle_overflow(&self, msg: Message) {
        self.metrics.record_queue_full();

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
            }

            OverflowPolicy::DropOldest => self.evict_and_send(msg),

            OverflowPolicy::Block => self.blocking_send(msg),

            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match self.sender.send_timeout(msg, *timeout) {
                    Ok(()) => {
                        self.metrics.record_delivered();
                    }
                    Err(SendTimeoutError::Timeout(_)) => self.alert_and_drop(),
                    Err(SendTimeoutError::Disconnected(_)) => {
                        self.metrics.record_dropped();
                    }
                }
            }

            OverflowPolicy::AlertAndDrop => self.alert_and_drop(),
        }
    }

    fn evict_and_send(&self, msg: Message) {
        let Some(ref evictor) = self.evictor else {
            self.alert_and_drop();
            return;
        };

        let mut msg = msg;
        loop {
            if evictor.try_recv().is_ok() {
                self.metrics.record_dropped();
            }
            match self.sender.try_send(msg) {
                Ok(()) => {
                    self.metrics.record_delivered();
                    return;
                }
                Err(TrySendError::Full(back)) => msg = back,
                Err(TrySendError::Disconnected(_)) => {
                    self.metrics.record_dropped();
                    return;
                }
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped_count = self.metrics.record_dropped();

        // Alert on the first drop and every thousandth after that
        let should_alert = dropped_count == 0 || (dropped_count + 1) % 1000 == 0;

        if should_alert {
            eprintln!(
                "[LOGGER WARNING] Log channel full, {} messages dropped. \
                 Consider increasing buffer size or using a different overflow policy.",
                dropped_count + 1
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped_count + 1);
            }
        }
    }
}

impl Logger for ChannelLogger {
    fn enabled(&self) -> bool {
        self.shared.threshold.enables(self.loglet.level())
    }

    fn printf(&self, args: fmt::Arguments<'_>) {
        if !self.enabled() {
            return;
        }

        let msg = Message::from_loglet(&self.loglet, format::render(args));
        let level = msg.level;

        if level.is_terminal() {
            let text = msg.message.clone();
            self.shared.send(msg);
            terminate(level, &text);
        } else {
            self.shared.send(msg);
        }
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

impl fmt::Debug for ChannelLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelLogger")
            .field("level", &self.loglet.level())
            .field("threshold", &self.shared.threshold)
            .field("overflow_policy", &self.shared.overflow_policy)
            .finish()
    }
}

/// Builder for [`ChannelLogger`]
///
/// # Example
///
/// ```
/// use loglet::prelude::*;
/// use std::sync::Arc;
///
/// let (logger, rx) = ChannelLogger::builder()
///     .buffer_size(64)
///     .threshold(LogLevel::Info)
///     .overflow_policy(OverflowPolicy::DropNewest)
///     .on_overflow(Arc::new(|count| eprintln!("{} messages dropped", count)))
///     .build()
///     .unwrap();
///
/// logger.debug().print(&[&"filtered out"]);
/// logger.info().print(&[&"delivered"]);
/// assert_eq!(rx.try_recv().unwrap().message, "delivered");
/// ```
pub struct ChannelLoggerBuilder {
    buffer_size: usize,
    threshold: LogLevel,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
}

impl ChannelLoggerBuilder {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            threshold: LogLevel::Debug,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Least severe level delivered
    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    pub fn build(self) -> Result<(ChannelLogger, Receiver<Message>)> {
        if self.buffer_size == 0 {
            return Err(LoggerError::config(
                "ChannelLogger",
                "buffer size must be at least 1",
            ));
        }
        if !self.threshold.is_valid() {
            return Err(LoggerError::config(
                "ChannelLogger",
                "threshold must be a defined level",
            ));
        }

        let (sender, receiver) = bounded(self.buffer_size);
        let evictor = matches!(self.overflow_policy, OverflowPolicy::DropOldest)
            .then(|| receiver.clone());

        let logger = ChannelLogger {
            loglet: Loglet::new(),
            shared: Arc::new(Shared {
                sender,
                evictor,
                threshold: self.threshold,
                overflow_policy: self.overflow_policy,
                on_overflow: self.on_overflow,
                metrics: LoggerMetrics::new(),
            }),
        };

        Ok((logger, receiver))
    }
}

impl Default for ChannelLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fields;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    #[test]
    fn test_message_carries_state() {
        let (logger, rx) = ChannelLogger::new(8).unwrap();

        logger
            .warn()
            .with_field("user", "alice")
            .with_fields([("attempt", 3), ("limit", 5)])
            .printf(format_args!("  login failed for {}  ", "alice"));

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.message, "login failed for alice");
        assert_eq!(msg.level, LogLevel::Warn);
        assert_eq!(
            msg.fields,
            Fields::from([("attempt", 3), ("limit", 5)]).with_field("user", "alice")
        );
        assert!(msg.stack.is_none());
    }

    #[test]
    fn test_print_and_println_conventions() {
        let (logger, rx) = ChannelLogger::new(8).unwrap();
        let logger = logger.info();

        logger.print(&[&"a", &1, &2.5]);
        logger.println(&[&"b", &"c"]);

        assert_eq!(rx.try_recv().unwrap().message, "a 1 2.5");
        assert_eq!(rx.try_recv().unwrap().message, "b c");
    }

    #[test]
    fn test_threshold_filters() {
        let (logger, rx) = ChannelLogger::builder()
            .threshold(LogLevel::Warn)
            .build()
            .unwrap();

        assert!(!logger.info().enabled());
        assert!(logger.error().enabled());

        logger.info().print(&[&"dropped"]);
        logger.error().print(&[&"kept"]);

        assert_eq!(rx.try_recv().unwrap().message, "kept");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_with_enabled() {
        let (logger, _rx) = ChannelLogger::builder()
            .threshold(LogLevel::Info)
            .build()
            .unwrap();

        let (debug, enabled) = logger.debug().with_enabled();
        assert!(!enabled);
        assert_eq!(debug.loglet().level(), LogLevel::Debug);
    }

    #[test]
    fn test_stack_attached() {
        let (logger, rx) = ChannelLogger::new(8).unwrap();
        logger.info().with_stack(0).print(&[&"with stack"]);

        let msg = rx.try_recv().unwrap();
        let stack = msg.stack.expect("stack attached");
        assert!(!stack.is_empty());
    }

    #[test]
    fn test_drop_newest() {
        let (logger, rx) = ChannelLogger::builder()
            .buffer_size(2)
            .overflow_policy(OverflowPolicy::DropNewest)
            .build()
            .unwrap();

        for i in 0..5 {
            logger.info().printf(format_args!("message {}", i));
        }

        assert_eq!(logger.metrics().delivered_count(), 2);
        assert_eq!(logger.metrics().dropped_count(), 3);
        assert_eq!(rx.try_recv().unwrap().message, "message 0");
        assert_eq!(rx.try_recv().unwrap().message, "message 1");
    }

    #[test]
    fn test_drop_oldest() {
        let (logger, rx) = ChannelLogger::builder()
            .buffer_size(2)
            .overflow_policy(OverflowPolicy::DropOldest)
            .build()
            .unwrap();

        for i in 0..5 {
            logger.info().printf(format_args!("message {}", i));
        }

        let kept: Vec<String> = rx.try_iter().map(|m| m.message).collect();
        assert_eq!(kept, vec!["message 3", "message 4"]);
        assert_eq!(logger.metrics().dropped_count(), 3);
    }

    #[test]
    fn test_alert_and_drop_calls_back() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = Arc::clone(&seen);

        let (logger, _rx) = ChannelLogger::builder()
            .buffer_size(1)
            .on_overflow(Arc::new(move |count| {
                seen_clone.store(count, Ordering::SeqCst);
            }))
            .build()
            .unwrap();

        logger.info().print(&[&"fills the queue"]);
        logger.info().print(&[&"overflows"]);

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(logger.metrics().queue_full_events(), 1);
    }

    #[test]
    fn test_block_with_timeout_drops() {
        let (logger, _rx) = ChannelLogger::builder()
            .buffer_size(1)
            .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(10)))
            .build()
            .unwrap();

        logger.info().print(&[&"first"]);
        logger.info().print(&[&"second"]);

        assert_eq!(logger.metrics().block_events(), 1);
        assert_eq!(logger.metrics().dropped_count(), 1);
    }

    #[test]
    fn test_panic_level_delivers_then_panics() {
        let (logger, rx) = ChannelLogger::new(4).unwrap();
        let panicking = logger.panic().with_field("reason", "invariant");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            panicking.printf(format_args!("state {} corrupted", 7));
        }));

        let payload = result.unwrap_err();
        assert_eq!(
            payload.downcast_ref::<String>().map(String::as_str),
            Some("state 7 corrupted")
        );

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.level, LogLevel::Panic);
        assert_eq!(msg.fields.get("reason"), Some(&FieldValue::from("invariant")));
    }

    #[test]
    fn test_drop_oldest_panic_without_consumer() {
        let (logger, rx) = ChannelLogger::builder()
            .buffer_size(1)
            .overflow_policy(OverflowPolicy::DropOldest)
            .build()
            .unwrap();
        drop(rx);

        logger.info().print(&[&"fills the queue"]);

        let (done_tx, done_rx) = bounded(1);
        let panicking = logger.panic();
        std::thread::spawn(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                panicking.printf(format_args!("state {} corrupted", 7));
            }));
            let payload = result
                .err()
                .and_then(|p| p.downcast_ref::<String>().cloned());
            let _ = done_tx.send(payload);
        });

        let payload = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("panic print returned in time");
        assert_eq!(payload.as_deref(), Some("state 7 corrupted"));
        assert_eq!(logger.metrics().terminal_preserved(), 1);
        assert_eq!(logger.metrics().block_events(), 0);
    }

    #[test]
    fn test_disconnected_receiver_counts_drops() {
        let (logger, rx) = ChannelLogger::new(4).unwrap();
        drop(rx);

        logger.info().print(&[&"nobody listens"]);
        assert_eq!(logger.metrics().dropped_count(), 1);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            ChannelLogger::new(0),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(ChannelLogger::builder()
            .threshold(LogLevel::Undefined)
            .build()
            .is_err());
    }

    #[test]
    #[should_panic(expected = "invalid log level")]
    fn test_with_undefined_level_panics() {
        let (logger, _rx) = ChannelLogger::new(1).unwrap();
        let _ = logger.with_level(LogLevel::Undefined);
    }
}
