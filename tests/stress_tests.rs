//! Stress tests for shared loglet chains and channel delivery
//!
//! These tests verify:
//! - Deep chains and heavy branching stay consistent across threads
//! - Fatal and Panic messages are never dropped by a full channel
//! - Overflow accounting adds up under concurrent load

use loglet::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_many_threads_branching_one_chain() {
    const THREADS: usize = 16;
    const DEPTH: usize = 200;

    let root = Arc::new(
        (0..50).fold(Loglet::new().with_level(LogLevel::Info), |l, i| {
            l.with_field(format!("shared_{}", i), i)
        }),
    );
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let root = Arc::clone(&root);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut loglet = (*root).clone();
                for d in 0..DEPTH {
                    loglet = loglet.with_field("depth", d).with_field(format!("t{}_{}", t, d % 10), t);
                }
                loglet
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        let loglet = handle.join().expect("thread panicked");
        // 50 shared, "depth", 10 per-thread keys
        assert_eq!(loglet.fields_count(), 61);
        assert_eq!(
            loglet.fields_map().get("depth"),
            Some(&FieldValue::from(DEPTH - 1))
        );
        assert_eq!(
            loglet.fields_map().get(&format!("t{}_0", t)),
            Some(&FieldValue::from(t))
        );
        assert_eq!(loglet.level(), LogLevel::Info);
    }

    assert_eq!(root.fields_count(), 50);
}

#[test]
fn test_deep_chain_drops_cleanly() {
    let mut loglet = Loglet::new();
    for i in 0..100_000u64 {
        loglet = loglet.with_field("k", i);
    }

    assert_eq!(loglet.fields_count(), 1);
    assert_eq!(loglet.fields_map().get("k"), Some(&FieldValue::from(99_999u64)));
    drop(loglet);
}

#[test]
fn test_terminal_levels_survive_full_channel() {
    let (logger, rx) = ChannelLogger::builder()
        .buffer_size(4)
        .overflow_policy(OverflowPolicy::DropNewest)
        .build()
        .expect("valid configuration");

    for i in 0..100 {
        logger.debug().printf(format_args!("flood {}", i));
    }

    let consumer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        rx.iter().take(5).collect::<Vec<_>>()
    });

    let panicking = logger.panic();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        panicking.print(&[&"must", &"arrive"]);
    }));
    assert!(result.is_err());

    let received = consumer.join().expect("consumer panicked");
    assert_eq!(received.last().map(|m| m.level), Some(LogLevel::Panic));
    assert_eq!(received.last().map(|m| m.message.as_str()), Some("must arrive"));

    let metrics = logger.metrics();
    assert_eq!(metrics.dropped_count(), 96);
    assert_eq!(metrics.terminal_preserved(), 1);
    assert_eq!(metrics.block_events(), 1);
}

#[test]
fn test_overflow_accounting_under_load() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 1_000;

    let alerts = Arc::new(AtomicU64::new(0));
    let alerts_clone = Arc::clone(&alerts);

    let (logger, rx) = ChannelLogger::builder()
        .buffer_size(32)
        .on_overflow(Arc::new(move |_| {
            alerts_clone.fetch_add(1, Ordering::Relaxed);
        }))
        .build()
        .expect("valid configuration");

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.with_field("thread", t);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info().with_field("i", i).print(&[&"event"]);
                }
            })
        })
        .collect();

    let mut received = 0u64;
    for handle in handles {
        handle.join().expect("producer panicked");
    }
    while rx.try_recv().is_ok() {
        received += 1;
    }

    let metrics = logger.metrics();
    assert_eq!(metrics.delivered_count(), received);
    assert_eq!(metrics.delivered_count() + metrics.dropped_count(), THREADS * PER_THREAD);
    assert_eq!(metrics.queue_full_events(), metrics.dropped_count());
    if metrics.dropped_count() > 0 {
        assert!(alerts.load(Ordering::Relaxed) >= 1);
    }
}
