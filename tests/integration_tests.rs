//! Integration tests for loglet
//!
//! These tests verify:
//! - Branching loggers across threads
//! - Writer output to files
//! - Filters stacked on other backends
//! - Fatal exiting the process with status 1

use loglet::prelude::*;
use std::fs;
use std::process::Command;
use std::thread;
use tempfile::TempDir;

const FATAL_CHILD_ENV: &str = "LOGLET_FATAL_CHILD";

#[test]
fn test_concurrent_branches_keep_their_fields() {
    let recorder = RecorderLogger::new();
    let base = recorder.info().with_field("service", "ingest");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let logger = base.clone();
            thread::spawn(move || {
                logger
                    .with_field("worker", i)
                    .with_field("service", format!("ingest-{}", i))
                    .printf(format_args!("worker {} done", i));
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    let messages = recorder.messages();
    assert_eq!(messages.len(), 8);

    for msg in messages {
        let worker = match msg.fields.get("worker") {
            Some(FieldValue::Int(w)) => *w,
            other => panic!("unexpected worker field: {:?}", other),
        };
        assert_eq!(msg.message, format!("worker {} done", worker));
        assert_eq!(
            msg.fields.get("service"),
            Some(&FieldValue::from(format!("ingest-{}", worker)))
        );
        assert_eq!(msg.fields.len(), 2);
    }

    // The shared parent is untouched by its children
    assert_eq!(base.loglet().fields_map(), Fields::from([("service", "ingest")]));
}

#[test]
fn test_channel_delivers_from_many_threads() {
    let (logger, rx) = ChannelLogger::builder()
        .buffer_size(64)
        .overflow_policy(OverflowPolicy::Block)
        .build()
        .expect("valid configuration");

    let consumer = thread::spawn(move || rx.iter().take(400).count());

    let producers: Vec<_> = (0..4)
        .map(|t| {
            let logger = logger.with_field("thread", t);
            thread::spawn(move || {
                for i in 0..100 {
                    logger.debug().with_field("seq", i).print(&[&"tick"]);
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().expect("producer panicked");
    }

    assert_eq!(consumer.join().expect("consumer panicked"), 400);
    assert_eq!(logger.metrics().delivered_count(), 400);
    assert_eq!(logger.metrics().dropped_count(), 0);
}

#[test]
fn test_writer_to_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");
    let file = fs::File::create(&log_file).expect("Failed to create log file");

    let logger = WriterLogger::builder(file)
        .output_format(OutputFormat::Json)
        .threshold(LogLevel::Info)
        .build()
        .expect("valid configuration");

    let request = logger.with_fields([("method", "GET"), ("path", "/health")]);
    request.info().print(&[&"request served"]);
    request.debug().print(&[&"not written"]);
    request
        .error()
        .with_error(&std::io::Error::new(std::io::ErrorKind::Other, "timeout"))
        .print(&[&"upstream failed"]);

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["level"], "INFO");
    assert_eq!(lines[0]["message"], "request served");
    assert_eq!(lines[0]["path"], "/health");
    assert!(lines[0]["timestamp"].is_string());
    assert_eq!(lines[1]["level"], "ERROR");
    assert_eq!(lines[1]["error"], "timeout");
}

#[test]
fn test_filter_over_channel() {
    let (channel, rx) = ChannelLogger::new(16).expect("valid configuration");
    let logger = FilterLogger::builder()
        .parent(channel)
        .threshold(LogLevel::Warn)
        .message_filter(|level, msg| match level {
            LogLevel::Error => Some(format!("[ALERT] {}", msg)),
            _ => Some(msg),
        })
        .field_filter(|key, value| match key {
            "token" => None,
            _ => Some((key.to_string(), value)),
        })
        .build()
        .expect("parent supplied");

    let session = logger.with_fields([("user", "eve"), ("token", "s3cr3t")]);
    session.info().print(&[&"ignored"]);
    session.warn().print(&[&"quota at 90%"]);
    session.error().print(&[&"quota exceeded"]);

    let messages: Vec<Message> = rx.try_iter().collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message, "quota at 90%");
    assert_eq!(messages[1].message, "[ALERT] quota exceeded");
    for msg in &messages {
        assert_eq!(msg.fields, Fields::from([("user", "eve")]));
    }
}

#[inline(never)]
fn trace_through_filter<L: Logger>(logger: &L) -> L {
    logger.with_stack(0)
}

#[test]
fn test_stack_propagates_through_wrappers() {
    let recorder = RecorderLogger::new();
    let filter = FilterLogger::new(recorder.clone(), LogLevel::Debug).expect("parent supplied");

    let traced = trace_through_filter(&filter);
    traced.info().with_field("after", true).print(&[&"deep"]);

    let messages = recorder.messages();
    let stack = messages[0].stack.as_ref().expect("stack attached");
    let top = stack.top().expect("frames captured");
    assert!(
        top.name().contains("trace_through_filter"),
        "top frame was {}",
        top.name()
    );
    assert!(recorder.loglet().call_stack().is_none());
}

#[test]
fn test_shared_logger_across_backends() {
    fn handle_request<L: Logger>(logger: &L, id: u32) {
        let logger = logger.with_field("request_id", id);
        logger.info().print(&[&"start"]);
        logger.info().print(&[&"end"]);
    }

    let recorder = RecorderLogger::new();
    handle_request(&recorder, 7);
    handle_request(&DiscardLogger::new(), 7);
    handle_request(&WriterLogger::new(Vec::new()), 7);

    assert_eq!(recorder.len(), 2);
    assert!(recorder
        .messages()
        .iter()
        .all(|m| m.fields.get("request_id") == Some(&FieldValue::from(7))));
}

/// Re-run this binary with only `fatal_child_process`, in the given scenario
fn run_fatal_child(scenario: &str) -> std::process::Output {
    let exe = std::env::current_exe().expect("test binary path");
    Command::new(exe)
        .args(["--exact", "fatal_child_process", "--nocapture", "--test-threads=1"])
        .env(FATAL_CHILD_ENV, scenario)
        .output()
        .expect("failed to spawn child")
}

#[test]
fn test_fatal_exits_with_status_one() {
    let output = run_fatal_child("discard");

    assert_eq!(output.status.code(), Some(loglet::FATAL_EXIT_CODE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[FATAL] disk full"), "stderr was: {}", stderr);
}

#[test]
fn test_fatal_dropped_by_filter_still_exits() {
    let output = run_fatal_child("filter");

    assert_eq!(output.status.code(), Some(loglet::FATAL_EXIT_CODE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[FATAL] disk full"), "stderr was: {}", stderr);
}

#[test]
fn test_fatal_exits_when_drop_oldest_consumer_gone() {
    let output = run_fatal_child("drop-oldest");
    assert_eq!(output.status.code(), Some(loglet::FATAL_EXIT_CODE));
}

/// Runs only when spawned by `run_fatal_child`
#[test]
fn fatal_child_process() {
    let Some(scenario) = std::env::var_os(FATAL_CHILD_ENV) else {
        return;
    };

    match scenario.to_str() {
        Some("filter") => {
            let logger = FilterLogger::builder()
                .parent(RecorderLogger::new())
                .message_filter(|_, _| None)
                .build()
                .expect("parent supplied");
            logger.fatal().print(&[&"disk", &"full"]);
        }
        Some("drop-oldest") => {
            let (logger, rx) = ChannelLogger::builder()
                .buffer_size(1)
                .overflow_policy(OverflowPolicy::DropOldest)
                .build()
                .expect("valid configuration");
            drop(rx);
            logger.info().print(&[&"fills the queue"]);
            logger.fatal().print(&[&"disk", &"full"]);
        }
        _ => {
            let logger = DiscardLogger::new().with_field("volume", "/var");
            logger.fatal().print(&[&"disk", &"full"]);
        }
    }
    unreachable!("fatal returned");
}
