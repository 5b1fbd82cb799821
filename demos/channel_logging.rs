//! Channel logging example
//!
//! Worker threads log through a shared channel logger while a consumer
//! thread renders the messages as JSON.
//!
//! Run with: cargo run --example channel_logging

use loglet::prelude::*;
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    println!("=== Loglet - Channel Logging Example ===\n");

    let (logger, rx) = ChannelLogger::builder()
        .buffer_size(256)
        .threshold(LogLevel::Info)
        .overflow_policy(OverflowPolicy::AlertAndDrop)
        .on_overflow(Arc::new(|count| {
            eprintln!("{} log messages dropped", count);
        }))
        .build()?;

    let consumer = thread::spawn(move || {
        for msg in rx.iter() {
            match msg.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("unserializable message: {}", e),
            }
        }
    });

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let logger = logger.with_field("worker", id);
            thread::spawn(move || {
                for job in 0..3 {
                    let logger = logger.with_field("job", job);
                    logger.debug().print(&[&"filtered by threshold"]);
                    logger.info().printf(format_args!("job {} finished", job));
                }
            })
        })
        .collect();

    for worker in workers {
        let _ = worker.join();
    }

    let metrics = logger.metrics();
    println!(
        "\nDelivered: {}, dropped: {}",
        metrics.delivered_count(),
        metrics.dropped_count()
    );

    // Closing the last sender ends the consumer loop
    drop(logger);
    let _ = consumer.join();

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
