//! File logging example
//!
//! Demonstrates a filtered JSON writer on a file.
//!
//! Run with: cargo run --example file_logging

use loglet::prelude::*;
use std::fs::OpenOptions;

fn main() -> Result<()> {
    println!("=== Loglet - File Logging Example ===\n");

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("application.log")?;

    let writer = WriterLogger::builder(file)
        .output_format(OutputFormat::Json)
        .timestamp_format(TimestampFormat::Rfc3339)
        .build()?;

    // Mask secrets before they reach the file
    let logger = FilterLogger::builder()
        .parent(writer)
        .threshold(LogLevel::Info)
        .field_filter(|key, value| match key {
            "password" | "token" => Some((key.to_string(), FieldValue::from("[redacted]"))),
            _ => Some((key.to_string(), value)),
        })
        .build()?;

    println!("1. Logging to application.log:");

    let app = logger.with_field("app", "inventory");
    app.info().print(&[&"Application started"]);
    app.debug().print(&[&"Loading configuration..."]);
    app.with_fields([("user", "admin"), ("password", "hunter2")])
        .info()
        .print(&[&"User logged in"]);
    app.warn().print(&[&"Using default settings for some options"]);
    app.error().print(&[&"Failed to load optional plugin"]);

    println!("   Done. Check application.log (the debug line is filtered out).");

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
