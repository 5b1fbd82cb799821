//! Basic logger usage example
//!
//! Demonstrates levels, fields and branching with a stderr writer.
//!
//! Run with: cargo run --example basic_usage

use loglet::prelude::*;
use loglet::{info, warn};

fn main() -> Result<()> {
    println!("=== Loglet - Basic Usage Example ===\n");

    let logger = WriterLogger::stderr();

    println!("1. Logging at different levels:");
    logger.debug().print(&[&"This is a debug message"]);
    logger.info().print(&[&"This is an info message"]);
    logger.warn().print(&[&"This is a warning message"]);
    logger.error().print(&[&"This is an error message"]);
    logger.print(&[&"This message has no level"]);

    println!("\n2. Fields and branching:");
    let service = logger.with_field("service", "billing");
    let eu = service.with_field("region", "eu-west-1");
    let us = service.with_field("region", "us-east-1");
    eu.info().print(&[&"invoices sent:", &128]);
    us.info().print(&[&"invoices sent:", &97]);
    service.info().print(&[&"parent logger unchanged"]);

    println!("\n3. Threshold and formatting macros:");
    let quiet = WriterLogger::builder(std::io::stderr())
        .threshold(LogLevel::Warn)
        .output_format(OutputFormat::Logfmt)
        .build()?;
    info!(quiet, "hidden: {} items", 3);
    warn!(quiet, "visible: retry {} of {}", 2, 5);

    println!("\n4. Errors and call stacks:");
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
    logger
        .error()
        .with_error(&err)
        .with_stack(0)
        .print(&[&"failed to load configuration"]);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
