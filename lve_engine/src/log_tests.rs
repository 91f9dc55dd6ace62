//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, DefaultLogger formatting and the log crate mapping.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::time::SystemTime;

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

#[test]
fn test_log_severity_from_log_level() {
    assert_eq!(LogSeverity::from(::log::Level::Trace), LogSeverity::Trace);
    assert_eq!(LogSeverity::from(::log::Level::Debug), LogSeverity::Debug);
    assert_eq!(LogSeverity::from(::log::Level::Info), LogSeverity::Info);
    assert_eq!(LogSeverity::from(::log::Level::Warn), LogSeverity::Warn);
    assert_eq!(LogSeverity::from(::log::Level::Error), LogSeverity::Error);
}

#[test]
fn test_log_severity_level_filter() {
    assert_eq!(LogSeverity::Warn.to_level_filter(), ::log::LevelFilter::Warn);
    assert_eq!(LogSeverity::Trace.to_level_filter(), ::log::LevelFilter::Trace);
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "lve::Renderer".to_string(),
        message: "Swap chain recreated".to_string(),
        file,
        line,
    }
}

#[test]
fn test_log_entry_clone() {
    let original = entry(LogSeverity::Info, None, None);
    let cloned = original.clone();
    assert_eq!(cloned.severity, original.severity);
    assert_eq!(cloned.source, original.source);
    assert_eq!(cloned.message, original.message);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_format_without_location() {
    colored::control::set_override(false);
    let line = DefaultLogger::format_entry(&entry(LogSeverity::Info, None, None));
    assert!(line.contains("[INFO ]"));
    assert!(line.contains("[lve::Renderer]"));
    assert!(line.ends_with("Swap chain recreated"));
}

#[test]
fn test_default_logger_format_with_location() {
    colored::control::set_override(false);
    let line = DefaultLogger::format_entry(&entry(LogSeverity::Error, Some("renderer.rs"), Some(42)));
    assert!(line.contains("[ERROR]"));
    assert!(line.ends_with("(renderer.rs:42)"));
}

#[test]
fn test_default_logger_all_severities_do_not_panic() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&entry(severity, None, None));
    }
}

#[test]
fn test_logger_trait_object() {
    let logger: Box<dyn Logger> = Box::new(DefaultLogger);
    logger.log(&entry(LogSeverity::Debug, None, None));
}
