//! Logger module
//!
//! Provides logging utilities for the server:
//! - Startup notice
//! - Optional per-request access log
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, ACCESS_LOG_FORMATS};

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// The single startup line: `Serving on http://<addr>`
pub fn log_server_start(addr: &SocketAddr) {
    write_info(&format!("Serving on http://{addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_info("Keyboard interrupt received, exiting.");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
