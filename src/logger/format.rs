//! Access log format module
//!
//! Supported formats:
//! - `common` (Common Log Format - CLF)
//! - `combined` (CLF plus referer and user agent)
//! - `json` (one JSON object per line)
//!
//! Names are checked against [`ACCESS_LOG_FORMATS`] when the serving
//! context is built, so `format` only ever sees one of them.

use chrono::{DateTime, Local};
use serde::Serialize;

/// Every access log format name accepted in configuration
pub const ACCESS_LOG_FORMATS: &[&str] = &["common", "combined", "json"];

/// Access log entry describing one request/response pair
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Client address
    pub remote_addr: String,
    /// Time the request was received
    pub time: DateTime<Local>,
    pub method: String,
    /// Raw request path (still percent-encoded)
    pub path: String,
    /// HTTP version (1.0, 1.1)
    pub http_version: String,
    pub status: u16,
    /// Response body size in bytes (0 for HEAD)
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the named format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "json" => self.format_json(),
            _ => self.format_common(),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}
