// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub logging: LoggingConfig,
    pub http: HttpConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log one line per request (off by default: startup notice only)
    pub access_log: bool,
    /// Access log format (common, combined, json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    /// Files served in place of a directory listing, tried in order
    #[serde(default)]
    pub index_files: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

/// Default `Server` header value
pub fn default_server_name() -> String {
    format!("dirserve/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                access_log: false,
                access_log_format: default_access_log_format(),
                access_log_file: None,
                error_log_file: None,
            },
            http: HttpConfig {
                server_name: default_server_name(),
                index_files: Vec::new(),
            },
        }
    }
}
