// Serving context module
// Immutable state shared by every request for the lifetime of the process

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::ServeError;
use crate::logger::ACCESS_LOG_FORMATS;

/// Everything the request handler needs besides the request itself
#[derive(Debug, Clone)]
pub struct ServeContext {
    /// Canonical root directory
    pub root: PathBuf,
    pub server_name: String,
    pub index_files: Vec<String>,
    pub access_log: bool,
    pub access_log_format: String,
}

impl ServeContext {
    /// Build the context, canonicalizing `root` so that later containment
    /// checks compare canonical paths.
    ///
    /// An `access_log_format` outside [`ACCESS_LOG_FORMATS`] is rejected.
    pub fn new(root: &Path, config: &Config) -> Result<Self, ServeError> {
        let format = &config.logging.access_log_format;
        if !ACCESS_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ServeError::Config(format!(
                "unknown access_log_format '{format}' (expected one of {})",
                ACCESS_LOG_FORMATS.join(", ")
            )));
        }

        let canonical = root.canonicalize().map_err(|source| ServeError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(ServeError::Root {
                path: root.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a directory",
                ),
            });
        }

        Ok(Self {
            root: canonical,
            server_name: config.http.server_name.clone(),
            index_files: config.http.index_files.clone(),
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
        })
    }
}
