//! Error types
//!
//! `ServeError` covers startup failures, which are fatal. `RequestError`
//! covers per-request failures; the handler turns each one into an HTTP
//! error response and the accept loop never sees it.

use hyper::{Method, StatusCode};
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fatal startup error
#[derive(Debug)]
pub enum ServeError {
    /// The listening socket could not be created or bound
    Bind { addr: SocketAddr, source: io::Error },
    /// The root directory could not be resolved
    Root { path: PathBuf, source: io::Error },
    /// A configuration value is outside its allowed set
    Config(String),
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::Root { path, source } => {
                write!(f, "cannot use '{}' as root: {source}", path.display())
            }
            Self::Config(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::Root { source, .. } => Some(source),
            Self::Config(_) => None,
        }
    }
}

/// Per-request error, always answered with an error response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request target could not be interpreted
    Malformed(String),
    /// The path tries to leave the root
    PathTraversal(String),
    /// Nothing servable exists at the path
    NotFound(String),
    /// Anything other than GET or HEAD
    UnsupportedMethod(Method),
}

impl RequestError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::PathTraversal(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UnsupportedMethod(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Short message shown in the error page
    pub fn message(&self) -> String {
        match self {
            Self::Malformed(reason) => format!("Bad request: {reason}"),
            Self::PathTraversal(_) => "Path escapes the served directory".to_string(),
            Self::NotFound(_) => "File not found".to_string(),
            Self::UnsupportedMethod(method) => format!("Unsupported method ('{method}')"),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(reason) => write!(f, "malformed request: {reason}"),
            Self::PathTraversal(path) => write!(f, "path traversal blocked: {path}"),
            Self::NotFound(path) => write!(f, "not found: {path}"),
            Self::UnsupportedMethod(method) => write!(f, "unsupported method: {method}"),
        }
    }
}

impl std::error::Error for RequestError {}
