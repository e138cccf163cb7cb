//! `dirserve`: a sequential HTTP/1 static file server.
//!
//! Serves regular files and generated directory listings from a root
//! directory, one connection at a time.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use crate::config::{Config, ServeContext};
pub use crate::error::{RequestError, ServeError};
