// Server module entry point
// Connection acceptor: binding, the sequential accept loop, per-connection
// driving and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::run;

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, ServeContext};
use crate::error::ServeError;
use crate::logger;

/// Port the binary listens on
pub const DEFAULT_PORT: u16 = 8001;

/// Serve `root` on `0.0.0.0:port` until SIGINT/SIGTERM.
///
/// Bind and root failures are returned before anything is served; once the
/// listener is up the only way out is a shutdown signal.
pub async fn serve(port: u16, root: &Path, config: &Config) -> Result<(), ServeError> {
    let state = Arc::new(ServeContext::new(root, config)?);
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = create_listener(addr)?;

    logger::log_server_start(&listener.local_addr().unwrap_or(addr));
    run(listener, state, signal::shutdown_signal()).await;
    Ok(())
}
