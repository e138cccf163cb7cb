// Server loop module
// Sequential accept loop: one connection at a time, each driven to completion

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::serve_connection;
use crate::config::ServeContext;
use crate::logger;

/// Accept and serve connections until `shutdown` resolves.
///
/// Each accepted connection is awaited inline before the next `accept`, so
/// no two requests are ever processed concurrently and a stalled client
/// stalls the server. `shutdown` is only observed while waiting in
/// `accept`; an in-flight connection is never cut short. Accept errors are
/// logged and the loop continues.
pub async fn run<F>(listener: TcpListener, state: Arc<ServeContext>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        serve_connection(stream, peer_addr, Arc::clone(&state)).await;
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                return;
            }
        }
    }
}
