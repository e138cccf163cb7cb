// Listener module
// Creates the TCP listener the accept loop runs on

use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::ServeError;

/// Create a `TcpListener` bound to `addr` with `SO_REUSEADDR` enabled.
///
/// Must be called from within a Tokio runtime. Any failure is reported as
/// `ServeError::Bind`.
pub fn create_listener(addr: SocketAddr) -> Result<TcpListener, ServeError> {
    bind_socket(addr).map_err(|source| ServeError::Bind { addr, source })
}

fn bind_socket(addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Allow rebinding while old connections sit in TIME_WAIT
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_port_in_use_is_bind_error() {
        let first = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = first.local_addr().unwrap();

        match create_listener(addr) {
            Err(ServeError::Bind { addr: failed, .. }) => assert_eq!(failed, addr),
            other => panic!("expected bind error, got {other:?}"),
        }
    }
}
