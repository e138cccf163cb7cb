// Connection module
// Drives a single accepted TCP connection through exactly one request

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body as _, Bytes, Incoming};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, Version};
use hyper_util::rt::TokioIo;

use crate::config::ServeContext;
use crate::handler;
use crate::logger::{self, AccessLogEntry};

/// Serve one connection to completion.
///
/// Keep-alive is disabled, so hyper answers a single request, marks the
/// response `Connection: close` and shuts the stream down. Malformed request
/// heads are answered by hyper with 400 before the connection closes.
pub async fn serve_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<ServeContext>,
) {
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder.keep_alive(false);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { Ok::<_, Infallible>(respond(req, &state, peer_addr).await) }
        }),
    );

    if let Err(err) = conn.await {
        logger::log_connection_error(&err);
    }
}

async fn respond(
    req: Request<Incoming>,
    state: &ServeContext,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>> {
    let started = Instant::now();
    let response = handler::handle_request(&req, state).await;

    if state.access_log {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.access_log_format);
    }

    response
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(peer_addr.to_string(), req.method().to_string(), target);
    entry.http_version = match req.version() {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_access_entry() {
        let req = Request::builder()
            .method("HEAD")
            .uri("/sub/a.txt?x=1")
            .version(Version::HTTP_10)
            .header("user-agent", "curl/8.0")
            .body(())
            .unwrap();
        let response = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from_static(b"gone")))
            .unwrap();

        let entry = access_entry(
            &req,
            &response,
            "10.0.0.7:41000".parse().unwrap(),
            Instant::now(),
        );
        assert_eq!(entry.method, "HEAD");
        assert_eq!(entry.path, "/sub/a.txt?x=1");
        assert_eq!(entry.http_version, "1.0");
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, 4);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
        assert!(entry.format("common").starts_with("10.0.0.7:41000 - - ["));
    }
}
