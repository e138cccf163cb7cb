//! HTTP response building module
//!
//! Every builder sets `Content-Length` to the full body size and drops the
//! body itself for HEAD, so HEAD and GET share identical headers. Every
//! response closes its connection.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderName, ALLOW, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, LOCATION, SERVER,
};
use hyper::{Response, StatusCode};

use super::html;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Build 200 response carrying a file's bytes
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    build_response(StatusCode::OK, data, content_type, server_name, is_head, None)
}

/// Build 200 HTML response
pub fn build_html_response(
    content: String,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    build_response(
        StatusCode::OK,
        Bytes::from(content),
        HTML_CONTENT_TYPE,
        server_name,
        is_head,
        None,
    )
}

/// Build 301 redirect response (directory requested without trailing slash)
pub fn build_redirect_response(
    location: &str,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    build_response(
        StatusCode::MOVED_PERMANENTLY,
        Bytes::new(),
        HTML_CONTENT_TYPE,
        server_name,
        is_head,
        Some((LOCATION, location)),
    )
}

/// Build an error response with a short HTML body
///
/// 501 responses advertise the supported methods in `Allow`.
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = html::error_page(
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
        message,
    );
    let allow = (status == StatusCode::NOT_IMPLEMENTED).then_some((ALLOW, "GET, HEAD"));
    build_response(
        status,
        Bytes::from(body),
        HTML_CONTENT_TYPE,
        server_name,
        is_head,
        allow,
    )
}

fn build_response(
    status: StatusCode,
    data: Bytes,
    content_type: &str,
    server_name: &str,
    is_head: bool,
    extra_header: Option<(HeaderName, &str)>,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(status)
        .header(SERVER, server_name)
        .header(CONNECTION, "close")
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);
    if let Some((name, value)) = extra_header {
        builder = builder.header(name, value);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(status, &e);
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = status;
        fallback
    })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
