//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! resolution, and dispatch to file serving or directory listing.

use crate::config::ServeContext;
use crate::error::RequestError;
use crate::handler::{listing, resolve, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use tokio::fs;

/// Per-request values threaded through the serving functions
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub server_name: &'a str,
}

/// Main entry point for HTTP request handling.
///
/// Never fails: every `RequestError` becomes an error response here.
pub async fn handle_request<B>(req: &Request<B>, state: &ServeContext) -> Response<Full<Bytes>> {
    let ctx = RequestContext {
        path: req.uri().path(),
        query: req.uri().query(),
        is_head: req.method() == Method::HEAD,
        server_name: &state.server_name,
    };

    match respond(req.method(), &ctx, state).await {
        Ok(response) => response,
        Err(err) => {
            // Traversal and read failures are logged where they are detected
            if matches!(
                err,
                RequestError::Malformed(_) | RequestError::UnsupportedMethod(_)
            ) {
                logger::log_warning(&err.to_string());
            }
            http::build_error_response(err.status(), &err.message(), ctx.server_name, ctx.is_head)
        }
    }
}

async fn respond(
    method: &Method,
    ctx: &RequestContext<'_>,
    state: &ServeContext,
) -> Result<Response<Full<Bytes>>, RequestError> {
    check_http_method(method)?;

    if !ctx.path.starts_with('/') {
        return Err(RequestError::Malformed(format!(
            "unsupported request target: {}",
            ctx.path
        )));
    }

    let decoded = resolve::decode_request_path(ctx.path)?;
    let target = resolve::resolve_path(&state.root, &decoded)?;
    let canonical = resolve::ensure_within_root(&state.root, &target, ctx.path).await?;

    let metadata = fs::metadata(&canonical)
        .await
        .map_err(|_| RequestError::NotFound(ctx.path.to_string()))?;
    let trailing_slash = ctx.path.ends_with('/');

    if metadata.is_dir() {
        if !trailing_slash {
            return Ok(redirect_to_directory(ctx));
        }
        if let Some(index) = static_files::find_index_file(&canonical, &state.index_files).await {
            // The index may itself be a symlink leading out of the root
            let index_canonical = resolve::ensure_within_root(&state.root, &index, ctx.path).await?;
            return static_files::serve_file(ctx, &index_canonical, &index).await;
        }
        return listing::serve_listing(ctx, &canonical, &decoded).await;
    }

    // A file addressed as if it were a directory does not exist
    if !metadata.is_file() || trailing_slash {
        return Err(RequestError::NotFound(ctx.path.to_string()));
    }

    static_files::serve_file(ctx, &canonical, &target).await
}

/// Only GET and HEAD are served
fn check_http_method(method: &Method) -> Result<(), RequestError> {
    match *method {
        Method::GET | Method::HEAD => Ok(()),
        _ => Err(RequestError::UnsupportedMethod(method.clone())),
    }
}

/// 301 to the same path with a trailing slash, keeping the query string.
///
/// Leading slashes collapse to one so `//host` never becomes a
/// protocol-relative `Location` pointing at another host.
fn redirect_to_directory(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    let path = format!("/{}", ctx.path.trim_start_matches('/'));
    let location = match ctx.query {
        Some(query) => format!("{path}/?{query}"),
        None => format!("{path}/"),
    };
    http::build_redirect_response(&location, ctx.server_name, ctx.is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::test_support::TempRoot;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn scenario() -> (TempRoot, ServeContext) {
        let root = TempRoot::new("router");
        root.write("index.html", b"hello world\n");
        root.mkdir("sub");
        root.write("sub/a.txt", b"alpha");
        let state = ServeContext::new(root.path(), &Config::default()).unwrap();
        (root, state)
    }

    async fn send(state: &ServeContext, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(&req, state).await
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn header<'a>(resp: &'a Response<Full<Bytes>>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).map(|v| v.to_str().unwrap())
    }

    #[tokio::test]
    async fn test_get_file() {
        let (_root, state) = scenario();
        let resp = send(&state, Method::GET, "/index.html").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-length"), Some("12"));
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(body_string(resp).await, "hello world\n");
    }

    #[tokio::test]
    async fn test_get_directory_listing() {
        let (_root, state) = scenario();
        let resp = send(&state, Method::GET, "/sub/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=utf-8"));
        let body = body_string(resp).await;
        assert!(body.contains("<a href=\"a.txt\">a.txt</a>"));
        assert!(!body.contains("index.html"));
    }

    #[tokio::test]
    async fn test_root_lists_even_with_index_html() {
        let (_root, state) = scenario();
        let body = body_string(send(&state, Method::GET, "/").await).await;
        assert!(body.contains("Directory listing for /"));
        assert!(body.contains("<a href=\"index.html\">index.html</a>"));
        assert!(body.contains("<a href=\"sub/\">sub/</a>"));
    }

    #[tokio::test]
    async fn test_index_file_when_configured() {
        let root = TempRoot::new("router-index");
        root.write("index.html", b"home");
        let config = Config::from_toml("[http]\nindex_files = [\"index.html\"]").unwrap();
        let state = ServeContext::new(root.path(), &config).unwrap();

        let resp = send(&state, Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "home");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (_root, state) = scenario();
        let resp = send(&state, Method::GET, "/missing.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_string(resp).await.contains("File not found"));
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let (_root, state) = scenario();
        for uri in ["/../etc/passwd", "/sub/../../etc/passwd", "/%2e%2e/etc/passwd", "/sub/%2E%2E/%2E%2E/x"] {
            let resp = send(&state, Method::GET, uri).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "uri {uri}");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_forbidden() {
        let (root, state) = scenario();
        let outside = TempRoot::new("router-outside");
        outside.write("secret.txt", b"secret");
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.path().join("leak.txt"))
            .unwrap();

        let resp = send(&state, Method::GET, "/leak.txt").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(!body_string(resp).await.contains("secret"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_index_out_of_root_is_forbidden() {
        let root = TempRoot::new("router-index-link");
        let outside = TempRoot::new("router-index-outside");
        outside.write("secret.txt", b"TOPSECRET");
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.path().join("index.html"))
            .unwrap();
        let config = Config::from_toml("[http]\nindex_files = [\"index.html\"]").unwrap();
        let state = ServeContext::new(root.path(), &config).unwrap();

        for uri in ["/", "/index.html"] {
            let resp = send(&state, Method::GET, uri).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{uri}");
            assert!(!body_string(resp).await.contains("TOPSECRET"), "{uri}");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_inside_root_keeps_requested_type() {
        let (root, state) = scenario();
        root.write("data.bin", b"plain text");
        std::os::unix::fs::symlink(root.path().join("data.bin"), root.path().join("notes.txt"))
            .unwrap();

        let resp = send(&state, Method::GET, "/notes.txt").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(body_string(resp).await, "plain text");
    }

    #[tokio::test]
    async fn test_unsupported_methods() {
        let (_root, state) = scenario();
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS, Method::PATCH] {
            for uri in ["/index.html", "/missing", "/../etc/passwd"] {
                let resp = send(&state, method.clone(), uri).await;
                assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED, "{method} {uri}");
                assert_eq!(header(&resp, "allow"), Some("GET, HEAD"));
            }
        }
    }

    #[tokio::test]
    async fn test_head_matches_get_headers() {
        let (_root, state) = scenario();
        for uri in ["/index.html", "/sub/", "/sub", "/missing.txt"] {
            let get = send(&state, Method::GET, uri).await;
            let head = send(&state, Method::HEAD, uri).await;
            assert_eq!(get.status(), head.status(), "{uri}");
            assert_eq!(get.headers(), head.headers(), "{uri}");
            assert!(body_string(head).await.is_empty(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let (_root, state) = scenario();
        let resp = send(&state, Method::GET, "/sub").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(header(&resp, "location"), Some("/sub/"));

        let resp = send(&state, Method::GET, "/sub?sort=name").await;
        assert_eq!(header(&resp, "location"), Some("/sub/?sort=name"));
    }

    #[tokio::test]
    async fn test_redirect_collapses_leading_slashes() {
        let (root, state) = scenario();
        root.mkdir("evil.com");

        let resp = send(&state, Method::GET, "//evil.com").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(header(&resp, "location"), Some("/evil.com/"));

        let resp = send(&state, Method::GET, "///evil.com?x=1").await;
        assert_eq!(header(&resp, "location"), Some("/evil.com/?x=1"));
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_not_found() {
        let (_root, state) = scenario();
        let resp = send(&state, Method::GET, "/index.html/").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_string_is_ignored() {
        let (_root, state) = scenario();
        let resp = send(&state, Method::GET, "/sub/a.txt?download=1").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "alpha");
    }

    #[tokio::test]
    async fn test_percent_encoded_names() {
        let (root, state) = scenario();
        root.write("with space.txt", b"spaced");

        let resp = send(&state, Method::GET, "/with%20space.txt").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "spaced");

        let body = body_string(send(&state, Method::GET, "/").await).await;
        assert!(body.contains("<a href=\"with%20space.txt\">with space.txt</a>"));
    }

    #[tokio::test]
    async fn test_invalid_encoding_is_bad_request() {
        let (_root, state) = scenario();
        let resp = send(&state, Method::GET, "/%FF.txt").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = send(&state, Method::GET, "/a%00.txt").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let (root, state) = scenario();
        root.write("blob.bin", &[0, 159, 146, 150]);
        let resp = send(&state, Method::GET, "/blob.bin").await;
        assert_eq!(header(&resp, "content-type"), Some("application/octet-stream"));
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], &[0, 159, 146, 150]);
    }

    #[tokio::test]
    async fn test_server_header() {
        let (_root, state) = scenario();
        let resp = send(&state, Method::GET, "/missing").await;
        assert_eq!(header(&resp, "server"), Some(state.server_name.as_str()));
    }
}
