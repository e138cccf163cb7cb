//! Static file serving module
//!
//! Loads regular files and builds their responses.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::RequestError;
use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve a regular file.
///
/// `file_path` is the checked canonical path that is read; the Content-Type
/// comes from the extension of `requested_path`, the name the client asked
/// for (they differ when a symlink inside the root is followed).
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    requested_path: &Path,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let content = fs::read(file_path).await.map_err(|e| {
        logger::log_warning(&format!(
            "Failed to read file '{}': {}",
            file_path.display(),
            e
        ));
        RequestError::NotFound(ctx.path.to_string())
    })?;

    let content_type = mime::content_type_for(requested_path);
    Ok(http::build_file_response(
        Bytes::from(content),
        content_type,
        ctx.server_name,
        ctx.is_head,
    ))
}

/// First configured index file that exists as a regular file in `dir`
pub async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if let Ok(metadata) = fs::metadata(&candidate).await {
            if metadata.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}
