//! Path resolution module
//!
//! Maps a request path onto the filesystem under the root. Two layers keep
//! requests inside the root: a lexical pass that rejects `..` segments, and
//! a canonical check that rejects anything (symlinks included) resolving
//! outside it.

use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::error::RequestError;
use crate::logger;

/// Percent-decode a raw request path.
///
/// Fails on sequences that decode to invalid UTF-8 or to a NUL byte.
pub fn decode_request_path(raw: &str) -> Result<String, RequestError> {
    let decoded = urlencoding::decode(raw)
        .map_err(|_| RequestError::Malformed(format!("path is not valid UTF-8: {raw}")))?;
    if decoded.contains('\0') {
        return Err(RequestError::Malformed(format!("path contains NUL: {raw}")));
    }
    Ok(decoded.into_owned())
}

/// Join a decoded request path onto `root` segment by segment.
///
/// Empty and `.` segments are skipped. `..`, or any segment the platform
/// would read as more than one plain path component, is a traversal attempt.
pub fn resolve_path(root: &Path, decoded: &str) -> Result<PathBuf, RequestError> {
    let mut resolved = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => resolved.push(segment),
            _ => {
                logger::log_warning(&format!("Path traversal attempt blocked: {decoded}"));
                return Err(RequestError::PathTraversal(decoded.to_string()));
            }
        }
    }
    Ok(resolved)
}

/// Canonicalize `path` and require it to stay under the canonical `root`.
///
/// A path that cannot be canonicalized does not exist (or is unreachable)
/// and yields `NotFound`.
pub async fn ensure_within_root(
    root: &Path,
    path: &Path,
    request_path: &str,
) -> Result<PathBuf, RequestError> {
    let canonical = fs::canonicalize(path)
        .await
        .map_err(|_| RequestError::NotFound(request_path.to_string()))?;
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        return Err(RequestError::PathTraversal(request_path.to_string()));
    }
    Ok(canonical)
}
