//! Directory listing module
//!
//! Renders an HTML page linking every immediate child of a directory.

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

use crate::error::RequestError;
use crate::handler::router::RequestContext;
use crate::http::{self, html};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// Directory, or a symlink to one
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown for the entry: `name/` for directories, `name@` for symlinks
    pub fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Percent-encoded relative link, with a trailing slash for directories
    pub fn href(&self) -> String {
        let encoded = urlencoding::encode(&self.name);
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded.into_owned()
        }
    }
}

/// Serve the listing of `dir`; `display_path` is the decoded request path
pub async fn serve_listing(
    ctx: &RequestContext<'_>,
    dir: &Path,
    display_path: &str,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let entries = read_entries(dir).await.map_err(|e| {
        logger::log_warning(&format!(
            "No permission to list directory '{}': {}",
            dir.display(),
            e
        ));
        RequestError::NotFound(ctx.path.to_string())
    })?;

    let page = render_listing(display_path, &entries);
    Ok(http::build_html_response(page, ctx.server_name, ctx.is_head))
}

/// Read the immediate children of `dir`, sorted for display
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|file_type| file_type.is_symlink());
        // Follows symlinks, so a link to a directory links as one
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|metadata| metadata.is_dir());

        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    sort_entries(&mut entries);
    Ok(entries)
}

/// Case-insensitive by name; the raw name breaks ties
fn sort_entries(entries: &mut [ListingEntry]) {
    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Render the listing page
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", html::escape(display_path));

    let mut page = String::with_capacity(256 + entries.len() * 64);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{title}</title>");
    page.push_str("</head>\n<body>\n");
    let _ = writeln!(page, "<h1>{title}</h1>");
    page.push_str("<hr>\n<ul>\n");
    for entry in entries {
        let _ = writeln!(
            page,
            "<li><a href=\"{}\">{}</a></li>",
            html::escape(&entry.href()),
            html::escape(&entry.display_name())
        );
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}
