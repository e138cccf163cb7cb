//! MIME type detection module
//!
//! Returns the Content-Type for a served file based on its extension.

use std::path::Path;

/// Fallback for unknown or missing extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Get the Content-Type for a file path.
///
/// Extensions match case-insensitively.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use dirserve::http::mime::content_type_for;
/// assert_eq!(content_type_for(Path::new("index.HTML")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Path::new("a.unknown")), "application/octet-stream");
/// assert_eq!(content_type_for(Path::new("Makefile")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    get_content_type(extension.as_deref())
}

/// Get MIME Content-Type for a lowercase file extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md" | "log") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv",
        Some("xml") => "application/xml",

        // Scripts and data
        Some("js" | "mjs") => "text/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogv") => "video/ogg",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/x-wav",
        Some("ogg" | "oga") => "audio/ogg",
        Some("flac") => "audio/flac",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents and archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => OCTET_STREAM,
    }
}
