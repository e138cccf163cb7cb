//! HTTP protocol layer module
//!
//! Response builders, MIME detection and HTML helpers, decoupled from
//! path resolution and filesystem access.

pub mod html;
pub mod mime;
pub mod response;

pub use response::{
    build_error_response, build_file_response, build_html_response, build_redirect_response,
};
