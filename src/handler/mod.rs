//! Request handler module
//!
//! Turns one parsed request plus the serving context into one response:
//! a file, a directory listing, a redirect, or an error page.

pub mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
