//! Request handler module
//!
//! Request dispatch, the static file handler it delegates to, and the CORS
//! middleware composed in front of it.

pub mod cors;
pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
