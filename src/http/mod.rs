//! HTTP protocol layer module
//!
//! Protocol helpers shared by the request handlers: content types, date
//! validators, path decoding, and response builders.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_error_response, build_file_response, build_html_response,
    build_options_response, build_redirect_response,
};
