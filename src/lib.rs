//! Minimal static file servers for local development and LAN file access.
//!
//! Two presets share this library: a plain file server rooted at the launch
//! directory, and a variant that adds CORS headers and answers preflight
//! requests. See [`config::Variant`].

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServeError;
pub use server::run;
