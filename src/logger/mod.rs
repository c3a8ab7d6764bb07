//! Logger module
//!
//! Provides logging utilities for the file servers including:
//! - Startup and shutdown banners (stdout)
//! - Access logging in Common Log Format (stderr)
//! - Error and warning logging (stderr)

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, Variant};
use std::net::SocketAddr;
use std::path::Path;

/// Write to info log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

/// Print the startup banner for the running variant
pub fn log_server_start(addr: &SocketAddr, config: &Config, root: &Path) {
    let port = addr.port();
    match config.server.variant {
        Variant::Basic => {
            write_info(&format!("Server running at http://localhost:{port}"));
            write_info(&format!(
                "On remote devices, visit http://[your IP address]:{port}"
            ));
        }
        Variant::Cors => {
            write_info(&format!("Starting server on port {port}..."));
            write_info(&format!("Current working directory: {}", root.display()));
            write_info("Press Ctrl+C to stop the server");
            write_info(&format!("Server running at http://localhost:{port}"));
        }
    }
}

pub fn log_server_stopped() {
    write_info("\nServer stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    write_error(&entry.format_common());
}
