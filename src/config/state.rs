// Application state module
// Shared, read-only state handed to every request

use std::path::PathBuf;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical directory that request paths are resolved against
    pub root: PathBuf,
}

impl AppState {
    pub const fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }

    pub fn cors_enabled(&self) -> bool {
        self.config.http.cors.enabled
    }
}
