// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Which of the two bundled servers a configuration describes
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Plain file server on port 5000, rooted at the launch directory
    Basic,
    /// File server on port 8000 with CORS headers and preflight handling
    Cors,
}

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub variant: Variant,
    /// Bind host; empty string means all interfaces
    pub host: String,
    pub port: u16,
    pub root: RootDir,
    /// Catch Ctrl+C and stop cleanly instead of being killed
    pub handle_interrupt: bool,
}

/// Where served files are resolved from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RootDir {
    /// The directory the process was launched from
    WorkingDir,
    /// The directory containing the running executable
    ProgramDir,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub index_files: Vec<String>,
    pub cors: CorsConfig,
}

/// Cross-origin headers appended to every response when enabled
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    pub cache_control: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}
