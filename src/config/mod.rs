// Configuration module entry point
// Builds the fixed server presets and resolves runtime paths

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ServeError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, CorsConfig, HttpConfig, LoggingConfig, RootDir, ServerConfig, Variant};

const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_METHODS: &str = "GET";
const CORS_ALLOW_HEADERS: &str = "Content-Type";
const CORS_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";

impl Variant {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Cors => "cors",
        }
    }
}

impl Config {
    /// Build the fixed configuration for one of the bundled servers.
    ///
    /// Only defaults are layered in: neither server reads a config file or
    /// the environment.
    pub fn preset(variant: Variant) -> Result<Self, ServeError> {
        let builder = config::Config::builder()
            .set_default("server.variant", variant.name())?
            .set_default(
                "http.server_name",
                concat!("lanserve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("http.cors.enabled", false)?
            .set_default("http.cors.allow_origin", CORS_ALLOW_ORIGIN)?
            .set_default("http.cors.allow_methods", CORS_ALLOW_METHODS)?
            .set_default("http.cors.allow_headers", CORS_ALLOW_HEADERS)?
            .set_default("http.cors.cache_control", CORS_CACHE_CONTROL)?
            .set_default("logging.access_log", true)?;

        let builder = match variant {
            Variant::Basic => builder
                .set_default("server.host", "0.0.0.0")?
                .set_default("server.port", 5000)?
                .set_default("server.root", "working_dir")?
                .set_default("server.handle_interrupt", false)?,
            Variant::Cors => builder
                .set_default("server.host", "")?
                .set_default("server.port", 8000)?
                .set_default("server.root", "program_dir")?
                .set_default("server.handle_interrupt", true)?
                .set_override("http.cors.enabled", true)?,
        };

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServeError> {
        // An empty host binds every interface
        let host = if self.server.host.is_empty() {
            "0.0.0.0"
        } else {
            self.server.host.as_str()
        };
        let addr = format!("{host}:{}", self.server.port);
        addr.parse()
            .map_err(|source| ServeError::InvalidAddress { addr, source })
    }

    /// Resolve the directory files are served from.
    pub fn resolve_root(&self) -> Result<PathBuf, ServeError> {
        let dir = match self.server.root {
            RootDir::WorkingDir => std::env::current_dir().map_err(ServeError::RootDir)?,
            RootDir::ProgramDir => {
                let exe = std::env::current_exe().map_err(ServeError::RootDir)?;
                exe.parent().map(PathBuf::from).ok_or_else(|| {
                    ServeError::RootDir(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("executable path has no parent: {}", exe.display()),
                    ))
                })?
            }
        };
        dir.canonicalize().map_err(ServeError::RootDir)
    }
}
