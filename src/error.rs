//! Server error types

use std::io;
use std::net::AddrParseError;

use thiserror::Error;

/// Errors that stop a server from starting or running
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid bind address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("cannot resolve root directory: {0}")]
    RootDir(#[source] io::Error),

    #[error("cannot register interrupt handler: {0}")]
    Signal(#[source] io::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}
