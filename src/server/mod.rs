// Server module entry point
// Runtime setup, binding, and the serve loop

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), use server_loop instead
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;

use crate::config::{AppState, Config};
use crate::error::ServeError;
use crate::logger;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::serve;

/// Run a server to completion on a single-threaded runtime.
///
/// Returns once an interrupt is caught (when the config asks for it). A
/// server without interrupt handling runs until the process is killed.
pub fn run(config: Config) -> Result<(), ServeError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ServeError::Runtime)?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), ServeError> {
    let root = config.resolve_root()?;
    let addr = config.get_socket_addr()?;
    let listener = create_listener(addr)
        .map_err(|source| ServeError::Bind { addr, source })?;

    // Registered before the banner so an interrupt is never missed
    let interrupt = if config.server.handle_interrupt {
        Some(signal::interrupt().map_err(ServeError::Signal)?)
    } else {
        None
    };

    logger::log_server_start(&addr, &config, &root);

    let state = Arc::new(AppState::new(config, root));

    match interrupt {
        Some(interrupt) => {
            serve(listener, state, interrupt).await;
            logger::log_server_stopped();
        }
        None => serve(listener, state, std::future::pending()).await,
    }
    Ok(())
}
