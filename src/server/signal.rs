// Signal handling module
// Ctrl+C / SIGINT as a shutdown future

use std::future::Future;
use std::io;

/// Register an interrupt handler and return a future that resolves on the
/// next interrupt.
///
/// Registration happens before this returns, so an interrupt arriving any
/// time afterwards is caught rather than killing the process.
#[cfg(unix)]
pub fn interrupt() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    Ok(async move {
        sigint.recv().await;
    })
}

/// Windows fallback - Ctrl+C only
#[cfg(not(unix))]
pub fn interrupt() -> io::Result<impl Future<Output = ()>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        ctrl_c.recv().await;
    })
}
