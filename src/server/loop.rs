// Server loop module
// Sequential accept-and-serve loop with an external shutdown trigger

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::serve_connection;
use crate::config::AppState;
use crate::logger;

/// Accept and serve connections one at a time until `shutdown` resolves.
///
/// Each connection is served to completion before the next accept. The
/// shutdown future is raced against both steps, so an in-flight request is
/// abandoned when it fires. The listener is dropped on return.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let (stream, peer_addr) = tokio::select! {
            biased;
            () = &mut shutdown => break,
            accept_result = listener.accept() => match accept_result {
                Ok(accepted) => accepted,
                Err(e) => {
                    logger::log_error(&format!("Failed to accept connection: {e}"));
                    continue;
                }
            },
        };

        tokio::select! {
            biased;
            () = &mut shutdown => break,
            () = serve_connection(stream, peer_addr, Arc::clone(&state)) => {}
        }
    }

    drop(listener);
}
