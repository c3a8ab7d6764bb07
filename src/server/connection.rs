// Connection handling module
// Serves one accepted TCP connection to completion

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve a single connection.
///
/// Keep-alive is disabled so each connection carries exactly one request and
/// the sequential accept loop is never held by an idle client.
pub async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder.keep_alive(false);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, peer_addr, Arc::clone(&state))),
    );

    if let Err(err) = conn.await {
        logger::log_connection_error(&err);
    }
}
