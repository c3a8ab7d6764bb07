// Listener module
// Creates the single TCP listener a server owns for its lifetime

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Create a `TcpListener` bound to `addr`.
///
/// On Unix `SO_REUSEADDR` lets a restarted server reclaim a port left in
/// `TIME_WAIT`. `SO_REUSEPORT` stays off, so binding a port that another
/// server is still listening on fails with `AddrInUse`. Windows gets no reuse
/// option at all: there `SO_REUSEADDR` would let a second server steal a port
/// that is actively listening.
///
/// Must be called from within a Tokio runtime.
pub fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    #[cfg(not(windows))]
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    // socket2::Socket -> std::net::TcpListener -> tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
