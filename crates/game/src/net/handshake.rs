//! One-shot handshake between exactly two endpoints. The host waits on the
//! well-known port for any datagram; the joiner greets and waits for a reply.
//! Neither side retries its handshake datagram.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use super::clock::Clock;
use crate::session::{SessionConfig, SessionError};

pub const GREETING: &[u8] = b"hello";
pub const HOST_ACK: &[u8] = b"ok";
pub const JOIN_ACK: &[u8] = b"ack";

pub(crate) fn bind_host(port: u16) -> Result<UdpSocket, SessionError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))?;
    Ok(socket)
}

pub(crate) fn bind_join() -> Result<UdpSocket, SessionError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    Ok(socket)
}

/// Accepts `ip`, `host` or `ip:port`. Without a port the well-known one is
/// used. IPv4 results are preferred since the host listens on IPv4.
pub fn resolve(address: &str, port: u16) -> Result<SocketAddr, SessionError> {
    let address = address.trim();
    let invalid = || SessionError::InvalidAddress {
        address: address.to_string(),
    };

    if address.is_empty() {
        return Err(invalid());
    }

    if let Ok(addr) = address.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let candidates: Vec<SocketAddr> = (address, port)
        .to_socket_addrs()
        .map_err(|_| invalid())?
        .collect();

    candidates
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(invalid)
}

pub(crate) fn await_peer(
    socket: &UdpSocket,
    config: &SessionConfig,
    clock: &dyn Clock,
) -> Result<SocketAddr, SessionError> {
    log::info!("Awaiting connection on {}", socket.local_addr()?);

    let mut buffer = vec![0u8; config.receive_buffer_size];
    let Some((_, peer)) = wait_for_datagram(
        socket,
        &mut buffer,
        config.host_timeout(),
        config.poll_interval(),
        clock,
    )?
    else {
        log::info!("No one connected within {:?}", config.host_timeout());
        return Err(SessionError::HostTimeout);
    };

    socket.send_to(HOST_ACK, peer)?;
    log::info!("Peer {} connected", peer);

    Ok(peer)
}

pub(crate) fn greet_host(
    socket: &UdpSocket,
    host: SocketAddr,
    config: &SessionConfig,
    clock: &dyn Clock,
) -> Result<SocketAddr, SessionError> {
    log::info!("Attempting to connect to {}", host);
    socket.send_to(GREETING, host)?;

    let mut buffer = vec![0u8; config.receive_buffer_size];
    let Some((_, peer)) = wait_for_datagram(
        socket,
        &mut buffer,
        config.join_timeout(),
        config.poll_interval(),
        clock,
    )?
    else {
        log::info!("Host {} did not answer within {:?}", host, config.join_timeout());
        return Err(SessionError::JoinTimeout);
    };

    socket.send_to(JOIN_ACK, peer)?;
    log::info!("Connected to {}", peer);

    Ok(peer)
}

/// Blocks in slices of `poll` until a datagram arrives or `timeout` has
/// passed on `clock`.
fn wait_for_datagram(
    socket: &UdpSocket,
    buffer: &mut [u8],
    timeout: Duration,
    poll: Duration,
    clock: &dyn Clock,
) -> io::Result<Option<(usize, SocketAddr)>> {
    socket.set_nonblocking(false)?;
    socket.set_read_timeout(Some(poll))?;

    let deadline = clock.now() + timeout;

    loop {
        match socket.recv_from(buffer) {
            Ok(received) => return Ok(Some(received)),
            Err(e) if is_transient(&e) => {}
            Err(e) => return Err(e),
        }

        if clock.now() >= deadline {
            return Ok(None);
        }
    }
}

// ICMP errors from an earlier send are reported on some platforms even on
// unconnected sockets; they do not end the wait.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::Interrupted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
    )
}
