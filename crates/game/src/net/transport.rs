use std::io;
use std::net::{SocketAddr, UdpSocket};

use super::clock::Clock;
use super::connection::ConnectionState;
use super::handshake;
use super::stats::SessionStats;
use crate::session::{SessionConfig, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Failed,
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// Payload of the most recent pending datagram.
    Latest(String),
    Empty,
    /// The platform reported the peer forcibly closed the connection.
    Reset,
}

/// A single datagram socket bound to exactly one confirmed peer.
#[derive(Debug)]
pub struct TransportSession {
    socket: Option<UdpSocket>,
    peer_addr: Option<SocketAddr>,
    state: ConnectionState,
    recv_buffer: Vec<u8>,
    stats: SessionStats,
}

impl Default for TransportSession {
    fn default() -> Self {
        Self::new(SessionConfig::default().receive_buffer_size)
    }
}

impl TransportSession {
    pub fn new(receive_buffer_size: usize) -> Self {
        Self {
            socket: None,
            peer_addr: None,
            state: ConnectionState::Unbound,
            recv_buffer: vec![0u8; receive_buffer_size.max(1)],
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_confirmed()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Blocks until a peer greets us on the well-known port or the host
    /// timeout passes. On failure the session is back to `Unbound`.
    pub fn host(
        &mut self,
        config: &SessionConfig,
        clock: &dyn Clock,
    ) -> Result<SocketAddr, SessionError> {
        self.ensure_unbound()?;

        let result = handshake::bind_host(config.port).and_then(|socket| {
            self.state = ConnectionState::AwaitingPeer;
            let peer = handshake::await_peer(&socket, config, clock)?;
            self.confirm(socket, peer)?;
            Ok(peer)
        });

        if result.is_err() {
            self.reset();
        }
        result
    }

    /// Greets the host at `address` and blocks until it answers or the join
    /// timeout passes. On failure the session is back to `Unbound`.
    pub fn join(
        &mut self,
        address: &str,
        config: &SessionConfig,
        clock: &dyn Clock,
    ) -> Result<SocketAddr, SessionError> {
        self.ensure_unbound()?;

        let result = handshake::resolve(address, config.port).and_then(|host| {
            let socket = handshake::bind_join()?;
            self.state = ConnectionState::AwaitingPeer;
            let peer = handshake::greet_host(&socket, host, config, clock)?;
            self.confirm(socket, peer)?;
            Ok(peer)
        });

        if result.is_err() {
            self.reset();
        }
        result
    }

    fn ensure_unbound(&self) -> Result<(), SessionError> {
        if self.state == ConnectionState::Unbound {
            return Ok(());
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("transport session is {:?}, expected Unbound", self.state),
        )
        .into())
    }

    // Connecting filters out datagrams from anyone but the bound peer and
    // lets the platform report a closed peer port on receive.
    fn confirm(&mut self, socket: UdpSocket, peer: SocketAddr) -> Result<(), SessionError> {
        socket.connect(peer)?;
        socket.set_read_timeout(None)?;
        socket.set_nonblocking(true)?;

        self.socket = Some(socket);
        self.peer_addr = Some(peer);
        self.state = ConnectionState::Confirmed;

        Ok(())
    }

    /// One non-blocking send to the peer. Failures are reported, never retried.
    pub fn send(&mut self, message: &str) -> SendOutcome {
        let Some(socket) = self.socket.as_ref().filter(|_| self.state.is_confirmed()) else {
            log::debug!("Dropping send while {:?}", self.state);
            self.stats.send_failures += 1;
            return SendOutcome::Failed;
        };

        match socket.send(message.as_bytes()) {
            Ok(bytes) => {
                self.stats.record_sent(bytes);
                SendOutcome::Sent
            }
            Err(e) => {
                log::warn!("Error while sending data: {}", e);
                self.stats.send_failures += 1;
                SendOutcome::Failed
            }
        }
    }

    /// Drains every pending datagram and returns only the newest one.
    pub fn receive(&mut self) -> Received {
        let Some(socket) = self.socket.as_ref().filter(|_| self.state.is_confirmed()) else {
            return Received::Empty;
        };

        let mut latest: Option<String> = None;

        loop {
            match socket.recv(&mut self.recv_buffer) {
                Ok(size) => {
                    self.stats.record_received(size);
                    if latest.is_some() {
                        self.stats.datagrams_discarded += 1;
                    }
                    latest = Some(String::from_utf8_lossy(&self.recv_buffer[..size]).into_owned());
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(ref e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionRefused
                    ) =>
                {
                    log::warn!("Lost connection to {:?}: {}", self.peer_addr, e);
                    self.state = ConnectionState::Lost;
                    return Received::Reset;
                }
                Err(e) => {
                    log::warn!("Unhandled error while receiving data: {}", e);
                    break;
                }
            }
        }

        match latest {
            Some(payload) => Received::Latest(payload),
            None => Received::Empty,
        }
    }

    /// Closes the socket and forgets the peer. Safe to call at any time.
    pub fn reset(&mut self) {
        if self.socket.is_some() {
            log::debug!("Transport session reset");
        }
        self.socket = None;
        self.peer_addr = None;
        self.state = ConnectionState::Unbound;
        self.recv_buffer.fill(0);
        self.stats = SessionStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_unbound() {
        let session = TransportSession::default();
        assert_eq!(session.state(), ConnectionState::Unbound);
        assert!(session.peer_addr().is_none());
        assert!(!session.is_connected());
    }

    #[test]
    fn send_before_confirmation_fails() {
        let mut session = TransportSession::default();
        assert_eq!(session.send("p1:10"), SendOutcome::Failed);
        assert_eq!(session.stats().send_failures, 1);
    }

    #[test]
    fn receive_before_confirmation_is_empty() {
        let mut session = TransportSession::default();
        assert_eq!(session.receive(), Received::Empty);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut session = TransportSession::default();
        session.reset();
        session.reset();
        assert_eq!(session.state(), ConnectionState::Unbound);
    }

    #[test]
    fn join_with_bad_address_stays_unbound() {
        let mut session = TransportSession::default();
        let result = session.join("", &SessionConfig::default(), &super::super::SystemClock);

        assert!(matches!(result, Err(SessionError::InvalidAddress { .. })));
        assert_eq!(session.state(), ConnectionState::Unbound);
    }
}
