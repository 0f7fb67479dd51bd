use std::net::SocketAddr;
use std::time::Instant;

use crate::court::Court;
use crate::event::{ConnectionStatus, EventQueue, SessionEvent};
use crate::net::{Clock, PeerRole, SendOutcome, SessionStats, TransportSession};

use super::{ReplicationEngine, SessionConfig, SessionError};

/// Everything the game loop needs for one online match: the transport, the
/// replication engine and the notifications produced along the way.
///
/// Once the peer is lost the session stays lost. Start a new one to play
/// again.
#[derive(Debug)]
pub struct OnlineSession {
    transport: TransportSession,
    engine: ReplicationEngine,
    events: EventQueue,
    status: ConnectionStatus,
}

impl OnlineSession {
    /// Runs the handshake for `role`. Blocks for at most the role's
    /// handshake timeout on `clock`. The caller should draw its
    /// connecting frame before calling this.
    pub fn begin_session(
        role: PeerRole,
        remote_address: Option<&str>,
        config: &SessionConfig,
        clock: &dyn Clock,
    ) -> Result<Self, SessionError> {
        let mut session = Self {
            transport: TransportSession::new(config.receive_buffer_size),
            engine: ReplicationEngine::new(role, config.send_interval()),
            events: EventQueue::new(),
            status: ConnectionStatus::Idle,
        };

        session.set_status(ConnectionStatus::handshake(role));

        let peer = match role {
            PeerRole::Host => session.transport.host(config, clock),
            PeerRole::Join => {
                let address = remote_address.unwrap_or_default();
                session.transport.join(address, config, clock)
            }
        }?;

        log::info!("Session confirmed as {} with {}", role.as_str(), peer);
        session.set_status(ConnectionStatus::Confirmed);

        Ok(session)
    }

    /// Ends pre-roll. Steady-state traffic may flow from the next tick on.
    pub fn begin_round(&mut self) {
        self.engine.begin_round();
    }

    pub fn on_local_paddle_move(&mut self, court: &Court) -> Option<SendOutcome> {
        if !self.transport.is_connected() {
            return None;
        }
        self.engine.on_local_paddle_move(&mut self.transport, court)
    }

    pub fn tick(&mut self, court: &mut Court, now: Instant) {
        if let Err(err) = self
            .engine
            .tick(&mut self.transport, court, now, &mut self.events)
        {
            log::warn!("{}", err);
            self.set_status(ConnectionStatus::Lost);
            self.events.push(SessionEvent::Failed(err));
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn role(&self) -> PeerRole {
        self.engine.role()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.transport.peer_addr()
    }

    pub fn stats(&self) -> &SessionStats {
        self.transport.stats()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain()
    }

    /// Tears the transport down. Safe to call more than once.
    pub fn close(&mut self) {
        self.transport.reset();
        self.set_status(ConnectionStatus::Idle);
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            self.status = status;
            self.events.push(SessionEvent::StatusChanged(status));
        }
    }
}

impl Drop for OnlineSession {
    fn drop(&mut self) {
        self.transport.reset();
    }
}
