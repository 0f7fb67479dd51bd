use std::fmt;

use crate::court::Side;
use crate::net::PeerRole;
use crate::session::SessionError;

/// What the collaborator shows while a session is set up or running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Idle,
    Connecting,
    Awaiting,
    Confirmed,
    Lost,
}

impl ConnectionStatus {
    /// Shown while the blocking handshake for `role` runs.
    pub fn handshake(role: PeerRole) -> Self {
        match role {
            PeerRole::Host => Self::Awaiting,
            PeerRole::Join => Self::Connecting,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Awaiting => "awaiting peer",
            Self::Confirmed => "connected",
            Self::Lost => "connection lost",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    StatusChanged(ConnectionStatus),
    /// A score field changed because of an applied snapshot.
    ScoreChanged { side: Side, score: i32 },
    EndScoreChanged(i32),
    Failed(SessionError),
}

impl SessionEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
