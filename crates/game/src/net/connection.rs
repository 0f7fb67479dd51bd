use serde::{Deserialize, Serialize};

use crate::court::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unbound,
    AwaitingPeer,
    Confirmed,
    Lost,
}

impl ConnectionState {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Fixed for the lifetime of a session. The host is the authority for ball
/// motion and scoring and broadcasts periodic snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeerRole {
    Host,
    Join,
}

impl PeerRole {
    pub fn is_authority(&self) -> bool {
        matches!(self, Self::Host)
    }

    /// The paddle this peer controls.
    pub fn local_side(&self) -> Side {
        match self {
            Self::Host => Side::Left,
            Self::Join => Side::Right,
        }
    }

    pub fn remote_side(&self) -> Side {
        self.local_side().opposite()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Join => "join",
        }
    }
}
