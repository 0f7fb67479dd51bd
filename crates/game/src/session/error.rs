use std::io;

use thiserror::Error;

/// Outcomes surfaced to the menu layer. Malformed fields never show up here,
/// the codec drops them.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No one connected to the server before timeout.")]
    HostTimeout,
    #[error("Could not connect to the server.")]
    JoinTimeout,
    #[error("Could not resolve address {address:?}.")]
    InvalidAddress { address: String },
    #[error("Network error: {0}")]
    Transport(#[from] io::Error),
    #[error("Lost connection to the other player.")]
    Disconnected,
}

impl SessionError {
    /// Raw OS error code of a transport failure.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Transport(err) => err.raw_os_error(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::HostTimeout | Self::JoinTimeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_keeps_os_code() {
        let err = SessionError::from(io::Error::from_raw_os_error(98));
        assert_eq!(err.code(), Some(98));
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeouts_have_no_code() {
        assert_eq!(SessionError::HostTimeout.code(), None);
        assert!(SessionError::JoinTimeout.is_timeout());
    }
}
