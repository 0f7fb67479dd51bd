use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 27015;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub port: u16,
    pub host_timeout_secs: u64,
    pub join_timeout_secs: u64,
    /// Upper bound on a single blocking read while a handshake waits.
    pub poll_interval_ms: u64,
    pub send_interval_ms: u64,
    pub countdown_ms: u64,
    pub receive_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host_timeout_secs: 60,
            join_timeout_secs: 10,
            poll_interval_ms: 10,
            send_interval_ms: 50,
            countdown_ms: 1714,
            receive_buffer_size: 64,
        }
    }
}

impl SessionConfig {
    pub fn host_timeout(&self) -> Duration {
        Duration::from_secs(self.host_timeout_secs)
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_secs(self.join_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }

    pub fn countdown(&self) -> Duration {
        Duration::from_millis(self.countdown_ms)
    }
}
