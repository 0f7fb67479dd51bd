#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub datagrams_sent: u64,
    pub datagrams_received: u64,
    /// Datagrams read while draining but superseded by a newer one.
    pub datagrams_discarded: u64,
    pub send_failures: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

impl SessionStats {
    pub fn record_sent(&mut self, bytes: usize) {
        self.datagrams_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub fn record_received(&mut self, bytes: usize) {
        self.datagrams_received += 1;
        self.bytes_received += bytes as u64;
    }
}
