use std::collections::VecDeque;

use super::types::SessionEvent;

/// FIFO of notifications drained once per frame by the collaborator.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<SessionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SessionEvent) {
        log::debug!("Session event: {:?}", event);
        self.pending.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
