use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

/// Held-key tracking on top of terminal key events.
///
/// Terminals that report releases clear a key right away. The others only
/// send presses and auto-repeats, so a key counts as held for `hold` after
/// the last one.
#[derive(Debug)]
pub struct Input {
    last_seen: HashMap<KeyCode, Instant>,
    hold: Duration,
}

impl Input {
    pub fn new(hold: Duration) -> Self {
        Self {
            last_seen: HashMap::new(),
            hold,
        }
    }

    pub fn press(&mut self, key: KeyCode, now: Instant) {
        self.last_seen.insert(normalize(key), now);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.last_seen.remove(&normalize(key));
    }

    pub fn is_held(&self, key: KeyCode, now: Instant) -> bool {
        self.last_seen
            .get(&normalize(key))
            .is_some_and(|&seen| now.saturating_duration_since(seen) < self.hold)
    }

    pub fn any_held(&self, keys: &[KeyCode], now: Instant) -> bool {
        keys.iter().any(|&key| self.is_held(key, now))
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}

fn normalize(key: KeyCode) -> KeyCode {
    match key {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_expires_after_hold() {
        let mut input = Input::new(Duration::from_millis(100));
        let start = Instant::now();
        input.press(KeyCode::Char('w'), start);

        assert!(input.is_held(KeyCode::Char('w'), start + Duration::from_millis(50)));
        assert!(!input.is_held(KeyCode::Char('w'), start + Duration::from_millis(100)));
    }

    #[test]
    fn release_clears_immediately() {
        let mut input = Input::new(Duration::from_secs(1));
        let start = Instant::now();
        input.press(KeyCode::Up, start);
        input.release(KeyCode::Up);

        assert!(!input.is_held(KeyCode::Up, start));
    }

    #[test]
    fn letters_ignore_case() {
        let mut input = Input::new(Duration::from_secs(1));
        let start = Instant::now();
        input.press(KeyCode::Char('S'), start);

        assert!(input.any_held(&[KeyCode::Char('s'), KeyCode::Down], start));
    }
}
