use std::time::{Duration, Instant};

use crate::court::{Court, Side};
use crate::event::{EventQueue, SessionEvent};
use crate::net::{FieldKey, Fields, PeerRole, Received, SendOutcome, TransportSession, decode, encode};

use super::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Confirmed but the round countdown is still running. Nothing is sent.
    PreRoll,
    Live,
}

/// Decides what goes on the wire and how received fields land in the court.
///
/// The authority (host) pushes a full snapshot every `send_interval` and only
/// takes the peer's paddle from what it receives. The mirror (join) applies
/// every field it receives verbatim. Both sides push a one-field delta as soon
/// as their own paddle moves.
#[derive(Debug)]
pub struct ReplicationEngine {
    role: PeerRole,
    send_interval: Duration,
    last_broadcast: Option<Instant>,
    phase: Phase,
    pending_delta: Option<Fields>,
}

impl ReplicationEngine {
    pub fn new(role: PeerRole, send_interval: Duration) -> Self {
        Self {
            role,
            send_interval,
            last_broadcast: None,
            phase: Phase::PreRoll,
            pending_delta: None,
        }
    }

    pub fn role(&self) -> PeerRole {
        self.role
    }

    pub fn is_live(&self) -> bool {
        self.phase == Phase::Live
    }

    pub fn begin_round(&mut self) {
        if self.phase == Phase::PreRoll {
            log::debug!("Round started, replication is live");
        }
        self.phase = Phase::Live;
    }

    /// Sends our own paddle under our own key right away. During pre-roll the
    /// latest position is held back until the first live tick.
    pub fn on_local_paddle_move(
        &mut self,
        transport: &mut TransportSession,
        court: &Court,
    ) -> Option<SendOutcome> {
        let own = self.role.local_side();
        let delta = Fields::single(FieldKey::paddle(own), court.paddle_y(own));

        if self.phase == Phase::PreRoll {
            self.pending_delta = Some(delta);
            return None;
        }

        Some(transport.send(&encode(&delta)))
    }

    /// One replication step: pull the latest datagram, apply it, then push
    /// whatever is due. Never blocks.
    pub fn tick(
        &mut self,
        transport: &mut TransportSession,
        court: &mut Court,
        now: Instant,
        events: &mut EventQueue,
    ) -> Result<(), SessionError> {
        if !transport.is_connected() {
            return Ok(());
        }

        match transport.receive() {
            Received::Latest(text) => self.apply_snapshot(court, &decode(&text), events),
            Received::Empty => {}
            Received::Reset => return Err(SessionError::Disconnected),
        }

        if self.phase == Phase::PreRoll {
            return Ok(());
        }

        if let Some(delta) = self.pending_delta.take() {
            transport.send(&encode(&delta));
        }

        self.broadcast(transport, court, now);
        Ok(())
    }

    /// Sends a full snapshot unless one went out less than `send_interval`
    /// ago. Only the authority broadcasts. A failed send still starts a new
    /// interval; the next one carries fresher state anyway.
    pub fn broadcast(
        &mut self,
        transport: &mut TransportSession,
        court: &Court,
        now: Instant,
    ) -> Option<SendOutcome> {
        if !self.role.is_authority() {
            return None;
        }

        if let Some(last) = self.last_broadcast {
            if now.saturating_duration_since(last) < self.send_interval {
                return None;
            }
        }

        self.last_broadcast = Some(now);
        Some(transport.send(&encode(&court.snapshot(self.role))))
    }

    pub fn apply_snapshot(&self, court: &mut Court, fields: &Fields, events: &mut EventQueue) {
        let mut outcome_changed = false;

        for (key, value) in fields.iter() {
            if self.role.is_authority() && key != FieldKey::paddle(self.role.remote_side()) {
                log::trace!("Authority ignoring {}:{}", key, value);
                continue;
            }

            match key {
                FieldKey::BallX => court.ball_mut().position.x = value,
                FieldKey::BallY => court.ball_mut().position.y = value,
                FieldKey::BallVelocityX => court.ball_mut().velocity.x = value,
                FieldKey::BallVelocityY => court.ball_mut().velocity.y = value,
                FieldKey::Paddle1 => court.set_paddle_y(Side::Left, value),
                FieldKey::Paddle2 => court.set_paddle_y(Side::Right, value),
                FieldKey::Score1 | FieldKey::Score2 => {
                    let side = if key == FieldKey::Score1 {
                        Side::Left
                    } else {
                        Side::Right
                    };
                    if court.set_score(side, value) {
                        outcome_changed = true;
                        events.push(SessionEvent::ScoreChanged { side, score: value });
                    }
                }
                FieldKey::EndScore => {
                    if court.set_end_score(value) {
                        outcome_changed = true;
                        events.push(SessionEvent::EndScoreChanged(value));
                    }
                }
            }
        }

        if outcome_changed {
            court.check_match_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror() -> ReplicationEngine {
        ReplicationEngine::new(PeerRole::Join, Duration::from_millis(50))
    }

    fn authority() -> ReplicationEngine {
        ReplicationEngine::new(PeerRole::Host, Duration::from_millis(50))
    }

    #[test]
    fn mirror_applies_every_field() {
        let mut court = Court::default();
        let mut events = EventQueue::new();

        mirror().apply_snapshot(
            &mut court,
            &decode("bx:100 by:200 p1:300 bvx:-7 bvy:6 endsc:5"),
            &mut events,
        );

        assert_eq!(court.ball().position.x, 100);
        assert_eq!(court.ball().position.y, 200);
        assert_eq!(court.paddle_y(Side::Left), 300);
        assert_eq!(court.ball().velocity.x, -7);
        assert_eq!(court.ball().velocity.y, 6);
        assert_eq!(court.end_score(), 5);
        assert!(matches!(
            events.drain().collect::<Vec<_>>().as_slice(),
            [SessionEvent::EndScoreChanged(5)]
        ));
    }

    #[test]
    fn changed_score_notifies_once() {
        let mut court = Court::default();
        court.set_score(Side::Left, 3);
        let mut events = EventQueue::new();
        let engine = mirror();

        engine.apply_snapshot(&mut court, &decode("p1s:5"), &mut events);
        assert_eq!(court.score(Side::Left), 5);
        assert_eq!(events.len(), 1);

        events.clear();
        engine.apply_snapshot(&mut court, &decode("p1s:5"), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn unchanged_score_is_silent() {
        let mut court = Court::default();
        court.set_score(Side::Left, 3);
        let mut events = EventQueue::new();

        mirror().apply_snapshot(&mut court, &decode("p1s:3 p2s:0"), &mut events);

        assert!(events.is_empty());
    }

    #[test]
    fn mirror_learns_winner_from_scores() {
        let mut court = Court::new(3);
        let mut events = EventQueue::new();

        mirror().apply_snapshot(&mut court, &decode("p1s:1 p2s:3"), &mut events);

        assert_eq!(court.winner(), Some(Side::Right));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn lowered_end_score_decides_the_match() {
        let mut court = Court::default();
        let mut events = EventQueue::new();
        let engine = mirror();

        engine.apply_snapshot(&mut court, &decode("p1s:5"), &mut events);
        assert_eq!(court.winner(), None);

        engine.apply_snapshot(&mut court, &decode("endsc:3"), &mut events);
        assert_eq!(court.end_score(), 3);
        assert_eq!(court.winner(), Some(Side::Left));
    }

    #[test]
    fn authority_only_takes_peer_paddle() {
        let mut court = Court::default();
        let before = court.clone();
        let mut events = EventQueue::new();

        authority().apply_snapshot(
            &mut court,
            &decode("bx:1 p1:2 p2:123 p1s:9 endsc:2"),
            &mut events,
        );

        assert_eq!(court.paddle_y(Side::Right), 123);
        assert_eq!(court.paddle_y(Side::Left), before.paddle_y(Side::Left));
        assert_eq!(court.ball().position, before.ball().position);
        assert_eq!(court.score(Side::Left), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn pre_roll_holds_back_paddle_delta() {
        let mut transport = TransportSession::default();
        let court = Court::default();
        let mut engine = mirror();

        assert_eq!(engine.on_local_paddle_move(&mut transport, &court), None);
        assert!(engine.pending_delta.is_some());
        assert_eq!(transport.stats().datagrams_sent, 0);
    }

    #[test]
    fn mirror_never_broadcasts() {
        let mut transport = TransportSession::default();
        let court = Court::default();
        let mut engine = mirror();
        engine.begin_round();

        assert_eq!(engine.broadcast(&mut transport, &court, Instant::now()), None);
    }
}
