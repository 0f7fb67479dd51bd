mod input;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use dingdong::{
    ConnectionStatus, Court, CourtEvent, Direction, GameMode, OnlineSession, SessionEvent, Side,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub use input::Input;

use crate::events::{AppEvent, MatchSetup};

const LEFT_UP: &[KeyCode] = &[KeyCode::Char('w')];
const LEFT_DOWN: &[KeyCode] = &[KeyCode::Char('s')];
const RIGHT_UP: &[KeyCode] = &[KeyCode::Up];
const RIGHT_DOWN: &[KeyCode] = &[KeyCode::Down];
const ANY_UP: &[KeyCode] = &[KeyCode::Char('w'), KeyCode::Up];
const ANY_DOWN: &[KeyCode] = &[KeyCode::Char('s'), KeyCode::Down];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// One match from countdown to game over, in any mode.
pub struct Match {
    mode: GameMode,
    court: Court,
    session: Option<OnlineSession>,
    rng: StdRng,
    pub input: Input,
    started_at: Instant,
    countdown: Duration,
    round_started: bool,
    /// The local paddle follows the ball on its own.
    autopilot: bool,
}

impl Match {
    pub fn new(
        setup: &MatchSetup,
        session: Option<OnlineSession>,
        input: Input,
        countdown: Duration,
        now: Instant,
    ) -> Self {
        let mut rng = StdRng::from_entropy();
        let mut court = Court::new(setup.end_score);
        court.start_match(&mut rng);

        log::info!(
            "Starting {} to {} points",
            setup.mode.label(),
            court.end_score()
        );

        Self {
            mode: setup.mode,
            court,
            session,
            rng,
            input,
            started_at: now,
            countdown,
            round_started: false,
            autopilot: false,
        }
    }

    pub fn with_autopilot(mut self) -> Self {
        self.autopilot = true;
        self
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn court(&self) -> &Court {
        &self.court
    }

    pub fn session(&self) -> Option<&OnlineSession> {
        self.session.as_ref()
    }

    /// Time left before the ball starts moving.
    pub fn countdown_remaining(&self, now: Instant) -> Option<Duration> {
        (self.started_at + self.countdown)
            .checked_duration_since(now)
            .filter(|left| !left.is_zero())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        let winner = self.court.winner()?;
        Some(if winner == self.mode.local_side() {
            Outcome::Won
        } else {
            Outcome::Lost
        })
    }

    pub fn is_over(&self) -> bool {
        self.court.is_over()
    }

    /// Advances one frame. Returns an app event when the match has to end
    /// early.
    pub fn update(&mut self, now: Instant) -> Option<AppEvent> {
        let counting_down = self.countdown_remaining(now).is_some();

        if !counting_down && !self.round_started {
            self.round_started = true;
            if let Some(session) = &mut self.session {
                session.begin_round();
            }
        }

        if !counting_down && !self.court.is_over() {
            let moved = self.apply_input(now);
            if moved {
                if let Some(session) = &mut self.session {
                    session.on_local_paddle_move(&self.court);
                }
            }

            for event in self.court.step(self.mode, &mut self.rng) {
                match event {
                    CourtEvent::PointScored(side) => log::info!(
                        "Point for {} ({} - {})",
                        side,
                        self.court.score(Side::Left),
                        self.court.score(Side::Right)
                    ),
                    CourtEvent::MatchWon(side) => log::info!("{} won the match", side),
                    CourtEvent::WallBounce | CourtEvent::PaddleHit(_) => {}
                }
            }
        }

        // Keeps running after game over so the peer gets the final score.
        let session = self.session.as_mut()?;
        session.tick(&mut self.court, now);

        for event in session.drain_events() {
            match event {
                SessionEvent::Failed(err) if self.court.is_over() => {
                    log::info!("Peer left after the match: {}", err);
                }
                SessionEvent::Failed(err) => return Some(AppEvent::MenuError(err.to_string())),
                SessionEvent::ScoreChanged { side, score } => {
                    log::info!("Score update: {} has {}", side, score);
                }
                SessionEvent::EndScoreChanged(end_score) => {
                    log::info!("Playing to {} points", end_score);
                }
                SessionEvent::StatusChanged(ConnectionStatus::Lost) => {
                    log::warn!("Connection lost");
                }
                SessionEvent::StatusChanged(_) => {}
            }
        }

        None
    }

    /// Returns whether the local online paddle moved.
    fn apply_input(&mut self, now: Instant) -> bool {
        if self.autopilot {
            return self.court.follow_ball(self.mode.local_side());
        }

        match self.mode {
            GameMode::LocalMultiplayer => {
                self.drive(Side::Left, LEFT_UP, LEFT_DOWN, now);
                self.drive(Side::Right, RIGHT_UP, RIGHT_DOWN, now);
                false
            }
            GameMode::SinglePlayer | GameMode::Practice => {
                self.drive(Side::Left, ANY_UP, ANY_DOWN, now);
                false
            }
            GameMode::Online(role) => self.drive(role.local_side(), ANY_UP, ANY_DOWN, now),
        }
    }

    fn drive(&mut self, side: Side, up: &[KeyCode], down: &[KeyCode], now: Instant) -> bool {
        let mut moved = false;
        if self.input.any_held(up, now) {
            moved |= self.court.move_paddle(side, Direction::Up);
        }
        if self.input.any_held(down, now) {
            moved |= self.court.move_paddle(side, Direction::Down);
        }
        moved
    }

    pub fn close(&mut self) {
        if let Some(session) = &mut self.session {
            session.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(mode: GameMode) -> MatchSetup {
        MatchSetup {
            mode,
            end_score: 3,
            address: None,
        }
    }

    fn local_match(mode: GameMode, now: Instant) -> Match {
        Match::new(
            &setup(mode),
            None,
            Input::new(Duration::from_millis(100)),
            Duration::from_millis(500),
            now,
        )
    }

    #[test]
    fn paddles_stay_put_during_countdown() {
        let start = Instant::now();
        let mut game = local_match(GameMode::LocalMultiplayer, start);
        let ball = game.court().ball().position;

        game.input.press(KeyCode::Char('w'), start);
        assert!(game.update(start + Duration::from_millis(10)).is_none());

        assert_eq!(game.court().paddle_y(Side::Left), 350);
        assert_eq!(game.court().ball().position, ball);
        assert!(game.countdown_remaining(start).is_some());
    }

    #[test]
    fn local_multiplayer_splits_keys() {
        let start = Instant::now();
        let mut game = local_match(GameMode::LocalMultiplayer, start);
        let now = start + Duration::from_millis(600);

        game.input.press(KeyCode::Char('w'), now);
        game.input.press(KeyCode::Down, now);
        game.update(now);

        assert_eq!(game.court().paddle_y(Side::Left), 345);
        assert_eq!(game.court().paddle_y(Side::Right), 355);
    }

    #[test]
    fn autopilot_tracks_ball() {
        let start = Instant::now();
        let mut game = local_match(GameMode::Practice, start).with_autopilot();
        let now = start + Duration::from_millis(600);

        game.court.ball_mut().position.y = 100;
        game.update(now);

        assert!(game.court().paddle_y(Side::Left) < 350);
    }

    #[test]
    fn outcome_is_from_local_side() {
        let start = Instant::now();
        let mut game = local_match(GameMode::SinglePlayer, start);
        game.court.set_score(Side::Right, 3);
        game.court.check_match_end();

        assert_eq!(game.outcome(), Some(Outcome::Lost));
    }
}
