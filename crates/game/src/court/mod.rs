//! Integer court simulation shared by every game mode. Online peers run it
//! independently and the replication engine overwrites fields from the wire.

mod ball;
mod paddle;

use std::fmt;

use glam::IVec2;
use rand::Rng;

use crate::net::{FieldKey, Fields, PeerRole};

pub use ball::{BALL_SIZE, BALL_START_SPEED, Ball};
pub use paddle::{PADDLE_HEIGHT, PADDLE_MARGIN, PADDLE_SPEED, PADDLE_WIDTH, Paddle};

pub const COURT_WIDTH: i32 = 1000;
pub const COURT_HEIGHT: i32 = 800;
pub const DEFAULT_END_SCORE: i32 = 10;
/// Every n-th paddle hit speeds the ball up.
pub const HITS_PER_SPEED_UP: u32 = 3;

/// Left is player 1, right is player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn player_number(&self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.player_number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    SinglePlayer,
    Practice,
    LocalMultiplayer,
    Online(PeerRole),
}

impl GameMode {
    pub fn role(&self) -> Option<PeerRole> {
        match self {
            Self::Online(role) => Some(*role),
            _ => None,
        }
    }

    /// The side whose result is "ours" on the game over screen.
    pub fn local_side(&self) -> Side {
        match self {
            Self::Online(role) => role.local_side(),
            _ => Side::Left,
        }
    }

    /// Mirrors never score; the authority's score fields decide.
    pub fn awards_points(&self) -> bool {
        !matches!(self, Self::Online(PeerRole::Join))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SinglePlayer => "Single Player",
            Self::Practice => "Practice",
            Self::LocalMultiplayer => "Local Multiplayer",
            Self::Online(PeerRole::Host) => "Online (host)",
            Self::Online(PeerRole::Join) => "Online (join)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourtEvent {
    WallBounce,
    PaddleHit(Side),
    PointScored(Side),
    MatchWon(Side),
}

#[derive(Debug, Clone)]
pub struct Court {
    size: IVec2,
    left: Paddle,
    right: Paddle,
    ball: Ball,
    left_score: i32,
    right_score: i32,
    end_score: i32,
    hit_count: u32,
    winner: Option<Side>,
}

impl Default for Court {
    fn default() -> Self {
        Self::new(DEFAULT_END_SCORE)
    }
}

impl Court {
    pub fn new(end_score: i32) -> Self {
        Self::with_size(IVec2::new(COURT_WIDTH, COURT_HEIGHT), end_score)
    }

    pub fn with_size(size: IVec2, end_score: i32) -> Self {
        Self {
            size,
            left: Paddle::new(PADDLE_MARGIN, size.y),
            right: Paddle::new(size.x - PADDLE_WIDTH - PADDLE_MARGIN, size.y),
            ball: Ball::new(size),
            left_score: 0,
            right_score: 0,
            end_score: end_score.max(1),
            hit_count: 0,
            winner: None,
        }
    }

    /// Resets scores and positions and serves in a random diagonal.
    pub fn start_match<R: Rng>(&mut self, rng: &mut R) {
        self.left_score = 0;
        self.right_score = 0;
        self.winner = None;
        self.hit_count = 0;
        self.recentre();
        self.ball.velocity = IVec2::new(
            BALL_START_SPEED * Ball::random_sign(rng),
            BALL_START_SPEED * Ball::random_sign(rng),
        );
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn paddle_y(&self, side: Side) -> i32 {
        self.paddle(side).y
    }

    pub fn set_paddle_y(&mut self, side: Side, y: i32) {
        self.paddle_mut(side).y = y;
    }

    /// Returns whether the paddle actually moved.
    pub fn move_paddle(&mut self, side: Side, direction: Direction) -> bool {
        let height = self.size.y;
        self.paddle_mut(side).move_toward(direction, height)
    }

    pub fn score(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    /// Returns whether the held value changed.
    pub fn set_score(&mut self, side: Side, score: i32) -> bool {
        let slot = match side {
            Side::Left => &mut self.left_score,
            Side::Right => &mut self.right_score,
        };
        if *slot == score {
            return false;
        }
        *slot = score;
        true
    }

    pub fn end_score(&self) -> i32 {
        self.end_score
    }

    pub fn set_end_score(&mut self, end_score: i32) -> bool {
        if self.end_score == end_score || end_score < 1 {
            return false;
        }
        self.end_score = end_score;
        true
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    /// Declares a winner once a score reaches the end score.
    pub fn check_match_end(&mut self) -> Option<Side> {
        if self.winner.is_none() {
            if self.left_score >= self.end_score {
                self.winner = Some(Side::Left);
            } else if self.right_score >= self.end_score {
                self.winner = Some(Side::Right);
            }
        }
        self.winner
    }

    /// One simulation tick. Does nothing once the match is over.
    pub fn step<R: Rng>(&mut self, mode: GameMode, rng: &mut R) -> Vec<CourtEvent> {
        let mut events = Vec::new();
        if self.is_over() {
            return events;
        }

        self.ball.advance();

        match mode {
            GameMode::SinglePlayer => {
                self.follow_ball(Side::Right);
            }
            GameMode::Practice => self.right.y = self.ball.position.y,
            _ => {}
        }

        if self.ball.position.y <= 0 || self.ball.far_corner().y >= self.size.y {
            self.ball.reverse_y();
            events.push(CourtEvent::WallBounce);
        }

        for side in [Side::Left, Side::Right] {
            if self.ball.overlaps(self.paddle(side)) {
                self.bounce();
                events.push(CourtEvent::PaddleHit(side));
            }
        }

        if !mode.awards_points() {
            return events;
        }

        if self.ball.far_corner().x >= self.size.x {
            self.award_point(Side::Left, rng, &mut events);
        } else if self.ball.position.x <= 0 {
            self.award_point(Side::Right, rng, &mut events);
        }

        events
    }

    fn bounce(&mut self) {
        self.ball.reverse_x();
        self.hit_count = self.hit_count.wrapping_add(1);
        if self.hit_count % HITS_PER_SPEED_UP == 0 {
            self.ball.speed_up();
        }
    }

    /// Moves `side` one step toward the ball's height.
    pub fn follow_ball(&mut self, side: Side) -> bool {
        let target = self.ball.centre_y();
        let height = self.size.y;
        let paddle = self.paddle_mut(side);
        if target > paddle.centre() {
            paddle.move_toward(Direction::Down, height)
        } else if target < paddle.centre() {
            paddle.move_toward(Direction::Up, height)
        } else {
            false
        }
    }

    fn award_point<R: Rng>(&mut self, scorer: Side, rng: &mut R, events: &mut Vec<CourtEvent>) {
        let score = self.score(scorer).saturating_add(1);
        self.set_score(scorer, score);
        events.push(CourtEvent::PointScored(scorer));
        log::debug!("Point for {} ({} - {})", scorer, self.left_score, self.right_score);

        if let Some(winner) = self.check_match_end() {
            events.push(CourtEvent::MatchWon(winner));
            return;
        }

        self.start_round(scorer, rng);
    }

    /// Serves toward the player who just scored.
    fn start_round<R: Rng>(&mut self, scorer: Side, rng: &mut R) {
        let vx = match scorer {
            Side::Left => -BALL_START_SPEED,
            Side::Right => BALL_START_SPEED,
        };
        self.ball.velocity = IVec2::new(vx, BALL_START_SPEED * Ball::random_sign(rng));
        self.hit_count = 0;
        self.recentre();
    }

    fn recentre(&mut self) {
        self.left.recentre(self.size.y);
        self.right.recentre(self.size.y);
        self.ball.recentre(self.size);
    }

    /// Full state as broadcast by the authority. Carries only the sender's
    /// own paddle.
    pub fn snapshot(&self, role: PeerRole) -> Fields {
        let own = role.local_side();
        [
            (FieldKey::BallX, self.ball.position.x),
            (FieldKey::BallY, self.ball.position.y),
            (FieldKey::paddle(own), self.paddle_y(own)),
            (FieldKey::Score1, self.left_score),
            (FieldKey::Score2, self.right_score),
            (FieldKey::BallVelocityX, self.ball.velocity.x),
            (FieldKey::BallVelocityY, self.ball.velocity.y),
            (FieldKey::EndScore, self.end_score),
        ]
        .into_iter()
        .collect()
    }
}
