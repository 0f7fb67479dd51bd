use glam::IVec2;
use rand::Rng;

use super::paddle::Paddle;

pub const BALL_SIZE: i32 = 20;
pub const BALL_START_SPEED: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ball {
    /// Top left corner.
    pub position: IVec2,
    pub velocity: IVec2,
    pub size: i32,
}

impl Ball {
    pub fn new(court: IVec2) -> Self {
        let mut ball = Self {
            position: IVec2::ZERO,
            velocity: IVec2::splat(BALL_START_SPEED),
            size: BALL_SIZE,
        };
        ball.recentre(court);
        ball
    }

    pub fn recentre(&mut self, court: IVec2) {
        self.position = court / 2 - IVec2::splat(self.size / 2);
    }

    // Positions and velocities can arrive from a peer unchecked, so all
    // arithmetic on them saturates.
    pub fn advance(&mut self) {
        self.position = self.position.saturating_add(self.velocity);
    }

    pub fn centre_y(&self) -> i32 {
        self.position.y.saturating_add(self.size / 2)
    }

    /// Bottom right corner.
    pub fn far_corner(&self) -> IVec2 {
        self.position.saturating_add(IVec2::splat(self.size))
    }

    pub fn overlaps(&self, paddle: &Paddle) -> bool {
        let far = self.far_corner();
        self.position.x < paddle.x.saturating_add(paddle.width)
            && paddle.x < far.x
            && self.position.y < paddle.bottom()
            && paddle.y < far.y
    }

    /// Both components grow by one away from zero.
    pub fn speed_up(&mut self) {
        let away = |c: i32| if c < 0 { -1 } else { 1 };
        self.velocity = self
            .velocity
            .saturating_add(IVec2::new(away(self.velocity.x), away(self.velocity.y)));
    }

    pub fn reverse_x(&mut self) {
        self.velocity.x = self.velocity.x.saturating_neg();
    }

    pub fn reverse_y(&mut self) {
        self.velocity.y = self.velocity.y.saturating_neg();
    }

    pub fn random_sign<R: Rng>(rng: &mut R) -> i32 {
        if rng.gen_bool(0.5) { 1 } else { -1 }
    }
}
