use super::Direction;

pub const PADDLE_WIDTH: i32 = 20;
pub const PADDLE_HEIGHT: i32 = 100;
pub const PADDLE_SPEED: i32 = 5;
/// Gap between a paddle and its side wall.
pub const PADDLE_MARGIN: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paddle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Paddle {
    pub fn new(x: i32, court_height: i32) -> Self {
        Self {
            x,
            y: Self::centre_y(court_height),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }

    fn centre_y(court_height: i32) -> i32 {
        court_height / 2 - PADDLE_HEIGHT / 2
    }

    pub fn recentre(&mut self, court_height: i32) {
        self.y = Self::centre_y(court_height);
    }

    pub fn centre(&self) -> i32 {
        self.y.saturating_add(self.height / 2)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Moves by `PADDLE_SPEED` unless already touching the edge it moves
    /// toward. Can overshoot the edge by less than one step.
    pub fn move_toward(&mut self, direction: Direction, court_height: i32) -> bool {
        match direction {
            Direction::Up if self.y > 0 => self.y -= PADDLE_SPEED,
            Direction::Down if self.bottom() < court_height => self.y += PADDLE_SPEED,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_top_edge() {
        let mut paddle = Paddle::new(5, 800);
        paddle.y = 0;

        assert!(!paddle.move_toward(Direction::Up, 800));
        assert_eq!(paddle.y, 0);
        assert!(paddle.move_toward(Direction::Down, 800));
        assert_eq!(paddle.y, PADDLE_SPEED);
    }

    #[test]
    fn stops_at_bottom_edge() {
        let mut paddle = Paddle::new(5, 800);
        paddle.y = 800 - PADDLE_HEIGHT;

        assert!(!paddle.move_toward(Direction::Down, 800));
        assert_eq!(paddle.y, 700);
    }

    #[test]
    fn starts_centred() {
        let paddle = Paddle::new(5, 800);
        assert_eq!(paddle.centre(), 400);
    }
}
