use dingdong::{Court, Side};
use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::text::Line as TextLine;
use ratatui::widgets::Block;
use ratatui::widgets::canvas::{Canvas, Context, Line, Rectangle};

/// Draws a court onto a ratatui canvas. Owned by the `Tui` and lent to the
/// screens for each frame.
#[derive(Debug, Clone)]
pub struct CourtPainter {
    pub marker: Marker,
    pub left_color: Color,
    pub right_color: Color,
    pub ball_color: Color,
    pub line_color: Color,
}

impl Default for CourtPainter {
    fn default() -> Self {
        Self {
            marker: Marker::HalfBlock,
            left_color: Color::Cyan,
            right_color: Color::Magenta,
            ball_color: Color::White,
            line_color: Color::DarkGray,
        }
    }
}

impl CourtPainter {
    pub fn canvas<'a>(
        &'a self,
        court: &'a Court,
        block: Block<'a>,
    ) -> Canvas<'a, impl Fn(&mut Context) + 'a> {
        let size = court.size();
        Canvas::default()
            .block(block)
            .marker(self.marker)
            .x_bounds([0.0, size.x as f64])
            .y_bounds([0.0, size.y as f64])
            .paint(move |ctx| self.paint(ctx, court))
    }

    fn paint(&self, ctx: &mut Context, court: &Court) {
        let size = court.size();
        let (width, height) = (size.x as f64, size.y as f64);
        // Court coordinates grow downward, canvas coordinates upward.
        let flip = |y: i32, h: i32| height - (y as f64 + h as f64);

        ctx.draw(&Line {
            x1: width / 2.0,
            y1: 0.0,
            x2: width / 2.0,
            y2: height,
            color: self.line_color,
        });

        for (side, color) in [(Side::Left, self.left_color), (Side::Right, self.right_color)] {
            let paddle = court.paddle(side);
            ctx.draw(&Rectangle {
                x: paddle.x as f64,
                y: flip(paddle.y, paddle.height),
                width: paddle.width as f64,
                height: paddle.height as f64,
                color,
            });
        }

        ctx.layer();

        let ball = court.ball();
        ctx.draw(&Rectangle {
            x: ball.position.x as f64,
            y: flip(ball.position.y, ball.size),
            width: ball.size as f64,
            height: ball.size as f64,
            color: self.ball_color,
        });

        ctx.print(
            width / 4.0,
            height * 0.75,
            TextLine::from(court.score(Side::Left).to_string()),
        );
        ctx.print(
            width * 0.75,
            height * 0.75,
            TextLine::from(court.score(Side::Right).to_string()),
        );
    }
}
