//! Collision response
//!
//! The single rule set for how the ball reacts to walls, the paddle and
//! bricks. Brick hits report their effects back to the caller instead of
//! touching the scoreboard directly.

use super::collision::Collision;
use super::entity::{Ball, Brick, Entity, EntityId, Paddle};

/// Which wall reflections fired this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallBounce {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Effects of one resolved brick hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickHit {
    pub id: EntityId,
    /// Points earned, awarded whether or not the brick broke
    pub score_delta: u64,
    pub hits_remaining: u8,
    pub destroyed: bool,
}

/// Outcome of resolving a classified collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    None,
    Corner,
    Paddle,
    Brick(BrickHit),
}

/// Reflect off the side walls and the ceiling.
///
/// The two checks are independent and may both fire.
pub fn bounce_off_walls(ball: &mut Ball, field_width: f32) -> WallBounce {
    let bounds = ball.bounds();
    let mut bounce = WallBounce::default();
    if bounds.min.x <= 0.0 || bounds.max.x >= field_width {
        ball.direction.x = -ball.direction.x;
        bounce.horizontal = true;
    }
    if bounds.min.y <= 0.0 {
        ball.direction.y = -ball.direction.y;
        bounce.vertical = true;
    }
    bounce
}

/// Where the ball struck the paddle: 0 at the center, ±1 at the edges.
///
/// Not clamped, so contacts past the paddle ends exceed ±1.
pub fn paddle_offset(ball: &Ball, paddle: &Paddle) -> f32 {
    let ball_x = ball.bounds().center().x;
    let paddle_x = paddle.bounds().center().x;
    (ball_x - paddle_x) / (paddle.width / 2.0)
}

/// Send the ball back up, angled by the contact offset
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle) {
    ball.direction.x = paddle_offset(ball, paddle);
    ball.direction.y = -ball.direction.y.abs();
}

/// Multi-entity contact: flip vertical direction only
pub fn bounce_off_corner(ball: &mut Ball) {
    ball.direction.y = -ball.direction.y;
}

/// Reflect off a brick and damage it
pub fn hit_brick(ball: &mut Ball, brick: &mut Brick, points: u64) -> BrickHit {
    ball.direction.y = -ball.direction.y;
    brick.damage();
    BrickHit {
        id: brick.id,
        score_delta: points,
        hits_remaining: brick.hits,
        destroyed: brick.is_destroyed(),
    }
}

/// Apply the response for a classified collision
pub fn resolve(
    collision: Collision,
    ball: &mut Ball,
    paddle: &Paddle,
    bricks: &mut [Brick],
    points: u64,
) -> Resolution {
    match collision {
        Collision::None => Resolution::None,
        Collision::Corner { .. } => {
            bounce_off_corner(ball);
            Resolution::Corner
        }
        Collision::Paddle(_) => {
            bounce_off_paddle(ball, paddle);
            Resolution::Paddle
        }
        Collision::Brick(id) => match bricks.iter_mut().find(|b| b.id == id) {
            Some(brick) => Resolution::Brick(hit_brick(ball, brick, points)),
            None => Resolution::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use glam::Vec2;

    fn ball_at(x: f32, y: f32) -> Ball {
        let mut ball = Ball::new(EntityId(1), Vec2::new(x, y), 5.0);
        ball.launch();
        ball
    }

    #[test]
    fn test_paddle_offset_scenario() {
        let paddle = Paddle::new(EntityId(2), Vec2::new(305.0, PADDLE_Y));
        let mut ball = ball_at(325.0, 311.0);
        ball.direction = Vec2::new(1.0, -1.0);

        assert_eq!(paddle_offset(&ball, &paddle), 0.5);
        bounce_off_paddle(&mut ball, &paddle);
        assert_eq!(ball.direction, Vec2::new(0.5, -1.0));
        assert_eq!(ball.speed, 5.0);
    }

    #[test]
    fn test_paddle_bounce_always_upward() {
        let paddle = Paddle::new(EntityId(2), Vec2::new(305.0, PADDLE_Y));
        let mut ball = ball_at(285.0, 311.0);
        ball.direction = Vec2::new(0.3, 1.0);
        bounce_off_paddle(&mut ball, &paddle);
        assert_eq!(ball.direction, Vec2::new(-0.5, -1.0));
    }

    #[test]
    fn test_paddle_offset_is_unclamped() {
        let paddle = Paddle::new(EntityId(2), Vec2::new(305.0, PADDLE_Y));
        // Ball center 8px beyond the right end of the paddle
        let ball = ball_at(353.0, 311.0);
        assert!((paddle_offset(&ball, &paddle) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_walls_flip_sign_only() {
        let mut ball = ball_at(5.0, 5.0);
        ball.direction = Vec2::new(-0.7, -1.0);
        let bounce = bounce_off_walls(&mut ball, FIELD_WIDTH);
        assert_eq!(
            bounce,
            WallBounce {
                horizontal: true,
                vertical: true
            }
        );
        assert_eq!(ball.direction, Vec2::new(0.7, 1.0));
        assert_eq!(ball.speed, 5.0);

        let mut ball = ball_at(300.0, 200.0);
        assert_eq!(bounce_off_walls(&mut ball, FIELD_WIDTH), WallBounce::default());
        assert_eq!(ball.direction, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_brick_hit_scores_even_without_destroying() {
        let mut ball = ball_at(100.0, 70.0);
        let mut brick = Brick::new(EntityId(3), Vec2::new(100.0, 50.0), 2).unwrap();

        let hit = hit_brick(&mut ball, &mut brick, 20);
        assert_eq!(hit.score_delta, 20);
        assert!(!hit.destroyed);
        assert_eq!(hit.hits_remaining, 1);
        assert_eq!(ball.direction, Vec2::new(1.0, 1.0));

        let hit = hit_brick(&mut ball, &mut brick, 20);
        assert_eq!(hit.score_delta, 20);
        assert!(hit.destroyed);
        assert_eq!(ball.direction, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_resolve_corner_flips_vertical_only() {
        let paddle = Paddle::new(EntityId(2), Vec2::new(305.0, PADDLE_Y));
        let mut bricks = vec![Brick::new(EntityId(3), Vec2::new(100.0, 50.0), 1).unwrap()];
        let mut ball = ball_at(100.0, 70.0);
        ball.direction = Vec2::new(0.4, -1.0);

        let res = resolve(
            Collision::Corner { count: 2 },
            &mut ball,
            &paddle,
            &mut bricks,
            20,
        );
        assert_eq!(res, Resolution::Corner);
        assert_eq!(ball.direction, Vec2::new(0.4, 1.0));
        // No brick side effects on corner hits
        assert_eq!(bricks[0].hits, 1);
    }
}
