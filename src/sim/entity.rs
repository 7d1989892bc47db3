//! Game entities and their mutation primitives
//!
//! Entities know their geometry and how to move. Collision response lives in
//! `bounce`, never on the entities themselves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Stable identifier owned by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Closed set of entity kinds the collision detector dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Paddle,
    Brick,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Inclusive overlap test: boxes sharing an edge overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Capabilities shared by every game object
pub trait Entity {
    fn id(&self) -> EntityId;
    fn kind(&self) -> EntityKind;
    /// Current bounding box
    fn bounds(&self) -> Aabb;
    /// Apply a relative offset
    fn translate(&mut self, delta: Vec2);
}

/// Ball motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Riding the paddle, waiting for the start signal
    Carried,
    /// Moving under its own velocity
    Free,
    /// Lost past the bottom edge; no longer moves
    Inert,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: EntityId,
    /// Center position
    pub pos: Vec2,
    pub radius: f32,
    /// Direction components, scaled by `speed` each tick. Not normalized.
    pub direction: Vec2,
    /// Always positive; an inert ball keeps its last speed but does not move
    pub speed: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(id: EntityId, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            radius: BALL_RADIUS,
            direction: Vec2::new(1.0, -1.0),
            speed,
            state: BallState::Carried,
        }
    }

    /// Per-tick displacement
    pub fn velocity(&self) -> Vec2 {
        match self.state {
            BallState::Inert => Vec2::ZERO,
            BallState::Carried | BallState::Free => self.direction * self.speed,
        }
    }

    /// Release from the paddle
    pub fn launch(&mut self) {
        if self.state == BallState::Carried {
            self.state = BallState::Free;
        }
    }

    /// Move one tick along the current velocity (free balls only)
    pub fn advance(&mut self) {
        if self.state == BallState::Free {
            let delta = self.velocity();
            self.translate(delta);
        }
    }

    pub fn make_inert(&mut self) {
        self.state = BallState::Inert;
    }

    pub fn is_inert(&self) -> bool {
        self.state == BallState::Inert
    }
}

impl Entity for Ball {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Ball
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.radius * 2.0))
    }

    fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub id: EntityId,
    /// Center position
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Ball carried along with paddle motion (before launch only)
    pub carrying: Option<EntityId>,
}

impl Paddle {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            carrying: None,
        }
    }

    /// Clamp a horizontal offset so the paddle stays within `[0, field_width]`
    pub fn clamp_offset(&self, dx: f32, field_width: f32) -> f32 {
        let bounds = self.bounds();
        dx.max(-bounds.min.x).min(field_width - bounds.max.x)
    }
}

impl Entity for Paddle {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Paddle
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(self.width, self.height))
    }

    fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

/// How a brick moves on its own
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BrickMotion {
    Static,
    /// Slides horizontally, reflecting off the field edges
    Moving { direction: f32, speed: f32 },
}

/// A destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: EntityId,
    /// Center position
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Hits left before removal; doubles as the color tier
    pub hits: u8,
    pub motion: BrickMotion,
}

impl Brick {
    pub fn new(id: EntityId, pos: Vec2, hits: u8) -> Result<Self, SimError> {
        if !(MIN_BRICK_HITS..=MAX_BRICK_HITS).contains(&hits) {
            return Err(SimError::InvalidConfig { hits });
        }
        Ok(Self {
            id,
            pos,
            width: BRICK_WIDTH,
            height: BRICK_HEIGHT,
            hits,
            motion: BrickMotion::Static,
        })
    }

    /// A brick that slides sideways at `MOVING_BRICK_SPEED`
    pub fn moving(id: EntityId, pos: Vec2, hits: u8, direction: f32) -> Result<Self, SimError> {
        let mut brick = Self::new(id, pos, hits)?;
        brick.motion = BrickMotion::Moving {
            direction: direction.signum(),
            speed: MOVING_BRICK_SPEED,
        };
        Ok(brick)
    }

    /// Color tier (equal to the hits remaining)
    pub fn tier(&self) -> u8 {
        self.hits
    }

    pub fn is_destroyed(&self) -> bool {
        self.hits == 0
    }

    /// Remove one hit, never going below zero
    pub fn damage(&mut self) {
        self.hits = self.hits.saturating_sub(1);
    }

    /// Advance a moving brick one tick. Returns true if it moved.
    pub fn advance(&mut self, field_width: f32) -> bool {
        let BrickMotion::Moving { direction, speed } = self.motion else {
            return false;
        };
        let bounds = self.bounds();
        // Head away from whichever edge is touched
        let direction = if bounds.min.x <= 0.0 {
            direction.abs()
        } else if bounds.max.x >= field_width {
            -direction.abs()
        } else {
            direction
        };
        self.motion = BrickMotion::Moving { direction, speed };
        self.translate(Vec2::new(direction * speed, 0.0));
        true
    }
}

impl Entity for Brick {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Brick
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(self.width, self.height))
    }

    fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap_is_inclusive() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let touching = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let apart = Aabb::new(Vec2::new(10.5, 0.0), Vec2::new(20.0, 10.0));
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_brick_rejects_bad_hits() {
        let pos = Vec2::new(100.0, 100.0);
        assert_eq!(
            Brick::new(EntityId(1), pos, 0).unwrap_err(),
            SimError::InvalidConfig { hits: 0 }
        );
        assert_eq!(
            Brick::new(EntityId(1), pos, 6).unwrap_err(),
            SimError::InvalidConfig { hits: 6 }
        );
        for hits in 1..=5 {
            assert_eq!(Brick::new(EntityId(1), pos, hits).unwrap().tier(), hits);
        }
    }

    #[test]
    fn test_brick_damage_saturates() {
        let mut brick = Brick::new(EntityId(1), Vec2::ZERO, 1).unwrap();
        brick.damage();
        assert!(brick.is_destroyed());
        brick.damage();
        assert_eq!(brick.hits, 0);
    }

    #[test]
    fn test_moving_brick_reflects_at_edge() {
        // Left edge at 0
        let mut brick =
            Brick::moving(EntityId(1), Vec2::new(BRICK_WIDTH / 2.0, 60.0), 1, -1.0).unwrap();
        assert!(brick.advance(FIELD_WIDTH));
        assert_eq!(brick.pos.x, BRICK_WIDTH / 2.0 + MOVING_BRICK_SPEED);
        assert!(matches!(
            brick.motion,
            BrickMotion::Moving { direction, .. } if direction == 1.0
        ));

        // Already heading away from the left edge: keeps going
        let mut brick =
            Brick::moving(EntityId(3), Vec2::new(BRICK_WIDTH / 2.0, 60.0), 1, 1.0).unwrap();
        let mut lefts = Vec::new();
        for _ in 0..8 {
            brick.advance(FIELD_WIDTH);
            lefts.push(brick.bounds().min.x);
        }
        assert!(lefts.iter().all(|&x| x >= 0.0));
        assert_eq!(lefts[7], 8.0 * MOVING_BRICK_SPEED);

        // Right edge heading left keeps going left
        let mut brick = Brick::moving(
            EntityId(4),
            Vec2::new(FIELD_WIDTH - BRICK_WIDTH / 2.0, 60.0),
            1,
            -1.0,
        )
        .unwrap();
        brick.advance(FIELD_WIDTH);
        assert_eq!(brick.bounds().max.x, FIELD_WIDTH - MOVING_BRICK_SPEED);

        // Right edge heading right turns around
        let mut brick = Brick::moving(
            EntityId(5),
            Vec2::new(FIELD_WIDTH - BRICK_WIDTH / 2.0, 60.0),
            1,
            1.0,
        )
        .unwrap();
        brick.advance(FIELD_WIDTH);
        assert_eq!(brick.bounds().max.x, FIELD_WIDTH - MOVING_BRICK_SPEED);
        assert!(matches!(
            brick.motion,
            BrickMotion::Moving { direction, .. } if direction == -1.0
        ));

        let mut still = Brick::new(EntityId(2), Vec2::new(200.0, 60.0), 1).unwrap();
        assert!(!still.advance(FIELD_WIDTH));
        assert_eq!(still.pos.x, 200.0);
    }

    #[test]
    fn test_paddle_clamp_offset() {
        let paddle = Paddle::new(EntityId(1), Vec2::new(45.0, PADDLE_Y));
        // Left edge at 5
        assert_eq!(paddle.clamp_offset(-10.0, FIELD_WIDTH), -5.0);
        assert_eq!(paddle.clamp_offset(10.0, FIELD_WIDTH), 10.0);

        let paddle = Paddle::new(EntityId(1), Vec2::new(FIELD_WIDTH - 40.0, PADDLE_Y));
        assert_eq!(paddle.clamp_offset(10.0, FIELD_WIDTH), 0.0);
    }

    #[test]
    fn test_ball_velocity_by_state() {
        let mut ball = Ball::new(EntityId(1), Vec2::new(305.0, BALL_SERVE_Y), 5.0);
        assert_eq!(ball.velocity(), Vec2::new(5.0, -5.0));

        // Carried balls don't advance on their own
        ball.advance();
        assert_eq!(ball.pos, Vec2::new(305.0, BALL_SERVE_Y));

        ball.launch();
        ball.advance();
        assert_eq!(ball.pos, Vec2::new(310.0, BALL_SERVE_Y - 5.0));

        ball.make_inert();
        assert_eq!(ball.velocity(), Vec2::ZERO);
        assert_eq!(ball.speed, 5.0);
    }
}
