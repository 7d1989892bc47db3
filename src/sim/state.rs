//! Game state and bookkeeping
//!
//! `GameState` is the world owned by the game loop: paddle, ball, active
//! bricks, the scoreboard and the current phase. Changes that a renderer
//! cares about are queued as `GameEvent`s.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounce::BrickHit;
use super::entity::{Aabb, Ball, Brick, Entity, EntityId, EntityKind, Paddle};
use super::level::generate_level;
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;

/// Current phase of the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball rides the paddle, waiting for the start signal
    Setup,
    /// Ticks running
    Playing,
    /// All bricks gone (transient)
    LevelClear,
    /// Ball fell past the bottom edge, waiting to re-serve
    BallLost,
    /// Run ended
    GameOver,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    OutOfLives,
    /// Cleared the last level the policy allows
    LevelsExhausted,
}

/// Score, lives and level counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Drops below zero on the final ball loss
    pub lives: i32,
    pub score: u64,
    /// 1-based
    pub level: u32,
    /// Speed given to each freshly served ball
    pub ball_speed: f32,
}

impl Scoreboard {
    pub fn new(settings: &Settings) -> Self {
        Self {
            lives: settings.starting_lives,
            score: 0,
            level: 1,
            ball_speed: settings.ball_speed,
        }
    }

    pub fn award(&mut self, points: u64) {
        self.score += points;
    }

    /// Remove a life and return how many are left
    pub fn lose_life(&mut self) -> i32 {
        self.lives -= 1;
        self.lives
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives < 0
    }

    pub fn advance_level(&mut self, speed_step: f32) {
        self.level += 1;
        self.ball_speed += speed_step;
    }
}

/// Changes a renderer mirrors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: EntityId, kind: EntityKind },
    Moved { id: EntityId },
    BrickDamaged { id: EntityId, hits_remaining: u8 },
    Removed { id: EntityId },
    ScoreChanged { score: u64 },
    LivesChanged { lives: i32 },
    LevelChanged { level: u32 },
    PhaseChanged { phase: GamePhase },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Field width and height
    pub field: Vec2,
    pub phase: GamePhase,
    pub outcome: Option<GameOutcome>,
    pub scoreboard: Scoreboard,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Active bricks, sorted by id
    pub bricks: Vec<Brick>,
    /// Whether the start command is currently accepted
    pub start_armed: bool,
    /// Playing ticks run so far
    pub time_ticks: u64,
    rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// New game on the default field
    pub fn new(settings: Settings) -> Result<Self, SimError> {
        Self::with_field(settings, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT))
    }

    /// New game on a field of the given size, ready to serve level 1
    pub fn with_field(settings: Settings, field: Vec2) -> Result<Self, SimError> {
        settings.validate()?;
        if field.x < PADDLE_WIDTH || field.y <= PADDLE_Y {
            return Err(SimError::Settings {
                reason: format!("field {}x{} is too small", field.x, field.y),
            });
        }

        let paddle = Paddle::new(EntityId(1), Vec2::new(field.x / 2.0, PADDLE_Y));
        let ball = Ball::new(
            EntityId(2),
            Vec2::new(paddle.pos.x, BALL_SERVE_Y),
            settings.ball_speed,
        );

        let mut state = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            scoreboard: Scoreboard::new(&settings),
            settings,
            field,
            phase: GamePhase::Setup,
            outcome: None,
            paddle,
            ball,
            bricks: Vec::new(),
            start_armed: false,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 3,
        };

        state.push_event(GameEvent::Spawned {
            id: state.paddle.id,
            kind: EntityKind::Paddle,
        });
        state.push_event(GameEvent::ScoreChanged { score: 0 });
        state.push_event(GameEvent::LivesChanged {
            lives: state.scoreboard.lives,
        });
        state.push_event(GameEvent::LevelChanged { level: 1 });

        state.load_level()?;
        state.paddle.carrying = Some(state.ball.id);
        state.push_event(GameEvent::Spawned {
            id: state.ball.id,
            kind: EntityKind::Ball,
        });
        state.start_armed = true;
        state.push_event(GameEvent::PhaseChanged {
            phase: GamePhase::Setup,
        });
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.push_event(GameEvent::PhaseChanged { phase });
        }
    }

    pub fn brick(&self, id: EntityId) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.id == id)
    }

    /// Kind and bounds of any live entity
    pub fn entity_bounds(&self, id: EntityId) -> Option<(EntityKind, Aabb)> {
        if id == self.paddle.id {
            Some((EntityKind::Paddle, self.paddle.bounds()))
        } else if id == self.ball.id {
            Some((EntityKind::Ball, self.ball.bounds()))
        } else {
            self.brick(id).map(|b| (EntityKind::Brick, b.bounds()))
        }
    }

    /// Replace the brick set with the layout for the current level
    pub fn load_level(&mut self) -> Result<(), SimError> {
        let level = self.scoreboard.level;
        let policy = self.settings.level_policy;
        let mut next_id = self.next_id;
        let bricks = generate_level(level, policy, self.field.x, &mut self.rng, || {
            let id = EntityId(next_id);
            next_id += 1;
            id
        })?;
        self.next_id = next_id;

        self.clear_bricks();
        for brick in &bricks {
            self.events.push(GameEvent::Spawned {
                id: brick.id,
                kind: EntityKind::Brick,
            });
        }
        self.bricks = bricks;
        Ok(())
    }

    /// Remove every active brick
    pub fn clear_bricks(&mut self) {
        for brick in std::mem::take(&mut self.bricks) {
            self.events.push(GameEvent::Removed { id: brick.id });
        }
    }

    /// Detach a brick from the active set
    pub fn remove_brick(&mut self, id: EntityId) -> Option<Brick> {
        let index = self.bricks.iter().position(|b| b.id == id)?;
        self.push_event(GameEvent::Removed { id });
        Some(self.bricks.remove(index))
    }

    /// Replace the ball with a fresh one riding the paddle
    pub fn spawn_ball_on_paddle(&mut self) {
        let old = self.ball.id;
        self.push_event(GameEvent::Removed { id: old });

        let id = self.next_entity_id();
        let pos = Vec2::new(self.paddle.bounds().center().x, BALL_SERVE_Y);
        self.ball = Ball::new(id, pos, self.scoreboard.ball_speed);
        self.paddle.carrying = Some(id);
        self.push_event(GameEvent::Spawned {
            id,
            kind: EntityKind::Ball,
        });
    }

    /// Fresh ball on the paddle and accept the start command
    pub fn serve(&mut self) {
        self.spawn_ball_on_paddle();
        self.start_armed = true;
        self.set_phase(GamePhase::Setup);
    }

    /// Move the paddle horizontally, clamped to the field.
    ///
    /// A carried ball moves with it. Returns the offset actually applied.
    pub fn move_paddle(&mut self, dx: f32) -> f32 {
        let applied = self.paddle.clamp_offset(dx, self.field.x);
        if applied == 0.0 {
            return 0.0;
        }
        let delta = Vec2::new(applied, 0.0);
        self.paddle.translate(delta);
        self.push_event(GameEvent::Moved { id: self.paddle.id });

        if self.paddle.carrying == Some(self.ball.id) {
            self.ball.translate(delta);
            self.push_event(GameEvent::Moved { id: self.ball.id });
        }
        applied
    }

    /// Book the effects of a resolved brick hit
    pub fn apply_brick_hit(&mut self, hit: BrickHit) {
        self.scoreboard.award(hit.score_delta);
        self.push_event(GameEvent::ScoreChanged {
            score: self.scoreboard.score,
        });

        if hit.destroyed {
            self.remove_brick(hit.id);
        } else {
            self.push_event(GameEvent::BrickDamaged {
                id: hit.id,
                hits_remaining: hit.hits_remaining,
            });
        }
    }

    /// Advance every moving brick one step
    pub fn advance_bricks(&mut self) {
        let width = self.field.x;
        for brick in &mut self.bricks {
            if brick.advance(width) {
                self.events.push(GameEvent::Moved { id: brick.id });
            }
        }
    }

    /// Terminal: no more ticks or commands
    pub fn finish(&mut self, outcome: GameOutcome) {
        log::info!(
            "Game over ({:?}) at level {} with score {}",
            outcome,
            self.scoreboard.level,
            self.scoreboard.score
        );
        self.outcome = Some(outcome);
        self.start_armed = false;
        self.set_phase(GamePhase::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::BallState;

    fn new_state() -> GameState {
        GameState::new(Settings::default()).expect("default settings")
    }

    #[test]
    fn test_new_game_is_serving_level_one() {
        let mut state = new_state();
        assert_eq!(state.phase, GamePhase::Setup);
        assert!(state.start_armed);
        assert_eq!(state.scoreboard.lives, 3);
        assert_eq!(state.scoreboard.score, 0);
        assert_eq!(state.scoreboard.level, 1);
        assert_eq!(state.bricks.len(), 15);
        assert_eq!(state.ball.state, BallState::Carried);
        assert_eq!(state.paddle.carrying, Some(state.ball.id));
        assert_eq!(state.ball.pos, Vec2::new(305.0, BALL_SERVE_Y));

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PhaseChanged {
            phase: GamePhase::Setup
        }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Removed { .. })));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Spawned { kind: EntityKind::Brick, .. }))
                .count(),
            15
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let state = new_state();
        let mut ids: Vec<_> = state.bricks.iter().map(|b| b.id).collect();
        ids.push(state.paddle.id);
        ids.push(state.ball.id);
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_paddle_carries_ball() {
        let mut state = new_state();
        assert_eq!(state.move_paddle(-10.0), -10.0);
        assert_eq!(state.paddle.pos.x, 295.0);
        assert_eq!(state.ball.pos.x, 295.0);

        state.paddle.carrying = None;
        state.move_paddle(10.0);
        assert_eq!(state.paddle.pos.x, 305.0);
        assert_eq!(state.ball.pos.x, 295.0);
    }

    #[test]
    fn test_paddle_stays_on_field() {
        let mut state = new_state();
        for _ in 0..100 {
            state.move_paddle(-10.0);
        }
        assert_eq!(state.paddle.bounds().min.x, 0.0);
        for _ in 0..100 {
            state.move_paddle(10.0);
        }
        assert_eq!(state.paddle.bounds().max.x, FIELD_WIDTH);
        assert_eq!(state.move_paddle(10.0), 0.0);
    }

    #[test]
    fn test_apply_brick_hit() {
        let mut state = new_state();
        state.drain_events();
        let id = state.bricks[0].id;

        state.apply_brick_hit(BrickHit {
            id,
            score_delta: 20,
            hits_remaining: 1,
            destroyed: false,
        });
        assert_eq!(state.scoreboard.score, 20);
        assert!(state.brick(id).is_some());

        state.apply_brick_hit(BrickHit {
            id,
            score_delta: 20,
            hits_remaining: 0,
            destroyed: true,
        });
        assert_eq!(state.scoreboard.score, 40);
        assert!(state.brick(id).is_none());
        assert_eq!(state.bricks.len(), 14);
        assert!(state.drain_events().contains(&GameEvent::Removed { id }));
    }

    #[test]
    fn test_rejects_tiny_field() {
        assert!(GameState::with_field(Settings::default(), Vec2::new(50.0, 400.0)).is_err());
    }
}
