//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven only, no clocks
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bounce;
pub mod collision;
pub mod entity;
pub mod level;
pub mod state;
pub mod tick;

pub use bounce::{BrickHit, Resolution, WallBounce, bounce_off_walls, hit_brick, paddle_offset};
pub use collision::{Collision, Contact, classify, detect};
pub use entity::{Aabb, Ball, BallState, Brick, BrickMotion, Entity, EntityId, EntityKind, Paddle};
pub use level::{LevelPolicy, Pattern, generate_level, hits_for_level};
pub use state::{GameEvent, GameOutcome, GamePhase, GameState, Scoreboard};
pub use tick::{Command, Scheduler, Task, TickOutcome, handle_command, run_task, tick};
