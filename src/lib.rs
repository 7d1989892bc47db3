//! Brickfall - a brick-breaking arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, levels, game loop)
//! - `renderer`: Render surface abstraction and scene mirroring
//! - `platform`: Single-threaded scheduler and session driver
//! - `settings`: Data-driven gameplay tuning
//! - `autopilot`: Demo bot that plays the game

pub mod autopilot;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playing field dimensions
    pub const FIELD_WIDTH: f32 = 610.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_Y: f32 = 326.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Ball center height while it rides the paddle
    pub const BALL_SERVE_Y: f32 = 310.0;

    /// Brick defaults
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const MIN_BRICK_HITS: u8 = 1;
    pub const MAX_BRICK_HITS: u8 = 5;

    /// Vertical offset of the first brick row
    pub const PATTERN_TOP: f32 = 50.0;
    /// Horizontal speed of level-3 bricks (pixels per tick)
    pub const MOVING_BRICK_SPEED: f32 = 6.0;

    /// Distance of the decorative ball lane above the bottom edge
    pub const LANE_INSET: f32 = 20.0;
}
