//! Gameplay settings
//!
//! Tunable values that are not part of the fixed field geometry. Loaded from
//! a JSON file on native builds, defaults everywhere else.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::LevelPolicy;

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Delay between Playing ticks
    pub tick_interval_ms: u32,
    /// Delay between losing a ball and the next serve
    pub respawn_delay_ms: u32,

    // === Player ===
    /// Paddle translation per move command (pixels)
    pub paddle_step: f32,
    /// Lives at the start of a run
    pub starting_lives: i32,

    // === Scoring ===
    /// Points awarded for every resolved brick hit
    pub points_per_hit: u64,

    // === Ball ===
    /// Ball speed on level 1 (pixels per tick)
    pub ball_speed: f32,
    /// Speed added each time a level is cleared
    pub level_speed_step: f32,

    // === Levels ===
    /// What happens after the last defined pattern
    pub level_policy: LevelPolicy,
    /// Seed for moving brick directions
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            respawn_delay_ms: 1000,

            paddle_step: 10.0,
            starting_lives: 3,

            points_per_hit: 20,

            ball_speed: 5.0,
            level_speed_step: 1.0,

            level_policy: LevelPolicy::Cycle,
            seed: 0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json).map_err(|e| SimError::Settings {
            reason: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the game loop cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_interval_ms == 0 {
            return Err(SimError::Settings {
                reason: "tick_interval_ms must be positive".to_string(),
            });
        }
        if self.ball_speed.is_nan() || self.ball_speed <= 0.0 {
            return Err(SimError::Settings {
                reason: format!("ball_speed must be positive, got {}", self.ball_speed),
            });
        }
        if self.paddle_step.is_nan() || self.paddle_step <= 0.0 {
            return Err(SimError::Settings {
                reason: format!("paddle_step must be positive, got {}", self.paddle_step),
            });
        }
        if self.level_speed_step < 0.0 {
            return Err(SimError::Settings {
                reason: format!(
                    "level_speed_step must not be negative, got {}",
                    self.level_speed_step
                ),
            });
        }
        if self.starting_lives < 0 {
            return Err(SimError::Settings {
                reason: format!(
                    "starting_lives must not be negative, got {}",
                    self.starting_lives
                ),
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings from {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Web builds have no settings file
    #[cfg(target_arch = "wasm32")]
    pub fn load(_path: &std::path::Path) -> Self {
        Self::default()
    }
}
