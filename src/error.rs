//! Error conditions raised by the simulation core

use std::fmt;

use crate::consts::{MAX_BRICK_HITS, MIN_BRICK_HITS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// Brick hit count outside the supported tiers
    InvalidConfig { hits: u8 },
    /// No pattern exists for this level under the active policy
    LevelExhausted { level: u32 },
    /// Settings could not be parsed or failed validation
    Settings { reason: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { hits } => write!(
                f,
                "invalid brick hit count: {hits} (allowed {MIN_BRICK_HITS}..={MAX_BRICK_HITS})"
            ),
            Self::LevelExhausted { level } => write!(f, "no brick pattern for level {level}"),
            Self::Settings { reason } => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SimError {}
