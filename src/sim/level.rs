//! Level layouts
//!
//! Every level uses one of three brick patterns. All bricks in a level share
//! the same starting hit count, `(level mod 3) + 1`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Brick, EntityId};
use crate::consts::*;
use crate::error::SimError;

/// Rows in the pyramid pattern (row r holds 5 - r bricks)
const PYRAMID_ROWS: usize = 5;

/// Occupancy grid for the maze pattern
const MAZE: [[u8; 8]; 8] = [
    [1, 1, 0, 1, 0, 1, 1, 1],
    [1, 0, 1, 1, 0, 1, 0, 1],
    [1, 0, 1, 0, 1, 1, 1, 1],
    [0, 1, 0, 1, 1, 0, 0, 1],
    [1, 0, 1, 0, 1, 1, 1, 0],
    [1, 1, 0, 1, 0, 1, 0, 1],
    [1, 0, 1, 1, 0, 1, 1, 1],
    [1, 1, 0, 1, 1, 0, 0, 1],
];

/// Moving field grid size
const MOVING_ROWS: usize = 5;
const MOVING_COLS: usize = 6;

/// Brick layout pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Pyramid,
    Maze,
    MovingField,
}

impl Pattern {
    pub const ALL: [Pattern; 3] = [Pattern::Pyramid, Pattern::Maze, Pattern::MovingField];
}

/// Which pattern a level past the last defined one gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelPolicy {
    /// Level 4 is a pyramid again, level 5 a maze, ...
    #[default]
    Cycle,
    /// Keep playing the moving field
    RepeatLast,
    /// Report `LevelExhausted`
    Exhaust,
}

/// Starting hit count for every brick in `level`
pub fn hits_for_level(level: u32) -> u8 {
    (level % 3) as u8 + 1
}

/// Pick the pattern for a 1-based level number
pub fn pattern_for_level(level: u32, policy: LevelPolicy) -> Result<Pattern, SimError> {
    let exhausted = SimError::LevelExhausted { level };
    let index = level.checked_sub(1).ok_or(exhausted.clone())? as usize;
    let count = Pattern::ALL.len();

    if index < count {
        return Ok(Pattern::ALL[index]);
    }
    match policy {
        LevelPolicy::Cycle => Ok(Pattern::ALL[index % count]),
        LevelPolicy::RepeatLast => Ok(Pattern::ALL[count - 1]),
        LevelPolicy::Exhaust => Err(exhausted),
    }
}

/// Build the bricks for `level`, allocating ids through `next_id`
pub fn generate_level<R: Rng>(
    level: u32,
    policy: LevelPolicy,
    field_width: f32,
    rng: &mut R,
    mut next_id: impl FnMut() -> EntityId,
) -> Result<Vec<Brick>, SimError> {
    let pattern = pattern_for_level(level, policy)?;
    let hits = hits_for_level(level);

    let bricks = match pattern {
        Pattern::Pyramid => pyramid(field_width, hits, &mut next_id)?,
        Pattern::Maze => maze(hits, &mut next_id)?,
        Pattern::MovingField => moving_field(hits, rng, &mut next_id)?,
    };

    log::info!(
        "Level {}: {:?} with {} bricks ({} hits each)",
        level,
        pattern,
        bricks.len(),
        hits
    );
    Ok(bricks)
}

/// Center of the grid cell at (row, col), columns starting at the left edge
fn cell_center(row: usize, col: usize) -> Vec2 {
    Vec2::new(
        col as f32 * BRICK_WIDTH + BRICK_WIDTH / 2.0,
        PATTERN_TOP + row as f32 * BRICK_HEIGHT,
    )
}

fn pyramid(
    field_width: f32,
    hits: u8,
    next_id: &mut impl FnMut() -> EntityId,
) -> Result<Vec<Brick>, SimError> {
    let mut bricks = Vec::new();
    for row in 0..PYRAMID_ROWS {
        let in_row = PYRAMID_ROWS - row;
        let start_x =
            ((field_width - in_row as f32 * BRICK_WIDTH) / 2.0).floor() + BRICK_WIDTH / 2.0;
        let y = PATTERN_TOP + row as f32 * BRICK_HEIGHT;
        for col in 0..in_row {
            let pos = Vec2::new(start_x + col as f32 * BRICK_WIDTH, y);
            bricks.push(Brick::new(next_id(), pos, hits)?);
        }
    }
    Ok(bricks)
}

fn maze(hits: u8, next_id: &mut impl FnMut() -> EntityId) -> Result<Vec<Brick>, SimError> {
    let mut bricks = Vec::new();
    for (row, cells) in MAZE.iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            if cell == 1 {
                bricks.push(Brick::new(next_id(), cell_center(row, col), hits)?);
            }
        }
    }
    Ok(bricks)
}

fn moving_field<R: Rng>(
    hits: u8,
    rng: &mut R,
    next_id: &mut impl FnMut() -> EntityId,
) -> Result<Vec<Brick>, SimError> {
    let mut bricks = Vec::with_capacity(MOVING_ROWS * MOVING_COLS);
    for row in 0..MOVING_ROWS {
        for col in 0..MOVING_COLS {
            let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            bricks.push(Brick::moving(next_id(), cell_center(row, col), hits, direction)?);
        }
    }
    Ok(bricks)
}
