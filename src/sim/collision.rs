//! Broad-phase collision detection
//!
//! Each tick the ball's bounding box is tested against the paddle and every
//! active brick. The result is classified by how many entities it touches.

use super::entity::{Aabb, Brick, Entity, EntityId, EntityKind, Paddle};

/// An entity whose bounds overlap the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// Classified collision for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    None,
    /// Two or more overlaps; only the vertical direction flips
    Corner { count: usize },
    Paddle(EntityId),
    Brick(EntityId),
}

/// All entities overlapping `ball_bounds`, paddle first, then bricks in id order
pub fn overlapping(ball_bounds: &Aabb, paddle: &Paddle, bricks: &[Brick]) -> Vec<Contact> {
    std::iter::once(paddle as &dyn Entity)
        .chain(bricks.iter().map(|b| b as &dyn Entity))
        .filter(|e| e.bounds().overlaps(ball_bounds))
        .map(|e| Contact {
            id: e.id(),
            kind: e.kind(),
        })
        .collect()
}

/// Classify a set of contacts
pub fn classify(contacts: &[Contact]) -> Collision {
    match contacts {
        [] => Collision::None,
        [single] => match single.kind {
            EntityKind::Paddle => Collision::Paddle(single.id),
            EntityKind::Brick => Collision::Brick(single.id),
            // Never produced by `overlapping`
            EntityKind::Ball => Collision::None,
        },
        many => Collision::Corner { count: many.len() },
    }
}

/// Detect and classify the ball's collision this tick
pub fn detect(ball_bounds: &Aabb, paddle: &Paddle, bricks: &[Brick]) -> Collision {
    let contacts = overlapping(ball_bounds, paddle, bricks);
    let collision = classify(&contacts);
    if collision != Collision::None {
        log::debug!("collision {:?} from {} contact(s)", collision, contacts.len());
    }
    collision
}
