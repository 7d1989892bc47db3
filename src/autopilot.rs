//! Demo bot
//!
//! Serves as soon as it can and keeps the paddle under the ball's
//! predicted landing point.

use crate::sim::{Command, Entity, GamePhase, GameState};

/// Ticks of ball motion to lead the paddle by
const LEAD_TICKS: f32 = 4.0;

/// The command the bot would give right now, if any
pub fn next_command(state: &GameState) -> Option<Command> {
    match state.phase {
        GamePhase::Setup if state.start_armed => Some(Command::Start),
        GamePhase::Playing => track_ball(state),
        _ => None,
    }
}

fn track_ball(state: &GameState) -> Option<Command> {
    let ball = &state.ball;
    let target = (ball.pos.x + ball.velocity().x * LEAD_TICKS).clamp(0.0, state.field.x);
    let paddle_x = state.paddle.bounds().center().x;
    let dead_zone = state.settings.paddle_step / 2.0;

    if target < paddle_x - dead_zone {
        Some(Command::MoveLeft)
    } else if target > paddle_x + dead_zone {
        Some(Command::MoveRight)
    } else {
        None
    }
}
