//! Game loop state machine
//!
//! The loop is driven from outside by two kinds of callbacks: player commands
//! and tasks the loop itself asked a `Scheduler` to run later. Both run to
//! completion on one thread and are the only places state changes.

use super::bounce::{Resolution, bounce_off_walls, resolve};
use super::collision::detect;
use super::entity::Entity;
use super::state::{GameEvent, GameOutcome, GamePhase, GameState};
use crate::error::SimError;

/// Discrete player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// Launch the ball (accepted once per serve)
    Start,
}

/// Deferred work the loop schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Run one Playing tick
    Tick,
    /// Re-serve after a lost ball
    Serve,
}

/// One-shot delayed task runner
pub trait Scheduler {
    fn schedule_once(&mut self, task: Task, delay_ms: u32);
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing happened
    Idle,
    /// Ball moved, next tick scheduled
    Continue,
    LevelCleared,
    BallLost,
}

/// Apply a player command
pub fn handle_command(state: &mut GameState, command: Command, scheduler: &mut dyn Scheduler) {
    if state.phase == GamePhase::GameOver {
        log::debug!("Ignoring {:?} after game over", command);
        return;
    }

    match command {
        Command::MoveLeft => {
            state.move_paddle(-state.settings.paddle_step);
        }
        Command::MoveRight => {
            state.move_paddle(state.settings.paddle_step);
        }
        Command::Start => {
            if state.phase != GamePhase::Setup || !state.start_armed {
                log::debug!("Start ignored in {:?}", state.phase);
                return;
            }
            state.start_armed = false;
            state.paddle.carrying = None;
            state.ball.launch();
            state.set_phase(GamePhase::Playing);
            scheduler.schedule_once(Task::Tick, 0);
        }
    }
}

/// Run a task previously handed to the scheduler
pub fn run_task(
    state: &mut GameState,
    task: Task,
    scheduler: &mut dyn Scheduler,
) -> Result<TickOutcome, SimError> {
    match task {
        Task::Tick => tick(state, scheduler),
        Task::Serve => {
            if state.phase == GamePhase::BallLost {
                state.serve();
            }
            Ok(TickOutcome::Idle)
        }
    }
}

/// Advance one Playing tick.
///
/// Order: moving bricks, collision response, wall bounce, end-of-tick
/// checks, then ball motion.
pub fn tick(state: &mut GameState, scheduler: &mut dyn Scheduler) -> Result<TickOutcome, SimError> {
    if state.phase != GamePhase::Playing {
        return Ok(TickOutcome::Idle);
    }
    state.time_ticks += 1;

    state.advance_bricks();

    let collision = detect(&state.ball.bounds(), &state.paddle, &state.bricks);
    let points = state.settings.points_per_hit;
    let resolution = resolve(
        collision,
        &mut state.ball,
        &state.paddle,
        &mut state.bricks,
        points,
    );
    if let Resolution::Brick(hit) = resolution {
        state.apply_brick_hit(hit);
    }

    bounce_off_walls(&mut state.ball, state.field.x);

    if state.bricks.is_empty() {
        level_clear(state)?;
        return Ok(TickOutcome::LevelCleared);
    }

    if state.ball.bounds().max.y >= state.field.y {
        ball_lost(state, scheduler);
        return Ok(TickOutcome::BallLost);
    }

    state.ball.advance();
    state.push_event(GameEvent::Moved { id: state.ball.id });
    scheduler.schedule_once(Task::Tick, state.settings.tick_interval_ms);
    Ok(TickOutcome::Continue)
}

/// All bricks gone: next level, faster ball, back to Setup
fn level_clear(state: &mut GameState) -> Result<(), SimError> {
    state.set_phase(GamePhase::LevelClear);
    state
        .scoreboard
        .advance_level(state.settings.level_speed_step);
    state.push_event(GameEvent::LevelChanged {
        level: state.scoreboard.level,
    });

    match state.load_level() {
        Ok(()) => {
            state.serve();
            Ok(())
        }
        Err(SimError::LevelExhausted { level }) => {
            log::warn!("No layout for level {}, ending the run", level);
            state.finish(GameOutcome::LevelsExhausted);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Ball fell out: lose a life, then re-serve or end
fn ball_lost(state: &mut GameState, scheduler: &mut dyn Scheduler) {
    state.set_phase(GamePhase::BallLost);
    state.ball.make_inert();
    let lives = state.scoreboard.lose_life();
    state.push_event(GameEvent::LivesChanged { lives });

    if state.scoreboard.is_out_of_lives() {
        state.finish(GameOutcome::OutOfLives);
    } else {
        log::info!("Ball lost, {} lives left", lives);
        scheduler.schedule_once(Task::Serve, state.settings.respawn_delay_ms);
    }
}
