//! Platform layer
//!
//! Supplies what the simulation treats as external collaborators:
//! - A scheduler that runs one-shot tasks in due-time order
//! - A session that routes commands and tasks into the game and keeps a
//!   render surface in sync
//!
//! Everything runs on the caller's thread. Time is virtual and only moves
//! when a task is taken from the queue.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::error::SimError;
use crate::renderer::{SceneBinding, Surface};
use crate::settings::Settings;
use crate::sim::{
    Command, GamePhase, GameState, Scheduler, Task, TickOutcome, handle_command, run_task,
};

/// Single-threaded one-shot scheduler on a virtual clock
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    seq: u64,
    /// Keyed by (due time, insertion order)
    queue: BTreeMap<(u64, u64), Task>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take the earliest task and move the clock to its due time
    pub fn next_task(&mut self) -> Option<Task> {
        let ((due, _), task) = self.queue.pop_first()?;
        self.now_ms = self.now_ms.max(due);
        Some(task)
    }

    /// Take the earliest task only if it is due by `deadline_ms`
    pub fn next_task_until(&mut self, deadline_ms: u64) -> Option<Task> {
        let (&(due, _), _) = self.queue.first_key_value()?;
        if due > deadline_ms {
            self.now_ms = self.now_ms.max(deadline_ms);
            return None;
        }
        self.next_task()
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule_once(&mut self, task: Task, delay_ms: u32) {
        let due = self.now_ms + u64::from(delay_ms);
        self.queue.insert((due, self.seq), task);
        self.seq += 1;
    }
}

/// A running game wired to a scheduler and a surface
pub struct Session<S: Surface> {
    pub state: GameState,
    pub scheduler: VirtualScheduler,
    scene: SceneBinding,
    surface: S,
}

impl<S: Surface> Session<S> {
    /// Start a game sized to the surface and draw the opening scene
    pub fn new(settings: Settings, surface: S) -> Result<Self, SimError> {
        let field = Vec2::new(surface.field_width(), surface.field_height());
        let state = GameState::with_field(settings, field)?;
        let mut session = Self {
            state,
            scheduler: VirtualScheduler::new(),
            scene: SceneBinding::new(),
            surface,
        };
        session.present();
        log::info!("Session started on a {}x{} field", field.x, field.y);
        Ok(session)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scene(&self) -> &SceneBinding {
        &self.scene
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    /// Deliver a player command
    pub fn command(&mut self, command: Command) {
        handle_command(&mut self.state, command, &mut self.scheduler);
        self.present();
    }

    /// Run the next scheduled task. `None` when nothing is scheduled.
    pub fn step(&mut self) -> Result<Option<TickOutcome>, SimError> {
        let Some(task) = self.scheduler.next_task() else {
            return Ok(None);
        };
        let outcome = run_task(&mut self.state, task, &mut self.scheduler)?;
        self.present();
        Ok(Some(outcome))
    }

    /// Run every task due by `deadline_ms`
    pub fn run_until(&mut self, deadline_ms: u64) -> Result<(), SimError> {
        while let Some(task) = self.scheduler.next_task_until(deadline_ms) {
            run_task(&mut self.state, task, &mut self.scheduler)?;
            self.present();
        }
        Ok(())
    }

    /// Push pending game events to the surface
    pub fn present(&mut self) {
        let events = self.state.drain_events();
        if !events.is_empty() {
            self.scene.apply(&mut self.surface, &self.state, &events);
        }
    }
}
