//! Mirrors game events onto a surface
//!
//! Game logic addresses entities by `EntityId`. The binding owns the
//! secondary lookup from ids to surface handles, plus the HUD shapes.

use std::collections::HashMap;

use glam::Vec2;

use super::{Geometry, ShapeHandle, ShapeKind, ShapeUpdate, Style, Surface, colors};
use crate::consts::LANE_INSET;
use crate::sim::{Aabb, EntityId, EntityKind, GameEvent, GameOutcome, GamePhase, GameState};

const HUD_FONT: f32 = 15.0;
const BANNER_FONT: f32 = 40.0;

#[derive(Debug, Default)]
pub struct SceneBinding {
    shapes: HashMap<EntityId, ShapeHandle>,
    lives_text: Option<ShapeHandle>,
    score_text: Option<ShapeHandle>,
    banner: Option<ShapeHandle>,
    lane: Option<ShapeHandle>,
    /// Level shown on the Setup banner
    level: u32,
}

impl SceneBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface handle for an entity, if it is drawn
    pub fn handle(&self, id: EntityId) -> Option<ShapeHandle> {
        self.shapes.get(&id).copied()
    }

    /// Number of entities currently drawn
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Bounds of an entity as the surface reports them
    pub fn bounds_of(&self, surface: &dyn Surface, id: EntityId) -> Option<Aabb> {
        surface.query_bounds(self.handle(id)?)
    }

    /// Apply a batch of events drained from `state`
    pub fn apply(&mut self, surface: &mut dyn Surface, state: &GameState, events: &[GameEvent]) {
        if self.lane.is_none() {
            self.draw_lane(surface);
        }

        for event in events {
            match *event {
                GameEvent::Spawned { id, kind } => self.spawn(surface, state, id, kind),
                GameEvent::Moved { id } => {
                    if let (Some(handle), Some((_, bounds))) =
                        (self.handle(id), state.entity_bounds(id))
                    {
                        surface.update_shape(handle, ShapeUpdate::Geometry(Geometry::Box(bounds)));
                    }
                }
                GameEvent::BrickDamaged { id, hits_remaining } => {
                    if let Some(handle) = self.handle(id) {
                        let fill = colors::brick(hits_remaining);
                        surface.update_shape(handle, ShapeUpdate::Fill(fill));
                    }
                }
                GameEvent::Removed { id } => {
                    if let Some(handle) = self.shapes.remove(&id) {
                        surface.delete_shape(handle);
                    }
                }
                GameEvent::ScoreChanged { score } => {
                    let at = Vec2::new(surface.field_width() - 100.0, 20.0);
                    let text = format!("Score: {score}");
                    self.score_text =
                        Some(upsert_text(surface, self.score_text, at, text, HUD_FONT));
                }
                GameEvent::LivesChanged { lives } => {
                    let text = format!("Lives: {lives}");
                    self.lives_text = Some(upsert_text(
                        surface,
                        self.lives_text,
                        Vec2::new(50.0, 20.0),
                        text,
                        HUD_FONT,
                    ));
                }
                GameEvent::LevelChanged { level } => {
                    self.level = level;
                    if self.banner.is_some() && state.phase == GamePhase::Setup {
                        self.show_phase(surface, state, GamePhase::Setup);
                    }
                }
                GameEvent::PhaseChanged { phase } => self.show_phase(surface, state, phase),
            }
        }
    }

    fn spawn(
        &mut self,
        surface: &mut dyn Surface,
        state: &GameState,
        id: EntityId,
        kind: EntityKind,
    ) {
        // Already gone by the time this batch is applied
        let Some((_, bounds)) = state.entity_bounds(id) else {
            return;
        };
        let (shape, style) = match kind {
            EntityKind::Ball => (ShapeKind::Oval, Style::filled(colors::BALL)),
            EntityKind::Paddle => (ShapeKind::Rectangle, Style::filled(colors::PADDLE)),
            EntityKind::Brick => {
                let tier = state.brick(id).map(|b| b.tier()).unwrap_or(1);
                (ShapeKind::Rectangle, Style::filled(colors::brick(tier)))
            }
        };
        let handle = surface.create_shape(shape, Geometry::Box(bounds), &style);
        if let Some(stale) = self.shapes.insert(id, handle) {
            surface.delete_shape(stale);
        }
    }

    fn show_phase(&mut self, surface: &mut dyn Surface, state: &GameState, phase: GamePhase) {
        let text = match phase {
            GamePhase::Setup => Some(format!("Level {}\nPress Space to start", self.level)),
            GamePhase::GameOver => Some(match state.outcome {
                Some(GameOutcome::LevelsExhausted) => "You Win! All levels cleared!".to_string(),
                _ => "You Lose! Game Over!".to_string(),
            }),
            GamePhase::Playing | GamePhase::LevelClear | GamePhase::BallLost => None,
        };

        match text {
            Some(text) => {
                let at = Vec2::new(surface.field_width() / 2.0, surface.field_height() / 2.0);
                self.banner = Some(upsert_text(surface, self.banner, at, text, BANNER_FONT));
            }
            None => {
                if let Some(handle) = self.banner.take() {
                    surface.delete_shape(handle);
                }
            }
        }
    }

    fn draw_lane(&mut self, surface: &mut dyn Surface) {
        let y = surface.field_height() - LANE_INSET;
        let geometry = Geometry::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(surface.field_width(), y),
        };
        let style = Style::line(colors::LANE, 2.0);
        self.lane = Some(surface.create_shape(ShapeKind::Line, geometry, &style));
    }
}

/// Update a text shape in place or create it
fn upsert_text(
    surface: &mut dyn Surface,
    existing: Option<ShapeHandle>,
    at: Vec2,
    text: String,
    size: f32,
) -> ShapeHandle {
    match existing {
        Some(handle) => {
            surface.update_shape(handle, ShapeUpdate::Text(text));
            handle
        }
        None => {
            let geometry = Geometry::Text { at, text };
            surface.create_shape(ShapeKind::Text, geometry, &Style::text(size))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::MemorySurface;
    use crate::settings::Settings;
    use crate::sim::{Command, Entity, Scheduler, Task, handle_command};

    struct NoopScheduler;

    impl Scheduler for NoopScheduler {
        fn schedule_once(&mut self, _task: Task, _delay_ms: u32) {}
    }

    fn bound_game() -> (GameState, MemorySurface, SceneBinding) {
        let mut state = GameState::new(Settings::default()).unwrap();
        let mut surface = MemorySurface::new(FIELD_WIDTH, FIELD_HEIGHT);
        let mut scene = SceneBinding::new();
        let events = state.drain_events();
        scene.apply(&mut surface, &state, &events);
        (state, surface, scene)
    }

    #[test]
    fn test_initial_scene() {
        let (state, surface, scene) = bound_game();
        // Paddle, ball and 15 bricks
        assert_eq!(scene.len(), 17);
        let texts = surface.texts();
        assert!(texts.contains(&"Score: 0"));
        assert!(texts.contains(&"Lives: 3"));
        assert!(texts.contains(&"Level 1\nPress Space to start"));
        assert_eq!(surface.shapes_of(ShapeKind::Line).count(), 1);

        let brick = &state.bricks[0];
        let handle = scene.handle(brick.id).unwrap();
        assert_eq!(surface.shape(handle).unwrap().style.fill, Some(colors::brick(2)));
    }

    #[test]
    fn test_moves_and_removal_follow_state() {
        let (mut state, mut surface, mut scene) = bound_game();
        handle_command(&mut state, Command::MoveLeft, &mut NoopScheduler);
        handle_command(&mut state, Command::Start, &mut NoopScheduler);
        let id = state.bricks[0].id;
        state.remove_brick(id);

        let events = state.drain_events();
        scene.apply(&mut surface, &state, &events);

        assert_eq!(
            scene.bounds_of(&surface, state.paddle.id),
            Some(state.paddle.bounds())
        );
        assert_eq!(scene.bounds_of(&surface, state.ball.id), Some(state.ball.bounds()));
        assert_eq!(scene.handle(id), None);
        assert_eq!(scene.len(), 16);
        // Banner gone once playing
        assert!(!surface.texts().iter().any(|t| t.starts_with("Level")));
    }

    #[test]
    fn test_damage_recolors_brick() {
        let (mut state, mut surface, mut scene) = bound_game();
        let id = state.bricks[0].id;
        state.push_event(GameEvent::BrickDamaged {
            id,
            hits_remaining: 1,
        });
        let events = state.drain_events();
        scene.apply(&mut surface, &state, &events);
        let handle = scene.handle(id).unwrap();
        assert_eq!(surface.shape(handle).unwrap().style.fill, Some(colors::brick(1)));
    }

    #[test]
    fn test_banner_follows_level_change() {
        let (mut state, mut surface, mut scene) = bound_game();
        state.scoreboard.level = 2;
        state.push_event(GameEvent::LevelChanged { level: 2 });
        let events = state.drain_events();
        scene.apply(&mut surface, &state, &events);

        let texts = surface.texts();
        assert!(texts.contains(&"Level 2\nPress Space to start"));
        assert!(!texts.contains(&"Level 1\nPress Space to start"));
    }

    #[test]
    fn test_level_shown_on_next_serve() {
        let (mut state, mut surface, mut scene) = bound_game();
        handle_command(&mut state, Command::Start, &mut NoopScheduler);
        state.set_phase(GamePhase::LevelClear);
        state.scoreboard.advance_level(1.0);
        state.push_event(GameEvent::LevelChanged { level: 2 });
        let events = state.drain_events();
        scene.apply(&mut surface, &state, &events);
        // No banner while the level is changing
        assert!(!surface.texts().iter().any(|t| t.starts_with("Level")));

        state.serve();
        let events = state.drain_events();
        scene.apply(&mut surface, &state, &events);
        assert!(surface.texts().contains(&"Level 2\nPress Space to start"));
    }

    #[test]
    fn test_game_over_banner() {
        let (mut state, mut surface, mut scene) = bound_game();
        state.finish(GameOutcome::OutOfLives);
        let events = state.drain_events();
        scene.apply(&mut surface, &state, &events);
        assert!(surface.texts().contains(&"You Lose! Game Over!"));
    }
}
