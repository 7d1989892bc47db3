//! Rendering surface abstraction
//!
//! The simulation never draws. A `Surface` is whatever can create, update and
//! delete simple shapes; `SceneBinding` keeps one in sync with a `GameState`.

pub mod memory;
pub mod scene;

pub use memory::MemorySurface;
pub use scene::SceneBinding;

use glam::Vec2;

use crate::sim::Aabb;

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Opaque handle issued by a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Oval,
    Rectangle,
    Line,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Oval or rectangle inscribed in a box
    Box(Aabb),
    Line { from: Vec2, to: Vec2 },
    /// Text centered on a point
    Text { at: Vec2, text: String },
}

impl Geometry {
    /// Bounding box of the geometry (text is treated as a point)
    pub fn bounds(&self) -> Aabb {
        match self {
            Geometry::Box(aabb) => *aabb,
            Geometry::Line { from, to } => Aabb::new(from.min(*to), from.max(*to)),
            Geometry::Text { at, .. } => Aabb::new(*at, *at),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub font_size: f32,
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
            font_size: 0.0,
        }
    }

    pub fn line(color: Color, width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
            font_size: 0.0,
        }
    }

    pub fn text(size: f32) -> Self {
        Self {
            fill: Some(colors::TEXT),
            stroke: None,
            stroke_width: 0.0,
            font_size: size,
        }
    }
}

/// Change applied to an existing shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeUpdate {
    Geometry(Geometry),
    Text(String),
    Fill(Color),
}

/// Drawing target consumed by the scene binding
pub trait Surface {
    fn create_shape(&mut self, kind: ShapeKind, geometry: Geometry, style: &Style) -> ShapeHandle;
    fn update_shape(&mut self, handle: ShapeHandle, update: ShapeUpdate);
    fn delete_shape(&mut self, handle: ShapeHandle);
    fn query_bounds(&self, handle: ShapeHandle) -> Option<Aabb>;
    fn field_width(&self) -> f32;
    fn field_height(&self) -> f32;
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    /// Convert a 0xRRGGBB value to an opaque color
    pub const fn hex(rgb: u32) -> Color {
        [
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
            1.0,
        ]
    }

    pub const BACKGROUND: Color = hex(0xD6D1F5);
    pub const PADDLE: Color = hex(0xFFB643);
    pub const BALL: Color = hex(0xFFFFFF);
    pub const LANE: Color = hex(0x000000);
    pub const TEXT: Color = hex(0x000000);

    /// Brick fill by tier (hits remaining), tier 1 first
    pub const BRICK_TIERS: [Color; 5] = [
        hex(0xFFB6C1),
        hex(0xFF8243),
        hex(0x87CEFA),
        hex(0x93E9BE),
        hex(0xFFD1DC),
    ];

    /// Fill for a brick tier; out-of-range tiers use the nearest one
    pub fn brick(tier: u8) -> Color {
        BRICK_TIERS[(tier.clamp(1, 5) - 1) as usize]
    }
}
