//! Headless surface that keeps shapes in memory
//!
//! Used by the native demo and by tests in place of a real canvas.

use std::collections::BTreeMap;

use super::{Geometry, ShapeHandle, ShapeKind, ShapeUpdate, Style, Surface};
use crate::sim::Aabb;

/// A shape as last drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub geometry: Geometry,
    pub style: Style,
}

#[derive(Debug, Clone)]
pub struct MemorySurface {
    width: f32,
    height: f32,
    shapes: BTreeMap<ShapeHandle, Shape>,
    next_handle: u64,
}

impl MemorySurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            shapes: BTreeMap::new(),
            next_handle: 1,
        }
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes of one kind, in creation order
    pub fn shapes_of(&self, kind: ShapeKind) -> impl Iterator<Item = &Shape> {
        self.shapes.values().filter(move |s| s.kind == kind)
    }

    /// All text currently on screen
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .values()
            .filter_map(|s| match &s.geometry {
                Geometry::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for MemorySurface {
    fn create_shape(&mut self, kind: ShapeKind, geometry: Geometry, style: &Style) -> ShapeHandle {
        let handle = ShapeHandle(self.next_handle);
        self.next_handle += 1;
        self.shapes.insert(
            handle,
            Shape {
                kind,
                geometry,
                style: style.clone(),
            },
        );
        handle
    }

    fn update_shape(&mut self, handle: ShapeHandle, update: ShapeUpdate) {
        let Some(shape) = self.shapes.get_mut(&handle) else {
            log::debug!("update of unknown shape {:?}", handle);
            return;
        };
        match update {
            ShapeUpdate::Geometry(geometry) => shape.geometry = geometry,
            ShapeUpdate::Text(new_text) => {
                if let Geometry::Text { text, .. } = &mut shape.geometry {
                    *text = new_text;
                }
            }
            ShapeUpdate::Fill(color) => shape.style.fill = Some(color),
        }
    }

    fn delete_shape(&mut self, handle: ShapeHandle) {
        self.shapes.remove(&handle);
    }

    fn query_bounds(&self, handle: ShapeHandle) -> Option<Aabb> {
        self.shapes.get(&handle).map(|s| s.geometry.bounds())
    }

    fn field_width(&self) -> f32 {
        self.width
    }

    fn field_height(&self) -> f32 {
        self.height
    }
}
