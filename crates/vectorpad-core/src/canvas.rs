//! Shape collection with insertion-order z-order.

use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// All shapes on the canvas, keyed by id, drawn back to front in `z_order`.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front); insertion order.
    z_order: Vec<ShapeId>,
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of everything else.
    pub fn add_shape(&mut self, shape: Shape) {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn z_order(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Topmost shape under a point.
    pub fn topmost_at(&self, point: Point) -> Option<ShapeId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .is_some_and(|s| s.hit_test(point, 0.0))
        })
    }

    /// Shapes touching a rectangle (canvas space), in z-order.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .filter(|id| {
                self.shapes
                    .get(id)
                    .is_some_and(|s| s.intersects_rect(rect))
            })
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}
