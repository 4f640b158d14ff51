//! Polyline shape: straight segments through an ordered vertex list.

use super::{Brush, ShapeId, ShapeTag, ShapeTrait, point_to_polyline_dist};
use crate::geometry::points_bounds;
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stroke style record for polylines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolylineStyle {
    pub stroke: Brush,
    pub width: f64,
}

impl PolylineStyle {
    pub const MIN_WIDTH: f64 = 3.0;

    pub fn new(stroke: Brush, width: f64) -> Self {
        Self {
            stroke,
            width: width.max(Self::MIN_WIDTH),
        }
    }

    /// Set the width, clamped to [`Self::MIN_WIDTH`].
    pub fn set_width(&mut self, width: f64) {
        self.width = width.max(Self::MIN_WIDTH);
    }
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self::new(Brush::default(), Self::MIN_WIDTH)
    }
}

/// An open polyline with at least two vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub(crate) id: ShapeId,
    pub(crate) points: Vec<Point>,
    pub style: PolylineStyle,
    #[serde(skip)]
    pub tag: ShapeTag,
}

impl Polyline {
    /// Build a polyline, or `None` if fewer than two points are given.
    pub fn from_points(points: Vec<Point>, style: PolylineStyle) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            points,
            style,
            tag: ShapeTag::NONE,
        })
    }

    /// A two-point line with the default style.
    pub fn segment(a: Point, b: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![a, b],
            style: PolylineStyle::default(),
            tag: ShapeTag::NONE,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a live polyline; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Move one vertex. Out-of-range indices are ignored.
    pub fn set_point(&mut self, index: usize, p: Point) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = p;
        }
    }

    /// Insert a vertex before `index` (clamped to the end).
    pub fn insert_point(&mut self, index: usize, p: Point) {
        let index = index.min(self.points.len());
        self.points.insert(index, p);
    }

    /// Remove the given vertex indices.
    ///
    /// Returns `false` and leaves the line untouched if fewer than two
    /// vertices would remain; the caller deletes the shape instead.
    pub fn remove_points(&mut self, indices: &[usize]) -> bool {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.points.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();
        if self.points.len() - sorted.len() < 2 {
            return false;
        }
        for &i in sorted.iter().rev() {
            self.points.remove(i);
        }
        true
    }

    /// Squared extent of the bounding box (`w² + h²`).
    pub fn extent_squared(&self) -> f64 {
        let b = self.bounds();
        b.width() * b.width() + b.height() * b.height()
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}

impl ShapeTrait for Polyline {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(&self.points).unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, &self.points) <= self.style.width / 2.0 + tolerance
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for &p in rest {
                path.line_to(p);
            }
        }
        path
    }

    fn transform(&mut self, affine: Affine) {
        for p in &mut self.points {
            *p = affine * *p;
        }
    }

    fn points(&self) -> &[Point] {
        &self.points
    }
}
