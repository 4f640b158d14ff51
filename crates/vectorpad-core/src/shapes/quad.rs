//! Quadrilateral shape.

use super::{Brush, ShapeId, ShapeTag, ShapeTrait};
use crate::geometry::{midpoint, signed_angle_degrees};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Style record for quads: a fill and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuadStyle {
    pub fill: Brush,
}

/// A closed four-corner shape.
///
/// Corners are stored TopLeft, TopRight, BottomRight, BottomLeft. The names
/// refer to the unrotated frame; after a rotation the winding is kept but the
/// corners may sit anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub(crate) id: ShapeId,
    pub points: [Point; 4],
    pub style: QuadStyle,
    #[serde(skip)]
    pub tag: ShapeTag,
}

impl Quad {
    pub fn new(points: [Point; 4], fill: Brush) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: QuadStyle { fill },
            tag: ShapeTag::NONE,
        }
    }

    /// Axis-aligned quad spanned by a drag from `anchor` to `cursor`.
    ///
    /// The anchor is always corner 0, so dragging up or left produces a
    /// mirrored (negatively sized) quad rather than a normalized one.
    pub fn from_drag(anchor: Point, cursor: Point) -> Self {
        let mut quad = Self::new([anchor; 4], Brush::default());
        quad.set_drag(anchor, cursor);
        quad
    }

    /// Re-span an in-progress quad from `anchor` to `cursor`.
    pub fn set_drag(&mut self, anchor: Point, cursor: Point) {
        self.points = [
            anchor,
            Point::new(cursor.x, anchor.y),
            cursor,
            Point::new(anchor.x, cursor.y),
        ];
    }

    /// Average of the two diagonal midpoints.
    pub fn center(&self) -> Point {
        let [p0, p1, p2, p3] = self.points;
        midpoint(midpoint(p0, p2), midpoint(p1, p3))
    }

    /// Midpoints of the top, right, bottom and left edges.
    pub fn edge_midpoints(&self) -> [Point; 4] {
        let [p0, p1, p2, p3] = self.points;
        [
            midpoint(p0, p1),
            midpoint(p1, p2),
            midpoint(p2, p3),
            midpoint(p3, p0),
        ]
    }

    /// Signed angle in degrees of the top edge relative to the x axis.
    pub fn top_edge_angle(&self) -> f64 {
        signed_angle_degrees(Vec2::new(1.0, 0.0), self.points[1] - self.points[0])
    }

    /// Translate every corner.
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}

impl ShapeTrait for Quad {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let [p0, p1, p2, p3] = self.points;
        Rect::from_points(p0, p2).union_pt(p1).union_pt(p3)
    }

    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        self.to_path().contains(point)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.points[0]);
        for &p in &self.points[1..] {
            path.line_to(p);
        }
        path.close_path();
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
