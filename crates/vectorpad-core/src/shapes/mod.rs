//! Shape definitions for the canvas.

mod brush;
mod polyline;
mod quad;

pub use brush::{Brush, ColorParseError, GradientStop, LinearGradient, ShapeColor};
pub use polyline::{Polyline, PolylineStyle};
pub use quad::{Quad, QuadStyle};

use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::ops::BitOr;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Per-shape render-state bits. Orthogonal to geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ShapeTag(u8);

impl ShapeTag {
    pub const NONE: ShapeTag = ShapeTag(0);
    pub const SELECT: ShapeTag = ShapeTag(1);
    pub const DELETING: ShapeTag = ShapeTag(4);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: ShapeTag) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ShapeTag) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: ShapeTag) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ShapeTag {
    type Output = ShapeTag;

    fn bitor(self, rhs: ShapeTag) -> ShapeTag {
        ShapeTag(self.0 | rhs.0)
    }
}

/// How a renderer should decorate a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Normal,
    Selected,
    /// Hatched: the delete tool is hovering it.
    Deleting,
    SelectedDeleting,
}

impl From<ShapeTag> for RenderState {
    fn from(tag: ShapeTag) -> Self {
        match (tag.contains(ShapeTag::SELECT), tag.contains(ShapeTag::DELETING)) {
            (false, false) => RenderState::Normal,
            (true, false) => RenderState::Selected,
            (false, true) => RenderState::Deleting,
            (true, true) => RenderState::SelectedDeleting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Quad,
    Polyline,
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common trait for both shape variants.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in canvas coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Apply a transform to every point of this shape.
    fn transform(&mut self, affine: Affine);

    /// Geometry points in order.
    fn points(&self) -> &[Point];
}

/// Enum wrapper for the two shape variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Quad(Quad),
    Polyline(Polyline),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Quad(s) => s.id(),
            Shape::Polyline(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Quad(_) => ShapeKind::Quad,
            Shape::Polyline(_) => ShapeKind::Polyline,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Quad(s) => s.bounds(),
            Shape::Polyline(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Quad(s) => s.hit_test(point, tolerance),
            Shape::Polyline(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Quad(s) => s.to_path(),
            Shape::Polyline(s) => s.to_path(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Quad(s) => s.transform(affine),
            Shape::Polyline(s) => s.transform(affine),
        }
    }

    pub fn points(&self) -> &[Point] {
        match self {
            Shape::Quad(s) => s.points(),
            Shape::Polyline(s) => s.points(),
        }
    }

    /// Test if this shape touches a selection rectangle (canvas space).
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        match self {
            Shape::Quad(q) => crate::geometry::quad_overlaps_rect(
                &q.points,
                &crate::geometry::rect_corners(rect),
            ),
            Shape::Polyline(l) => crate::geometry::polyline_overlaps_rect(&l.points, rect),
        }
    }

    /// Fill brush for quads, stroke brush for polylines.
    pub fn brush(&self) -> Brush {
        match self {
            Shape::Quad(q) => q.style.fill,
            Shape::Polyline(l) => l.style.stroke,
        }
    }

    /// Stroke width, or `None` for quads (drawn without an outline).
    pub fn stroke_width(&self) -> Option<f64> {
        match self {
            Shape::Quad(_) => None,
            Shape::Polyline(l) => Some(l.style.width),
        }
    }

    /// Apply the editor's current brush and width to this shape's own style record.
    pub fn apply_style(&mut self, brush: Brush, width: f64) {
        match self {
            Shape::Quad(q) => q.style.fill = brush,
            Shape::Polyline(l) => {
                l.style.stroke = brush;
                l.style.set_width(width);
            }
        }
    }

    pub fn tag(&self) -> ShapeTag {
        match self {
            Shape::Quad(q) => q.tag,
            Shape::Polyline(l) => l.tag,
        }
    }

    pub fn tag_mut(&mut self) -> &mut ShapeTag {
        match self {
            Shape::Quad(q) => &mut q.tag,
            Shape::Polyline(l) => &mut l.tag,
        }
    }

    pub fn render_state(&self) -> RenderState {
        self.tag().into()
    }

    pub fn as_quad(&self) -> Option<&Quad> {
        match self {
            Shape::Quad(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Shape::Polyline(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_polyline_mut(&mut self) -> Option<&mut Polyline> {
        match self {
            Shape::Polyline(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Quad> for Shape {
    fn from(q: Quad) -> Self {
        Shape::Quad(q)
    }
}

impl From<Polyline> for Shape {
    fn from(l: Polyline) -> Self {
        Shape::Polyline(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_bits() {
        let mut tag = ShapeTag::NONE;
        assert!(tag.is_empty());
        tag.insert(ShapeTag::SELECT);
        tag.insert(ShapeTag::DELETING);
        assert_eq!(tag, ShapeTag::SELECT | ShapeTag::DELETING);
        assert_eq!(tag.bits(), 5);
        tag.remove(ShapeTag::SELECT);
        assert!(!tag.contains(ShapeTag::SELECT));
        assert!(tag.contains(ShapeTag::DELETING));
    }

    #[test]
    fn test_render_state_from_tag() {
        assert_eq!(RenderState::from(ShapeTag::NONE), RenderState::Normal);
        assert_eq!(RenderState::from(ShapeTag::SELECT), RenderState::Selected);
        assert_eq!(RenderState::from(ShapeTag::DELETING), RenderState::Deleting);
        assert_eq!(
            RenderState::from(ShapeTag::SELECT | ShapeTag::DELETING),
            RenderState::SelectedDeleting
        );
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((point_to_segment_dist(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        // Degenerate segment.
        assert!((point_to_segment_dist(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_style_is_variant_specific() {
        let red = Brush::solid(ShapeColor::new(255, 0, 0, 255));

        let mut quad: Shape = Quad::from_drag(Point::ZERO, Point::new(10.0, 10.0)).into();
        quad.apply_style(red, 8.0);
        assert_eq!(quad.brush(), red);
        assert_eq!(quad.stroke_width(), None);

        let mut line: Shape = Polyline::segment(Point::ZERO, Point::new(10.0, 0.0)).into();
        line.apply_style(red, 1.0);
        assert_eq!(line.brush(), red);
        assert_eq!(line.stroke_width(), Some(PolylineStyle::MIN_WIDTH));
    }
}
