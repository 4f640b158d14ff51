//! Geometry kernel: segment intersection, separating-axis overlap and
//! proximity tests used by hit testing and rubber-band selection.

use kurbo::{Point, Rect, Vec2};

/// Parametric segment/segment intersection test.
///
/// Parallel segments (zero cross product of the direction vectors) never
/// intersect, even when collinear and overlapping. Both intersection
/// parameters must lie in `[0, 1]`.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let v1 = p2 - p1;
    let v2 = p4 - p3;

    let denom = v1.cross(v2);
    if denom == 0.0 {
        return false;
    }

    let c = p3 - p1;
    let t = c.cross(v2) / denom;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }

    let u = c.cross(v1) / denom;
    (0.0..=1.0).contains(&u)
}

/// Separating-axis overlap test between a quad and a selection rectangle,
/// both given as four corners in winding order.
///
/// Returns `true` when no edge of either shape separates the two point sets.
pub fn quad_overlaps_rect(quad: &[Point; 4], rect: &[Point; 4]) -> bool {
    !(axis_separates(quad[0], quad[1], quad[2], rect)
        || axis_separates(quad[0], quad[3], quad[2], rect)
        || axis_separates(quad[3], quad[2], quad[0], rect)
        || axis_separates(quad[2], quad[1], quad[0], rect)
        || axis_separates(rect[0], rect[1], rect[2], quad)
        || axis_separates(rect[0], rect[3], rect[2], quad)
        || axis_separates(rect[3], rect[2], rect[0], quad)
        || axis_separates(rect[2], rect[1], rect[0], quad))
}

/// Checks whether the edge `origin -> end` separates `reference` from every
/// point in `others`.
///
/// Sides are classified by the sign of the dot product with the edge normal;
/// a point on the edge line counts as the non-negative side.
fn axis_separates(origin: Point, end: Point, reference: Point, others: &[Point]) -> bool {
    let edge = end - origin;
    let normal = Vec2::new(-edge.y, edge.x);

    let reference_side = normal.dot(reference - origin) >= 0.0;
    others
        .iter()
        .all(|&p| (normal.dot(p - origin) >= 0.0) != reference_side)
}

/// Test whether a polyline touches a rectangle.
///
/// A polyline overlaps when any vertex lies inside the rectangle (edges
/// inclusive), when an axis-aligned segment runs within the rectangle's span,
/// or when a segment crosses one of the rectangle's sides.
pub fn polyline_overlaps_rect(points: &[Point], rect: Rect) -> bool {
    let [tl, tr, br, bl] = rect_corners(rect);

    points.windows(2).any(|w| {
        let (a, b) = (w[0], w[1]);
        rect_contains_inclusive(rect, a)
            || rect_contains_inclusive(rect, b)
            || (a.x == b.x
                && a.x >= rect.x0
                && a.x <= rect.x1
                && a.y.max(b.y) >= rect.y0
                && a.y.min(b.y) <= rect.y1)
            || (a.y == b.y
                && a.y >= rect.y0
                && a.y <= rect.y1
                && a.x.max(b.x) >= rect.x0
                && a.x.min(b.x) <= rect.x1)
            || segments_intersect(tl, bl, a, b)
            || segments_intersect(tl, tr, a, b)
            || segments_intersect(tr, br, a, b)
            || segments_intersect(bl, br, a, b)
    })
}

/// Square proximity test: both axis distances are within `tolerance`.
pub fn points_near(a: Point, b: Point, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

/// Corners of a rectangle as TopLeft, TopRight, BottomRight, BottomLeft.
pub fn rect_corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// `Rect::contains` is half-open; selection needs all four edges inclusive.
pub fn rect_contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Overlap of two rectangles, or `None` when they are disjoint.
///
/// Touching edges yield a zero-area rectangle rather than `None`.
pub fn rect_intersection(a: Rect, b: Rect) -> Option<Rect> {
    let (a, b) = (a.abs(), b.abs());
    let x0 = a.x0.max(b.x0);
    let y0 = a.y0.max(b.y0);
    let x1 = a.x1.min(b.x1);
    let y1 = a.y1.min(b.y1);
    (x0 <= x1 && y0 <= y1).then(|| Rect::new(x0, y0, x1, y1))
}

/// Signed angle in degrees from `from` to `to` (positive is clockwise on a
/// y-down canvas).
pub fn signed_angle_degrees(from: Vec2, to: Vec2) -> f64 {
    from.cross(to).atan2(from.dot(to)).to_degrees()
}

/// Rotate a vector by `degrees` about the origin.
pub fn rotate_vec(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}

/// Axis-aligned bounds of a point list, or `None` when empty.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let first = *points.first()?;
    Some(
        points[1..]
            .iter()
            .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)),
    )
}
