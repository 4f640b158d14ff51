//! Geometry mutations driven by handle drags: translate, vertex drag,
//! rotate and resize, plus the merge/collapse rules applied on release.

use crate::geometry::{midpoint, rotate_vec};
use crate::handles::{HandleId, HandleSet, QuadHandle};
use crate::shapes::{Polyline, Quad, Shape, ShapeTrait};
use kurbo::{Affine, Point, Vec2};

/// Tolerance for "all quad handles sit on one point".
pub const COLLAPSE_TOLERANCE: f64 = 1e-9;

/// Translate a shape by `delta`.
pub fn translate(shape: &mut Shape, delta: Vec2) {
    match shape {
        Shape::Quad(q) => q.translate(delta),
        Shape::Polyline(l) => l.translate(delta),
    }
}

/// Move one polyline vertex by `delta`. Segment lengths are unconstrained.
pub fn drag_vertex(line: &mut Polyline, index: usize, delta: Vec2) {
    if let Some(p) = line.point(index) {
        line.set_point(index, p + delta);
    }
}

/// Rotate a quad about `pivot` by `degrees` (positive is clockwise on screen).
pub fn rotate_quad(quad: &mut Quad, pivot: Point, degrees: f64) {
    quad.transform(Affine::rotate_about(degrees.to_radians(), pivot));
}

/// Rotation amount for a center-handle drag: horizontal mouse travel in degrees.
pub fn rotation_degrees(previous: Point, current: Point) -> f64 {
    current.x - previous.x
}

/// Scale about `anchor`.
fn scale_about(anchor: Point, sx: f64, sy: f64) -> Affine {
    let a = anchor.to_vec2();
    Affine::translate(a) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-a)
}

/// Resize a quad by dragging one of its eight edge or corner handles.
///
/// A rotated quad is first brought back to an axis-aligned top edge about its
/// center, resized in that frame, then rotated back about the same center.
/// A zero width or height cannot be scaled; on that axis the dragged side is
/// offset by the raw mouse delta instead.
pub fn resize_quad(quad: &mut Quad, handle: QuadHandle, previous: Point, current: Point) {
    let angle = quad.top_edge_angle();
    let pivot = quad.center();
    if angle != 0.0 {
        rotate_quad(quad, pivot, -angle);
    }

    let mv = rotate_vec(previous - current, -angle);
    let [mut p0, mut p1, mut p2, mut p3] = quad.points;
    let w = p1.x - p0.x;
    let h = p2.y - p1.y;

    let (sx, sy, anchor) = match handle {
        QuadHandle::Center => return,
        QuadHandle::Left => {
            let sx = if w == 0.0 {
                p0.x -= mv.x;
                p3.x -= mv.x;
                1.0
            } else {
                1.0 + mv.x / w
            };
            (sx, 1.0, midpoint(p1, p2))
        }
        QuadHandle::Right => {
            let sx = if w == 0.0 {
                p1.x -= mv.x;
                p2.x -= mv.x;
                1.0
            } else {
                1.0 + mv.x / -w
            };
            (sx, 1.0, midpoint(p0, p3))
        }
        QuadHandle::Top => {
            let sy = if h == 0.0 {
                p0.y -= mv.y;
                p1.y -= mv.y;
                1.0
            } else {
                1.0 + mv.y / h
            };
            (1.0, sy, midpoint(p2, p3))
        }
        QuadHandle::Bottom => {
            let sy = if h == 0.0 {
                p2.y -= mv.y;
                p3.y -= mv.y;
                1.0
            } else {
                1.0 + mv.y / -h
            };
            (1.0, sy, midpoint(p0, p1))
        }
        QuadHandle::TopLeft => {
            let sy = if h == 0.0 {
                p0.y -= mv.y;
                p1.y -= mv.y;
                1.0
            } else {
                1.0 + mv.y / h
            };
            let sx = if w == 0.0 {
                p0.x -= mv.x;
                p3.x -= mv.x;
                1.0
            } else {
                1.0 + mv.x / w
            };
            (sx, sy, p2)
        }
        QuadHandle::TopRight => {
            let sy = if h == 0.0 {
                p0.y -= mv.y;
                p1.y -= mv.y;
                1.0
            } else {
                1.0 + mv.y / h
            };
            let sx = if w == 0.0 {
                p1.x -= mv.x;
                p2.x -= mv.x;
                1.0
            } else {
                1.0 + mv.x / -w
            };
            (sx, sy, p3)
        }
        QuadHandle::BottomRight => {
            let sy = if h == 0.0 {
                p2.y -= mv.y;
                p3.y -= mv.y;
                1.0
            } else {
                1.0 + mv.y / -h
            };
            let sx = if w == 0.0 {
                p1.x -= mv.x;
                p2.x -= mv.x;
                1.0
            } else {
                1.0 + mv.x / -w
            };
            (sx, sy, p0)
        }
        QuadHandle::BottomLeft => {
            let sy = if h == 0.0 {
                p2.y -= mv.y;
                p3.y -= mv.y;
                1.0
            } else {
                1.0 + mv.y / -h
            };
            let sx = if w == 0.0 {
                p0.x -= mv.x;
                p3.x -= mv.x;
                1.0
            } else {
                1.0 + mv.x / w
            };
            (sx, sy, p1)
        }
    };

    quad.points = [p0, p1, p2, p3];
    quad.transform(scale_about(anchor, sx, sy));

    if angle != 0.0 {
        rotate_quad(quad, pivot, angle);
    }
}

/// Apply one drag step of handle `id` to its shape.
///
/// Returns `false` when `id` names no handle of this shape; the caller ends
/// the drag.
pub fn drag_handle(shape: &mut Shape, id: HandleId, previous: Point, current: Point) -> bool {
    match shape {
        Shape::Quad(q) => match QuadHandle::from_id(id) {
            Some(QuadHandle::Center) => {
                let pivot = q.center();
                rotate_quad(q, pivot, rotation_degrees(previous, current));
                true
            }
            Some(handle) => {
                resize_quad(q, handle, previous, current);
                true
            }
            None => false,
        },
        Shape::Polyline(l) => match id.vertex_index() {
            Some(index) if index < l.len() => {
                drag_vertex(l, index, current - previous);
                true
            }
            _ => false,
        },
    }
}

/// What releasing a dragged handle does to its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Keep,
    /// Remove these polyline vertex indices (merged into the dragged one).
    RemoveVertices(Vec<usize>),
    DeleteShape,
}

/// Decide the release outcome for `dragged` against freshly projected handles.
pub fn release_outcome(shape: &Shape, handles: &HandleSet, dragged: HandleId) -> ReleaseOutcome {
    match shape {
        Shape::Polyline(l) => {
            let neighbors = handles.near_neighbors(dragged);
            if neighbors.is_empty() {
                ReleaseOutcome::Keep
            } else if neighbors.len() >= l.len() - 1 {
                ReleaseOutcome::DeleteShape
            } else {
                let mut indices: Vec<usize> =
                    neighbors.iter().filter_map(|h| h.vertex_index()).collect();
                indices.sort_unstable_by(|a, b| b.cmp(a));
                ReleaseOutcome::RemoveVertices(indices)
            }
        }
        Shape::Quad(_) => {
            if handles.all_coincide(dragged, COLLAPSE_TOLERANCE) {
                ReleaseOutcome::DeleteShape
            } else {
                ReleaseOutcome::Keep
            }
        }
    }
}

/// Apply a release outcome. Returns `true` if the shape must be deleted.
pub fn apply_release(shape: &mut Shape, outcome: &ReleaseOutcome) -> bool {
    match outcome {
        ReleaseOutcome::Keep => false,
        ReleaseOutcome::DeleteShape => true,
        ReleaseOutcome::RemoveVertices(indices) => match shape {
            Shape::Polyline(l) => !l.remove_points(indices),
            Shape::Quad(_) => false,
        },
    }
}
