//! Handle projection: the draggable control points derived from a shape.

use crate::geometry::points_near;
use crate::shapes::{Polyline, Quad, Shape, ShapeId};
use kurbo::Point;

/// Handle size for a shape without stroke, in canvas pixels.
pub const BASE_HANDLE_SIZE: f64 = 9.0;

/// Ordinal handle id. Quads use `0..=8` (see [`QuadHandle`]); polylines use
/// `1..=N`, one per vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u32);

impl HandleId {
    /// Vertex index of a polyline handle.
    pub fn vertex_index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    pub fn from_vertex_index(index: usize) -> Self {
        HandleId(index as u32 + 1)
    }
}

/// Named positions of the nine quad handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadHandle {
    Center = 0,
    TopLeft = 1,
    Top = 2,
    TopRight = 3,
    Right = 4,
    BottomRight = 5,
    Bottom = 6,
    BottomLeft = 7,
    Left = 8,
}

impl QuadHandle {
    /// All handles in projection order.
    pub const ALL: [QuadHandle; 9] = [
        QuadHandle::Center,
        QuadHandle::TopLeft,
        QuadHandle::Top,
        QuadHandle::TopRight,
        QuadHandle::Right,
        QuadHandle::BottomRight,
        QuadHandle::Bottom,
        QuadHandle::BottomLeft,
        QuadHandle::Left,
    ];

    pub fn from_id(id: HandleId) -> Option<Self> {
        Self::ALL.get(id.0 as usize).copied()
    }

    pub fn id(self) -> HandleId {
        HandleId(self as u32)
    }
}

/// A handle with its owner and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub id: HandleId,
    /// Back-reference to the shape this handle was projected from.
    pub owner: ShapeId,
    /// Position in canvas coordinates.
    pub position: Point,
}

impl Handle {
    pub fn new(id: HandleId, owner: ShapeId, position: Point) -> Self {
        Self {
            id,
            owner,
            position,
        }
    }

    /// Square hit test: the point lies within `size / 2` on both axes.
    pub fn hit_test(&self, point: Point, size: f64) -> bool {
        points_near(point, self.position, size / 2.0)
    }
}

/// The nine quad handles: center, then corners and edge midpoints clockwise
/// from the top-left.
pub fn quad_handles(quad: &Quad, owner: ShapeId) -> Vec<Handle> {
    let [p0, p1, p2, p3] = quad.points;
    let [top, right, bottom, left] = quad.edge_midpoints();
    let positions = [quad.center(), p0, top, p1, right, p2, bottom, p3, left];
    QuadHandle::ALL
        .iter()
        .zip(positions)
        .map(|(h, pos)| Handle::new(h.id(), owner, pos))
        .collect()
}

/// One handle per vertex, ids `1..=N`.
pub fn polyline_handles(line: &Polyline, owner: ShapeId) -> Vec<Handle> {
    (0..line.len())
        .filter_map(|i| line.point(i).map(|p| (i, p)))
        .map(|(i, p)| Handle::new(HandleId::from_vertex_index(i), owner, p))
        .collect()
}

/// Project the handles of any shape.
pub fn project_handles(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Quad(q) => quad_handles(q, shape.id()),
        Shape::Polyline(l) => polyline_handles(l, shape.id()),
    }
}

/// Handle set for the current handle source.
///
/// Never updated incrementally: every change of the source shape goes
/// through [`HandleSet::set_source`], which rebuilds from scratch.
#[derive(Debug, Clone)]
pub struct HandleSet {
    base_size: f64,
    source: Option<ShapeId>,
    handle_size: f64,
    handles: Vec<Handle>,
}

impl Default for HandleSet {
    fn default() -> Self {
        Self::new(BASE_HANDLE_SIZE)
    }
}

impl HandleSet {
    pub fn new(base_size: f64) -> Self {
        Self {
            base_size,
            source: None,
            handle_size: base_size,
            handles: Vec::new(),
        }
    }

    /// Replace the source shape (or clear it) and recompute every handle.
    pub fn set_source(&mut self, shape: Option<&Shape>) {
        self.handles.clear();
        match shape {
            Some(shape) => {
                self.source = Some(shape.id());
                self.handle_size = self.base_size + shape.stroke_width().unwrap_or(0.0);
                self.handles = project_handles(shape);
            }
            None => {
                self.source = None;
                self.handle_size = self.base_size;
            }
        }
    }

    pub fn clear(&mut self) {
        self.set_source(None);
    }

    pub fn source(&self) -> Option<ShapeId> {
        self.source
    }

    /// Side of the square a handle occupies: base size plus stroke width.
    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn get(&self, id: HandleId) -> Option<&Handle> {
        self.handles.iter().find(|h| h.id == id)
    }

    /// Topmost handle under `point`; later handles win.
    pub fn hit_test(&self, point: Point) -> Option<&Handle> {
        self.handles
            .iter()
            .rev()
            .find(|h| h.hit_test(point, self.handle_size))
    }

    /// Handles with an adjacent id that sit within one handle size of `id`.
    pub fn near_neighbors(&self, id: HandleId) -> Vec<HandleId> {
        let Some(dragged) = self.get(id) else {
            return Vec::new();
        };
        self.handles
            .iter()
            .filter(|h| h.id.0.abs_diff(id.0) == 1)
            .filter(|h| points_near(h.position, dragged.position, self.handle_size))
            .map(|h| h.id)
            .collect()
    }

    /// True when every handle sits on the handle `id` within `tolerance`.
    pub fn all_coincide(&self, id: HandleId, tolerance: f64) -> bool {
        let Some(dragged) = self.get(id) else {
            return false;
        };
        self.handles
            .iter()
            .all(|h| points_near(h.position, dragged.position, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Brush, PolylineStyle};

    fn diamond() -> Shape {
        Quad::new(
            [
                Point::new(10.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(10.0, 20.0),
                Point::new(0.0, 10.0),
            ],
            Brush::default(),
        )
        .into()
    }

    #[test]
    fn test_quad_handles_ids_and_center() {
        let shape = diamond();
        let handles = project_handles(&shape);
        assert_eq!(handles.len(), 9);
        let ids: Vec<u32> = handles.iter().map(|h| h.id.0).collect();
        assert_eq!(ids, (0..9).collect::<Vec<_>>());

        let q = shape.as_quad().unwrap();
        let [p0, p1, p2, p3] = q.points;
        let expected = p0.midpoint(p2).midpoint(p1.midpoint(p3));
        assert_eq!(handles[0].position, expected);
        assert_eq!(handles[QuadHandle::TopRight as usize].position, p1);
        assert_eq!(handles[QuadHandle::Right as usize].position, p1.midpoint(p2));
        assert!(handles.iter().all(|h| h.owner == shape.id()));
    }

    #[test]
    fn test_polyline_handles_follow_vertices() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
        ];
        let shape: Shape = Polyline::from_points(pts.clone(), PolylineStyle::default())
            .unwrap()
            .into();
        let handles = project_handles(&shape);
        assert_eq!(handles.len(), 3);
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(h.id, HandleId(i as u32 + 1));
            assert_eq!(h.position, pts[i]);
            assert_eq!(h.id.vertex_index(), Some(i));
        }
    }

    #[test]
    fn test_handle_size_includes_stroke() {
        let mut line = Polyline::segment(Point::ZERO, Point::new(50.0, 0.0));
        line.style.set_width(5.0);
        let mut set = HandleSet::default();
        set.set_source(Some(&line.into()));
        assert_eq!(set.handle_size(), 14.0);

        set.set_source(Some(&diamond()));
        assert_eq!(set.handle_size(), BASE_HANDLE_SIZE);

        set.clear();
        assert!(set.is_empty());
        assert!(set.source().is_none());
    }

    #[test]
    fn test_hit_test_prefers_last() {
        // A degenerate quad: every handle at the same spot.
        let shape: Shape = Quad::new([Point::new(5.0, 5.0); 4], Brush::default()).into();
        let mut set = HandleSet::default();
        set.set_source(Some(&shape));
        let hit = set.hit_test(Point::new(7.0, 7.0)).unwrap();
        assert_eq!(QuadHandle::from_id(hit.id), Some(QuadHandle::Left));
        assert!(set.hit_test(Point::new(10.0, 5.0)).is_none());
        assert!(set.all_coincide(QuadHandle::Center.id(), 1e-9));
    }

    #[test]
    fn test_near_neighbors() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(52.0, 1.0),
            Point::new(100.0, 0.0),
        ];
        let shape: Shape = Polyline::from_points(pts, PolylineStyle::default())
            .unwrap()
            .into();
        let mut set = HandleSet::default();
        set.set_source(Some(&shape));
        assert_eq!(set.near_neighbors(HandleId(3)), vec![HandleId(2)]);
        assert!(set.near_neighbors(HandleId(1)).is_empty());
        assert!(set.near_neighbors(HandleId(42)).is_empty());
    }

    #[test]
    fn test_quad_handle_from_id() {
        assert_eq!(QuadHandle::from_id(HandleId(0)), Some(QuadHandle::Center));
        assert_eq!(QuadHandle::from_id(HandleId(8)), Some(QuadHandle::Left));
        assert_eq!(QuadHandle::from_id(HandleId(9)), None);
    }
}
