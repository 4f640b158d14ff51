//! Pointer tool: select, move, pan, handle drags and rubber-band selection.

use super::{CursorHint, PointerDrag, ToolState};
use crate::editor::Editor;
use crate::geometry::{rect_intersection, segments_intersect};
use crate::handles::{HandleId, QuadHandle};
use crate::input::Modifiers;
use crate::shapes::Shape;
use crate::transform::{self, ReleaseOutcome};
use kurbo::{Point, Vec2};

impl Editor {
    pub(crate) fn pointer_down(&mut self, window: Point, click_count: u32) {
        if self.input.modifiers.rubber_band() {
            self.begin_rubber_band(window);
            return;
        }

        let point = self.to_canvas(window);
        if click_count > 1 && self.selection.len() == 1 {
            self.insert_vertex_at(point);
            return;
        }

        if let Some(id) = self.handles.hit_test(point).map(|h| h.id) {
            self.cursor = self.handle_cursor(id);
            self.state = ToolState::Dragging(PointerDrag::Handle(id));
            return;
        }

        match self.document.topmost_at(point) {
            Some(id) => {
                if !self.selection.contains(id) {
                    self.select_shape(Some(id));
                }
                self.state = ToolState::Dragging(PointerDrag::Move);
                self.cursor = CursorHint::Move;
            }
            None => {
                self.select_shape(None);
                self.state = ToolState::Dragging(PointerDrag::Pan);
                self.cursor = CursorHint::Pan;
            }
        }
    }

    pub(crate) fn pointer_move(&mut self, window: Point) {
        let ToolState::Dragging(drag) = self.state else {
            return;
        };
        match drag {
            PointerDrag::RubberBand { anchor, .. } => {
                self.state = ToolState::Dragging(PointerDrag::RubberBand {
                    anchor,
                    current: window,
                });
                self.update_rubber_band_selection();
            }
            PointerDrag::Handle(id) => self.drag_handle(id),
            PointerDrag::Move => self.move_selection(self.input.delta()),
            PointerDrag::Pan => {
                if self.canvas_rect().contains(window) {
                    self.set_canvas_offset(self.canvas_offset + self.input.delta());
                }
            }
        }
    }

    pub(crate) fn pointer_up(&mut self) {
        if let Some(id) = self.state.dragged_handle() {
            self.release_handle(id);
        }
        self.end_pointer_drag();
    }

    /// Pressing the rubber-band modifier mid-drag starts a band at the
    /// cursor; releasing it ends whatever drag is running.
    pub(crate) fn pointer_modifiers_changed(&mut self, previous: Modifiers, current: Modifiers) {
        match (previous.rubber_band(), current.rubber_band()) {
            (false, true) if self.input.primary_pressed => {
                self.begin_rubber_band(self.input.pointer_position);
            }
            (true, false) => self.end_pointer_drag(),
            _ => {}
        }
    }

    fn end_pointer_drag(&mut self) {
        self.state = ToolState::Idle;
        self.cursor = CursorHint::Default;
    }

    fn begin_rubber_band(&mut self, window: Point) {
        self.state = ToolState::Dragging(PointerDrag::RubberBand {
            anchor: window,
            current: window,
        });
        self.cursor = CursorHint::Default;
        self.select_shapes(&[]);
    }

    /// Select whatever the band touches inside the canvas.
    fn update_rubber_band_selection(&mut self) {
        let Some(band) = self.state.rubber_band() else {
            return;
        };
        let hits = match rect_intersection(band, self.canvas_rect()) {
            Some(clip) => self.document.shapes_in_rect(clip - self.canvas_offset),
            None => Vec::new(),
        };
        if hits.as_slice() != self.selection.ids() {
            self.select_shapes(&hits);
        }
    }

    fn move_selection(&mut self, delta: Vec2) {
        if self.selection.is_empty() {
            return;
        }
        for id in self.selection.iter() {
            if let Some(shape) = self.document.get_shape_mut(id) {
                transform::translate(shape, delta);
            }
        }
        self.refresh_handles();
    }

    /// Apply the last pointer step to the dragged handle, then find the
    /// handle again by id in the fresh projection.
    fn drag_handle(&mut self, id: HandleId) {
        let previous = self.to_canvas(self.input.previous_pointer_position);
        let current = self.to_canvas(self.input.pointer_position);
        let Some(shape) = self
            .handles
            .source()
            .and_then(|source| self.document.get_shape_mut(source))
        else {
            self.end_pointer_drag();
            return;
        };

        let moved = transform::drag_handle(shape, id, previous, current);
        self.handles.set_source(Some(&*shape));
        if !moved || self.handles.get(id).is_none() {
            log::debug!("Handle {} is gone; ending drag", id.0);
            self.end_pointer_drag();
        }
    }

    /// Merge coincident polyline vertices, or delete a shape that collapsed.
    fn release_handle(&mut self, id: HandleId) {
        let Some(source) = self.handles.source() else {
            return;
        };
        let Some(shape) = self.document.get_shape_mut(source) else {
            return;
        };

        let outcome = transform::release_outcome(shape, &self.handles, id);
        if outcome == ReleaseOutcome::Keep {
            return;
        }
        if transform::apply_release(shape, &outcome) {
            log::debug!("Shape {} collapsed on release; deleting", source);
            self.remove_shape(source);
            self.select_shape(None);
        } else {
            log::debug!("Merged vertices {:?} of {}", outcome, source);
            self.refresh_handles();
        }
    }

    /// Double click on the selected polyline: split the segment under the
    /// click. Both diagonals of a small square around the click are probed,
    /// topmost segment first.
    fn insert_vertex_at(&mut self, point: Point) {
        let Some(id) = self.selection.single() else {
            return;
        };
        let m = self.settings.insert_margin;
        let diagonals = [
            (point + Vec2::new(-m, -m), point + Vec2::new(m, m)),
            (point + Vec2::new(-m, m), point + Vec2::new(m, -m)),
        ];
        let Some(line) = self
            .document
            .get_shape_mut(id)
            .and_then(Shape::as_polyline_mut)
        else {
            return;
        };

        let segment = (1..line.len()).rev().find(|&i| {
            let (a, b) = (line.points[i - 1], line.points[i]);
            diagonals
                .iter()
                .any(|&(p, q)| segments_intersect(a, b, p, q))
        });
        if let Some(index) = segment {
            line.insert_point(index, point);
            log::debug!("Inserted vertex {} into {}", index, id);
            self.refresh_handles();
        }
    }

    fn handle_cursor(&self, id: HandleId) -> CursorHint {
        let is_quad = self
            .handles
            .source()
            .and_then(|source| self.document.get_shape(source))
            .is_some_and(|shape| shape.as_quad().is_some());
        if is_quad && QuadHandle::from_id(id) == Some(QuadHandle::Center) {
            CursorHint::RotateHorizontal
        } else {
            CursorHint::Move
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::Editor;
    use crate::handles::{HandleId, QuadHandle};
    use crate::input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
    use crate::shapes::{Polyline, Quad, ShapeTag};
    use crate::tools::{CursorHint, PointerDrag, ToolState};
    use kurbo::{Point, Vec2};

    fn editor() -> Editor {
        let mut editor = Editor::default();
        editor.set_canvas_offset(Vec2::ZERO);
        editor
    }

    fn drag(editor: &mut Editor, from: Point, to: Point) {
        editor.handle_pointer(PointerEvent::down(from));
        editor.handle_pointer(PointerEvent::moved(to));
        editor.handle_pointer(PointerEvent::up(to));
    }

    #[test]
    fn test_click_selects_and_drag_moves() {
        let mut editor = editor();
        let id = editor.add_shape(
            Quad::from_drag(Point::new(10.0, 10.0), Point::new(50.0, 50.0)).into(),
        );

        drag(&mut editor, Point::new(30.0, 30.0), Point::new(40.0, 35.0));
        assert_eq!(editor.selection().ids(), &[id]);
        let quad = editor.document().get_shape(id).unwrap().as_quad().unwrap();
        assert_eq!(quad.points[0], Point::new(20.0, 15.0));
        // Handles follow the shape.
        let center = editor.handles().get(QuadHandle::Center.id()).unwrap();
        assert_eq!(center.position, Point::new(40.0, 35.0));
        assert_eq!(editor.tool_state(), &ToolState::Idle);
    }

    #[test]
    fn test_empty_click_pans_and_deselects() {
        let mut editor = editor();
        let id = editor.add_shape(
            Quad::from_drag(Point::new(10.0, 10.0), Point::new(50.0, 50.0)).into(),
        );
        editor.select_shape(Some(id));

        editor.handle_pointer(PointerEvent::down(Point::new(300.0, 300.0)));
        assert!(editor.selection().is_empty());
        assert_eq!(editor.cursor(), CursorHint::Pan);
        editor.handle_pointer(PointerEvent::moved(Point::new(320.0, 290.0)));
        assert_eq!(editor.canvas_offset(), Vec2::new(20.0, -10.0));
        editor.handle_pointer(PointerEvent::up(Point::new(320.0, 290.0)));
        assert_eq!(editor.cursor(), CursorHint::Default);
    }

    #[test]
    fn test_center_handle_rotates() {
        let mut editor = editor();
        let id = editor.add_shape(
            Quad::from_drag(Point::new(0.0, 0.0), Point::new(40.0, 40.0)).into(),
        );
        editor.select_shape(Some(id));

        editor.handle_pointer(PointerEvent::down(Point::new(20.0, 20.0)));
        assert_eq!(editor.dragged_handle(), Some(QuadHandle::Center.id()));
        assert_eq!(editor.cursor(), CursorHint::RotateHorizontal);
        editor.handle_pointer(PointerEvent::moved(Point::new(110.0, 20.0)));
        let quad = editor.document().get_shape(id).unwrap().as_quad().unwrap();
        // 90 degrees about (20, 20).
        assert!((quad.points[0].x - 40.0).abs() < 1e-9);
        assert!(quad.points[0].y.abs() < 1e-9);
        assert_eq!(editor.dragged_handle(), Some(QuadHandle::Center.id()));
    }

    #[test]
    fn test_rubber_band_selects_and_clips_to_canvas() {
        let mut editor = editor();
        let a = editor.add_shape(
            Quad::from_drag(Point::new(10.0, 10.0), Point::new(30.0, 30.0)).into(),
        );
        let b = editor.add_shape(
            Polyline::segment(Point::new(100.0, 100.0), Point::new(140.0, 100.0)).into(),
        );

        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(-50.0, -50.0),
            button: MouseButton::Left,
            click_count: 1,
            modifiers: Modifiers::SHIFT,
        });
        editor.handle_pointer(PointerEvent::moved(Point::new(20.0, 20.0)));
        assert_eq!(editor.selection().ids(), &[a]);
        assert!(editor.rubber_band().is_some());

        editor.handle_pointer(PointerEvent::moved(Point::new(120.0, 120.0)));
        assert_eq!(editor.selection().ids(), &[a, b]);
        assert!(editor.handles().is_empty());

        editor.handle_key(KeyEvent::ModifiersChanged(Modifiers::default()));
        assert!(editor.rubber_band().is_none());
        assert_eq!(editor.selection().len(), 2);
    }

    #[test]
    fn test_band_outside_canvas_selects_nothing() {
        let mut editor = editor();
        let id = editor.add_shape(
            Quad::from_drag(Point::new(10.0, 10.0), Point::new(30.0, 30.0)).into(),
        );
        editor.select_shape(Some(id));

        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(-90.0, -90.0),
            button: MouseButton::Left,
            click_count: 1,
            modifiers: Modifiers::SHIFT,
        });
        editor.handle_pointer(PointerEvent::moved(Point::new(-40.0, -40.0)));
        assert!(editor.selection().is_empty());
        assert!(!editor.document().get_shape(id).unwrap().tag().contains(ShapeTag::SELECT));
    }

    #[test]
    fn test_shift_pressed_mid_drag_starts_band() {
        let mut editor = editor();
        let id = editor.add_shape(
            Quad::from_drag(Point::new(10.0, 10.0), Point::new(30.0, 30.0)).into(),
        );

        editor.handle_pointer(PointerEvent::down(Point::new(20.0, 20.0)));
        assert_eq!(editor.selection().ids(), &[id]);
        editor.handle_key(KeyEvent::ModifiersChanged(Modifiers::SHIFT));
        assert!(editor.selection().is_empty());
        assert!(matches!(
            editor.tool_state(),
            ToolState::Dragging(PointerDrag::RubberBand { .. })
        ));
        editor.handle_pointer(PointerEvent::moved(Point::new(25.0, 25.0)));
        assert_eq!(editor.selection().ids(), &[id]);
    }

    #[test]
    fn test_double_click_inserts_vertex() {
        let mut editor = editor();
        let id = editor.add_shape(
            Polyline::segment(Point::new(0.0, 50.0), Point::new(100.0, 50.0)).into(),
        );
        editor.select_shape(Some(id));

        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(40.0, 51.0),
            button: MouseButton::Left,
            click_count: 2,
            modifiers: Modifiers::default(),
        });
        let line = editor.document().get_shape(id).unwrap().as_polyline().unwrap();
        assert_eq!(line.len(), 3);
        assert_eq!(line.point(1), Some(Point::new(40.0, 51.0)));
        assert_eq!(editor.handles().len(), 3);
        assert_eq!(editor.tool_state(), &ToolState::Idle);
    }

    #[test]
    fn test_merge_on_release() {
        let mut editor = editor();
        let line = Polyline::from_points(
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(200.0, 0.0),
            ],
            Default::default(),
        )
        .unwrap();
        let id = editor.add_shape(line.into());
        editor.select_shape(Some(id));

        // Drag vertex 3 onto vertex 2.
        drag(&mut editor, Point::new(200.0, 0.0), Point::new(104.0, 2.0));
        let line = editor.document().get_shape(id).unwrap().as_polyline().unwrap();
        assert_eq!(line.len(), 2);
        assert_eq!(line.point(1), Some(Point::new(104.0, 2.0)));
        assert_eq!(editor.handles().len(), 2);

        // Collapse the remaining segment.
        drag(&mut editor, Point::new(104.0, 2.0), Point::new(1.0, 1.0));
        assert!(editor.document().is_empty());
        assert!(editor.selection().is_empty());
        assert!(editor.handles().is_empty());
    }

    #[test]
    fn test_stale_handle_ends_drag() {
        let mut editor = editor();
        let id = editor.add_shape(Polyline::segment(Point::ZERO, Point::new(100.0, 0.0)).into());
        editor.select_shape(Some(id));
        editor.handle_pointer(PointerEvent::down(Point::new(100.0, 0.0)));
        assert_eq!(editor.dragged_handle(), Some(HandleId(2)));

        editor.remove_shape(id);
        editor.handle_pointer(PointerEvent::moved(Point::new(120.0, 10.0)));
        assert_eq!(editor.dragged_handle(), None);
    }
}
