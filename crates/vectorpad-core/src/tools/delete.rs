//! Delete tool: hovering marks a shape, clicking removes it.

use super::{CursorHint, ToolState};
use crate::editor::Editor;
use crate::shapes::{ShapeId, ShapeTag};
use kurbo::Point;

impl Editor {
    pub(crate) fn delete_move(&mut self, window: Point) {
        let hovered = self.document.topmost_at(self.to_canvas(window));
        if hovered == self.hovered_for_delete() {
            return;
        }
        self.clear_delete_mark();
        if let Some(id) = hovered {
            if let Some(shape) = self.document.get_shape_mut(id) {
                shape.tag_mut().insert(ShapeTag::DELETING);
            }
            self.state = ToolState::Hovering(id);
            self.cursor = CursorHint::Hand;
        }
    }

    /// Remove the marked shape if the pointer is still over it, else the
    /// topmost shape under the pointer.
    pub(crate) fn delete_down(&mut self, window: Point) {
        if !self.canvas_rect().contains(window) {
            return;
        }
        let point = self.to_canvas(window);
        let target = self
            .hovered_for_delete()
            .filter(|&id| {
                self.document
                    .get_shape(id)
                    .is_some_and(|shape| shape.hit_test(point, 0.0))
            })
            .or_else(|| self.document.topmost_at(point));

        self.clear_delete_mark();
        if let Some(id) = target {
            self.remove_shape(id);
            log::debug!("Deleted shape {}", id);
        }
    }

    pub(crate) fn clear_delete_mark(&mut self) {
        if let Some(id) = self.hovered_for_delete() {
            if let Some(shape) = self.document.get_shape_mut(id) {
                shape.tag_mut().remove(ShapeTag::DELETING);
            }
        }
        self.state = ToolState::Idle;
        self.cursor = CursorHint::Default;
    }

    fn hovered_for_delete(&self) -> Option<ShapeId> {
        match self.state {
            ToolState::Hovering(id) => Some(id),
            _ => None,
        }
    }
}
