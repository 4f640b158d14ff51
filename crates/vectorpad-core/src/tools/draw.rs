//! Polyline and rectangle drawing.
//!
//! The live shape is created on the first pointer move after the press, so a
//! plain click never adds anything. On release it is kept unless it is too
//! small.

use super::{ToolKind, ToolState};
use crate::editor::Editor;
use crate::shapes::{Polyline, PolylineStyle, Quad, Shape};
use kurbo::Point;

impl Editor {
    pub(crate) fn draw_down(&mut self, window: Point) {
        if !self.canvas_rect().contains(window) {
            return;
        }
        self.state = ToolState::Drawing {
            anchor: self.to_canvas(window),
            live: None,
        };
    }

    pub(crate) fn draw_move(&mut self, window: Point) {
        let ToolState::Drawing { anchor, live } = self.state else {
            return;
        };
        let cursor = self.to_canvas(window);

        if let Some(shape) = live.and_then(|id| self.document.get_shape_mut(id)) {
            match shape {
                Shape::Polyline(line) => line.set_point(1, cursor),
                Shape::Quad(quad) => quad.set_drag(anchor, cursor),
            }
            return;
        }

        let shape = self.new_drawn_shape(anchor, cursor);
        let id = self.add_shape(shape);
        self.state = ToolState::Drawing {
            anchor,
            live: Some(id),
        };
    }

    /// Commit or discard the live shape and go idle.
    pub(crate) fn finish_drawing(&mut self) {
        let live = self.state.live_shape();
        self.state = ToolState::Idle;
        let Some(id) = live else {
            return;
        };
        let Some(shape) = self.document.get_shape(id) else {
            return;
        };

        let kind = shape.kind();
        if self.is_too_small(shape) {
            log::debug!("Discarding {:?} {}: too small", kind, id);
            self.remove_shape(id);
        } else {
            log::debug!("Committed {:?} {}", kind, id);
        }
    }

    fn new_drawn_shape(&self, anchor: Point, cursor: Point) -> Shape {
        match self.tool {
            ToolKind::Polyline => {
                let mut line = Polyline::segment(anchor, anchor);
                line.style = PolylineStyle::new(self.current_brush(), self.current_line_width());
                line.set_point(1, cursor);
                line.into()
            }
            _ => {
                let mut quad = Quad::new([anchor; 4], self.current_brush());
                quad.set_drag(anchor, cursor);
                quad.into()
            }
        }
    }

    fn is_too_small(&self, shape: &Shape) -> bool {
        match shape {
            Shape::Polyline(line) => line.extent_squared() <= self.settings.line_discard_extent_sq,
            Shape::Quad(_) => {
                let bounds = shape.bounds();
                bounds.width() + bounds.height() <= self.settings.rect_discard_extent
            }
        }
    }
}
