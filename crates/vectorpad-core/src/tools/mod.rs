//! Tool system for the canvas.
//!
//! Each tool has explicit enter and exit handlers on [`Editor`]; the per-tool
//! input handlers live in the submodules.
//!
//! [`Editor`]: crate::editor::Editor

mod delete;
mod draw;
mod pointer;

use crate::handles::HandleId;
use crate::shapes::ShapeId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pointer,
    Polyline,
    Rectangle,
    Delete,
}

impl ToolKind {
    pub fn is_draw_tool(self) -> bool {
        matches!(self, ToolKind::Polyline | ToolKind::Rectangle)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pointer => "Pointer",
            ToolKind::Polyline => "Polyline",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Delete => "Delete",
        }
    }
}

/// What a pointer-tool drag is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerDrag {
    /// Panning the canvas inside the workspace.
    Pan,
    /// Moving every selected shape.
    Move,
    /// Dragging one handle of the handle source.
    Handle(HandleId),
    /// Rubber-band selection; both corners in window coordinates.
    RubberBand { anchor: Point, current: Point },
}

/// State of the active tool's interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Waiting for input.
    #[default]
    Idle,
    /// Pointer tool with the button held.
    Dragging(PointerDrag),
    /// Draw tool with the button held; `live` is created on the first move.
    Drawing { anchor: Point, live: Option<ShapeId> },
    /// Delete tool hovering a shape that is marked for deletion.
    Hovering(ShapeId),
}

impl ToolState {
    pub fn dragged_handle(&self) -> Option<HandleId> {
        match self {
            ToolState::Dragging(PointerDrag::Handle(id)) => Some(*id),
            _ => None,
        }
    }

    /// The rubber band, normalized, in window coordinates.
    pub fn rubber_band(&self) -> Option<Rect> {
        match self {
            ToolState::Dragging(PointerDrag::RubberBand { anchor, current }) => {
                Some(Rect::from_points(*anchor, *current))
            }
            _ => None,
        }
    }

    pub fn live_shape(&self) -> Option<ShapeId> {
        match self {
            ToolState::Drawing { live, .. } => *live,
            _ => None,
        }
    }
}

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Crosshair,
    Move,
    Pan,
    /// Rotation is driven by horizontal pointer motion only.
    RotateHorizontal,
    Hand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rubber_band_is_normalized() {
        let state = ToolState::Dragging(PointerDrag::RubberBand {
            anchor: Point::new(50.0, 10.0),
            current: Point::new(20.0, 40.0),
        });
        assert_eq!(state.rubber_band(), Some(Rect::new(20.0, 10.0, 50.0, 40.0)));
        assert_eq!(state.dragged_handle(), None);
        assert_eq!(ToolState::Idle.rubber_band(), None);
    }

    #[test]
    fn test_draw_tools() {
        assert!(ToolKind::Polyline.is_draw_tool());
        assert!(ToolKind::Rectangle.is_draw_tool());
        assert!(!ToolKind::Pointer.is_draw_tool());
        assert!(!ToolKind::Delete.is_draw_tool());
    }
}
