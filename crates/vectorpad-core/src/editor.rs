//! The editor owns the shapes, the selection and the active tool, and turns
//! host input into edits.
//!
//! Pointer events arrive in window coordinates. Shapes, handles and hit tests
//! live in canvas coordinates, `window - canvas_offset`.

use crate::canvas::CanvasDocument;
use crate::handles::{HandleId, HandleSet};
use crate::input::{InputState, KeyEvent, MouseButton, PointerEvent};
use crate::selection::Selection;
use crate::settings::EditorSettings;
use crate::shapes::{Brush, PolylineStyle, Shape, ShapeId, ShapeTag};
use crate::storage::{self, StorageResult};
use crate::tools::{CursorHint, ToolKind, ToolState};
use kurbo::{Point, Rect, Vec2};
use std::path::Path;

/// Notifications for the host, drained with [`Editor::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    SelectionChanged,
    ShapeAdded(ShapeId),
    ShapeRemoved(ShapeId),
    ToolChanged(ToolKind),
}

/// Single owner of the drawing, the selection and the tool state machine.
#[derive(Debug, Clone)]
pub struct Editor {
    pub(crate) document: CanvasDocument,
    pub(crate) selection: Selection,
    pub(crate) handles: HandleSet,
    pub(crate) tool: ToolKind,
    pub(crate) state: ToolState,
    pub(crate) input: InputState,
    pub(crate) settings: EditorSettings,
    /// Window position of the canvas origin.
    pub(crate) canvas_offset: Vec2,
    pub(crate) cursor: CursorHint,
    current_brush: Brush,
    current_line_width: f64,
    events: Vec<EditorEvent>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Editor {
    /// Create an empty editor with the canvas centered in the workspace.
    pub fn new(settings: EditorSettings) -> Self {
        let canvas_offset = Vec2::new(
            (settings.workspace_size.width - settings.canvas_size.width) / 2.0,
            (settings.workspace_size.height - settings.canvas_size.height) / 2.0,
        );
        let mut editor = Self {
            document: CanvasDocument::new(),
            selection: Selection::new(),
            handles: HandleSet::new(settings.handle_size),
            tool: ToolKind::Pointer,
            state: ToolState::Idle,
            input: InputState::new(),
            canvas_offset: Vec2::ZERO,
            cursor: CursorHint::Default,
            current_brush: settings.default_brush,
            current_line_width: settings.default_line_width.max(PolylineStyle::MIN_WIDTH),
            events: Vec::new(),
            settings,
        };
        editor.set_canvas_offset(canvas_offset);
        editor
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    /// Shapes back to front.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.document.shapes_ordered()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Handles of the single selected shape, already up to date.
    pub fn handles(&self) -> &HandleSet {
        &self.handles
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn tool_state(&self) -> &ToolState {
        &self.state
    }

    pub fn dragged_handle(&self) -> Option<HandleId> {
        self.state.dragged_handle()
    }

    /// Rubber band in window coordinates while one is being dragged.
    pub fn rubber_band(&self) -> Option<Rect> {
        self.state.rubber_band()
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Coordinates ---

    pub fn canvas_offset(&self) -> Vec2 {
        self.canvas_offset
    }

    /// Move the canvas inside the workspace, keeping `pan_margin` of it visible
    /// on each axis.
    pub fn set_canvas_offset(&mut self, offset: Vec2) {
        let s = &self.settings;
        self.canvas_offset = Vec2::new(
            clamp_pan(
                offset.x,
                s.canvas_size.width,
                s.workspace_size.width,
                s.pan_margin,
            ),
            clamp_pan(
                offset.y,
                s.canvas_size.height,
                s.workspace_size.height,
                s.pan_margin,
            ),
        );
    }

    /// The canvas area in window coordinates.
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_origin_size(self.canvas_offset.to_point(), self.settings.canvas_size)
    }

    pub fn to_canvas(&self, window: Point) -> Point {
        window - self.canvas_offset
    }

    pub fn to_window(&self, canvas: Point) -> Point {
        canvas + self.canvas_offset
    }

    // --- Current style ---

    pub fn current_brush(&self) -> Brush {
        self.current_brush
    }

    /// Set the brush for new shapes; restyles the selected shape when exactly
    /// one is selected.
    pub fn set_current_brush(&mut self, brush: Brush) {
        self.current_brush = brush;
        self.restyle_single_selection();
    }

    pub fn current_line_width(&self) -> f64 {
        self.current_line_width
    }

    /// Set the stroke width for new polylines (at least 3); restyles the
    /// selected shape when exactly one is selected.
    pub fn set_current_line_width(&mut self, width: f64) {
        self.current_line_width = width.max(PolylineStyle::MIN_WIDTH);
        self.restyle_single_selection();
    }

    fn restyle_single_selection(&mut self) {
        let Some(id) = self.selection.single() else {
            return;
        };
        if let Some(shape) = self.document.get_shape_mut(id) {
            shape.apply_style(self.current_brush, self.current_line_width);
        }
        self.refresh_handles();
    }

    // --- Selection ---

    /// Select exactly one shape, or nothing.
    ///
    /// The shape's brush (and width, for a polyline) become the current style
    /// and its handles are projected.
    pub fn select_shape(&mut self, id: Option<ShapeId>) {
        self.selection.clear(&mut self.document);
        match id {
            Some(id) if self.selection.add(&mut self.document, id) => {
                if let Some(shape) = self.document.get_shape(id) {
                    self.current_brush = shape.brush();
                    if let Some(width) = shape.stroke_width() {
                        self.current_line_width = width;
                    }
                    self.handles.set_source(Some(shape));
                }
            }
            _ => self.handles.clear(),
        }
        self.events.push(EditorEvent::SelectionChanged);
    }

    /// Replace the selection. A single id behaves like [`Editor::select_shape`];
    /// several ids show no handles.
    pub fn select_shapes(&mut self, ids: &[ShapeId]) {
        if let [id] = ids {
            self.select_shape(Some(*id));
            return;
        }
        self.selection.clear(&mut self.document);
        for &id in ids {
            self.selection.add(&mut self.document, id);
        }
        self.handles.clear();
        self.events.push(EditorEvent::SelectionChanged);
    }

    /// Reproject the handles of the current handle source.
    pub(crate) fn refresh_handles(&mut self) {
        let source = self
            .handles
            .source()
            .and_then(|id| self.document.get_shape(id));
        self.handles.set_source(source);
    }

    /// Mark or unmark every selected shape as about to be deleted.
    pub fn mark_selection_deleting(&mut self, deleting: bool) {
        for id in self.selection.iter() {
            if let Some(shape) = self.document.get_shape_mut(id) {
                if deleting {
                    shape.tag_mut().insert(ShapeTag::DELETING);
                } else {
                    shape.tag_mut().remove(ShapeTag::DELETING);
                }
            }
        }
    }

    // --- Shapes ---

    /// Add a shape on top of the drawing.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.document.add_shape(shape);
        self.events.push(EditorEvent::ShapeAdded(id));
        id
    }

    /// Remove a shape and every reference to it.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let was_selected = self.selection.remove(&mut self.document, id);
        if self.handles.source() == Some(id) {
            self.handles.clear();
        }
        match self.state {
            ToolState::Hovering(hovered) if hovered == id => self.state = ToolState::Idle,
            ToolState::Drawing {
                anchor,
                live: Some(live),
            } if live == id => {
                self.state = ToolState::Drawing { anchor, live: None };
            }
            _ => {}
        }

        let shape = self.document.remove_shape(id)?;
        self.events.push(EditorEvent::ShapeRemoved(id));
        if was_selected {
            self.events.push(EditorEvent::SelectionChanged);
        }
        Some(shape)
    }

    pub fn delete_selected(&mut self) {
        let ids = self.selection.ids().to_vec();
        for &id in &ids {
            self.remove_shape(id);
        }
        log::debug!("Deleted {} selected shapes", ids.len());
        self.select_shapes(&[]);
    }

    /// Remove every shape and reset selection, handles and any drag.
    pub fn clear_all(&mut self) {
        self.select_shape(None);
        self.state = ToolState::Idle;
        for id in self.document.z_order().to_vec() {
            self.remove_shape(id);
        }
    }

    // --- Tools ---

    /// Switch tools, running the old tool's exit handler and the new tool's
    /// enter handler. Re-selecting the active tool resets it.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.exit_tool();
        let previous = std::mem::replace(&mut self.tool, tool);
        self.enter_tool();
        if previous != tool {
            log::debug!("Tool changed: {} -> {}", previous.name(), tool.name());
            self.events.push(EditorEvent::ToolChanged(tool));
        }
    }

    /// Activate `tool`, or go back to the pointer if it is already active.
    pub fn toggle_tool(&mut self, tool: ToolKind) {
        if self.tool == tool {
            self.set_tool(ToolKind::Pointer);
        } else {
            self.set_tool(tool);
        }
    }

    /// Toolbar delete: leave the delete tool, delete a multi-selection, or
    /// enter the delete tool.
    pub fn delete_command(&mut self) {
        if self.tool == ToolKind::Delete {
            self.set_tool(ToolKind::Pointer);
        } else if self.selection.len() > 1 {
            self.delete_selected();
        } else {
            self.set_tool(ToolKind::Delete);
        }
    }

    fn exit_tool(&mut self) {
        match self.tool {
            ToolKind::Pointer => {
                self.state = ToolState::Idle;
                self.select_shapes(&[]);
            }
            ToolKind::Polyline | ToolKind::Rectangle => self.finish_drawing(),
            ToolKind::Delete => self.clear_delete_mark(),
        }
        self.state = ToolState::Idle;
        self.cursor = CursorHint::Default;
    }

    fn enter_tool(&mut self) {
        // Strokes are drawn solid.
        if self.tool == ToolKind::Polyline && self.current_brush.is_gradient() {
            self.current_brush = Brush::solid(self.current_brush.primary_color());
        }
        if self.tool.is_draw_tool() {
            self.cursor = CursorHint::Crosshair;
        }
    }

    // --- Input ---

    /// Feed one pointer event (window coordinates).
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                click_count,
                modifiers,
            } => {
                if button != MouseButton::Left {
                    return;
                }
                self.input.modifiers = modifiers;
                self.input.primary_pressed = true;
                self.input.move_to(position);
                match self.tool {
                    ToolKind::Pointer => self.pointer_down(position, click_count),
                    ToolKind::Polyline | ToolKind::Rectangle => self.draw_down(position),
                    ToolKind::Delete => self.delete_down(position),
                }
            }
            PointerEvent::Move { position } => {
                if position == self.input.pointer_position {
                    return;
                }
                self.input.move_to(position);
                match self.tool {
                    ToolKind::Pointer => self.pointer_move(position),
                    ToolKind::Polyline | ToolKind::Rectangle => self.draw_move(position),
                    ToolKind::Delete => self.delete_move(position),
                }
            }
            PointerEvent::Up { position, button } => {
                if button != MouseButton::Left {
                    return;
                }
                self.input.primary_pressed = false;
                self.input.move_to(position);
                match self.tool {
                    ToolKind::Pointer => self.pointer_up(),
                    ToolKind::Polyline | ToolKind::Rectangle => self.finish_drawing(),
                    ToolKind::Delete => {}
                }
            }
        }
    }

    /// Feed one keyboard event.
    pub fn handle_key(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::ModifiersChanged(modifiers) => {
                let previous = std::mem::replace(&mut self.input.modifiers, modifiers);
                if self.tool == ToolKind::Pointer {
                    self.pointer_modifiers_changed(previous, modifiers);
                }
            }
        }
    }

    // --- Files ---

    /// Load a drawing, replacing the current one only if the file is valid.
    /// Returns the number of shapes loaded.
    pub fn open(&mut self, path: &Path) -> StorageResult<usize> {
        self.set_tool(ToolKind::Pointer);
        let shapes = storage::load_drawing(path)?;
        self.clear_all();
        let count = shapes.len();
        for shape in shapes {
            self.add_shape(shape);
        }
        Ok(count)
    }

    /// Save the drawing in z-order. Any drag in progress is ended first.
    pub fn save(&mut self, path: &Path) -> StorageResult<()> {
        self.set_tool(ToolKind::Pointer);
        storage::save_drawing(path, self.document.shapes_ordered())
    }
}

fn clamp_pan(position: f64, canvas_len: f64, workspace_len: f64, margin: f64) -> f64 {
    if position + canvas_len < margin {
        margin - canvas_len
    } else if position > workspace_len - margin {
        workspace_len - margin
    } else {
        position
    }
}
