//! VectorPad Core Library
//!
//! Geometry, selection and transform engine for a small vector-drawing
//! canvas of polylines and quadrilaterals, with validated XML persistence.
//! The host delivers pointer and key events and renders what the editor
//! exposes; no windowing code lives here.

pub mod canvas;
pub mod editor;
pub mod geometry;
pub mod handles;
pub mod input;
pub mod selection;
pub mod settings;
pub mod shapes;
pub mod storage;
pub mod tools;
pub mod transform;

pub use canvas::CanvasDocument;
pub use editor::{Editor, EditorEvent};
pub use handles::{Handle, HandleId, HandleSet, QuadHandle};
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use selection::Selection;
pub use settings::{EditorSettings, SettingsError};
pub use shapes::{Brush, Polyline, Quad, Shape, ShapeColor, ShapeId, ShapeKind, ShapeTag};
pub use storage::{StorageError, StorageResult};
pub use tools::{CursorHint, ToolKind, ToolState};
