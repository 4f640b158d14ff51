//! Input events delivered by the host and the pointer state derived from them.
//!
//! All positions are in window coordinates; the editor converts to canvas
//! space using its canvas offset.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Whether the rubber-band selection modifier (shift) is held.
    pub fn rubber_band(&self) -> bool {
        self.shift
    }
}

/// Pointer event in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        /// 1 for a single click, 2 for a double click.
        click_count: u32,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

impl PointerEvent {
    /// Primary-button single click.
    pub fn down(position: Point) -> Self {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
            click_count: 1,
            modifiers: Modifiers::default(),
        }
    }

    pub fn up(position: Point) -> Self {
        PointerEvent::Up {
            position,
            button: MouseButton::Left,
        }
    }

    pub fn moved(position: Point) -> Self {
        PointerEvent::Move { position }
    }

    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => position,
        }
    }
}

/// Keyboard event relevant to the canvas: modifier transitions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    ModifiersChanged(Modifiers),
}

/// Pointer state tracked between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in window coordinates.
    pub pointer_position: Point,
    /// Pointer position at the previous event, for drag deltas.
    pub previous_pointer_position: Point,
    /// Whether the primary button is held.
    pub primary_pressed: bool,
    pub modifiers: Modifiers,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new pointer position, shifting the current one to previous.
    pub fn move_to(&mut self, position: Point) {
        self.previous_pointer_position = self.pointer_position;
        self.pointer_position = position;
    }

    /// Pointer delta since the previous event.
    pub fn delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_tracks_previous() {
        let mut input = InputState::new();
        input.move_to(Point::new(10.0, 10.0));
        input.move_to(Point::new(13.0, 6.0));
        assert_eq!(input.previous_pointer_position, Point::new(10.0, 10.0));
        assert_eq!(input.delta(), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_event_position() {
        let p = Point::new(4.0, 2.0);
        assert_eq!(PointerEvent::down(p).position(), p);
        assert_eq!(PointerEvent::up(p).position(), p);
        assert_eq!(PointerEvent::moved(p).position(), p);
        assert!(Modifiers::SHIFT.rubber_band());
        assert!(!Modifiers::default().rubber_band());
    }
}
