//! Input model: mouse buttons, cursor modes, and pointer routing.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! While a drag is active the host routes pointer events from the whole
//! window instead of the drawing surface (`Routing::Window`), so the drag
//! keeps tracking outside the surface's bounds.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::grid::CellCoord;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle / auxiliary button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
    /// Back, forward, or any other extra button.
    Other,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Other,
        }
    }
}

/// What a pointer drag currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// No button held.
    #[default]
    Rest,
    /// Primary button held; every move paints.
    Paint,
    /// Middle button held; moves pan the camera.
    Pan,
    /// Reserved. No transition enters this mode.
    Erase,
}

/// Where pointer events are currently listened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Routing {
    /// Listeners on the drawing surface only.
    #[default]
    Surface,
    /// Listeners on the whole window for the duration of a drag.
    Window,
}

/// Gesture state for the input state machine.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mode: CursorMode,
    pub routing: Routing,
    /// Viewport position of the previous pointer event, used for pan deltas.
    pub last_viewport: Option<Point>,
    /// Cell under the pointer, highlighted by the renderer.
    pub hover: Option<CellCoord>,
}

impl InputState {
    /// Whether a drag holds window-level routing.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.routing == Routing::Window
    }
}
