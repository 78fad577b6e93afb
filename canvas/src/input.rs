//! Input model: tools, modifier keys, mouse buttons, shortcuts, and the
//! gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! or key event. `InputState` is the gesture being tracked between
//! pointer-down and pointer-up, carrying the context needed to update the
//! in-progress visual on every move and to commit it on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::surface::ElementId;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Select and move existing elements (default).
    #[default]
    Select,
    /// Freehand strokes.
    Pen,
    /// Place an editable text field.
    Text,
    /// Drag out an arrow.
    Arrow,
    /// Drag out a circle from its center.
    Circle,
    /// Drag out a rectangle from a corner.
    Rectangle,
    /// Remove elements under the pointer.
    Eraser,
}

impl Tool {
    /// Whether this tool sizes a preview between press and release.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Arrow | Self::Circle | Self::Rectangle)
    }

    /// Lowercase name, as used in scripts and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Pen => "pen",
            Self::Text => "text",
            Self::Arrow => "arrow",
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Eraser => "eraser",
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"q"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Global keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+Shift+Q: show or hide the whole overlay (host concern).
    ToggleOverlay,
    /// Ctrl+Shift+C: clear every annotation.
    Clear,
    /// Ctrl+G: show or hide the calibration grid.
    ToggleGrid,
    /// Delete or Backspace: remove the selected element.
    DeleteSelected,
    /// Escape: drop the selection.
    Deselect,
}

impl Shortcut {
    /// Map a key press to a shortcut, if it is one.
    #[must_use]
    pub fn from_key(key: &Key, mods: Modifiers) -> Option<Self> {
        let name = key.0.as_str();
        let letter = |c: &str| name.eq_ignore_ascii_case(c);
        if mods.ctrl && mods.shift && letter("q") {
            return Some(Self::ToggleOverlay);
        }
        if mods.ctrl && mods.shift && letter("c") {
            return Some(Self::Clear);
        }
        if mods.ctrl && !mods.shift && letter("g") {
            return Some(Self::ToggleGrid);
        }
        if mods.ctrl || mods.alt || mods.meta {
            return None;
        }
        match name {
            "Delete" | "Backspace" => Some(Self::DeleteSelected),
            "Escape" => Some(Self::Deselect),
            _ => None,
        }
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving the selected element with the pointer.
    DraggingSelection {
        id: ElementId,
        /// Pointer position minus element origin at press time.
        offset: Point,
    },
    /// Extending a pen stroke on every move.
    DrawingStroke { id: ElementId },
    /// Sizing an arrow, circle or rectangle preview.
    DrawingShape {
        id: ElementId,
        /// Press position the preview grows from.
        anchor: Point,
    },
    /// Eraser held down.
    Erasing,
}

impl InputState {
    /// Id of the visual the gesture is shaping or moving, if any.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::DraggingSelection { id, .. } | Self::DrawingStroke { id } | Self::DrawingShape { id, .. } => Some(*id),
            Self::Idle | Self::Erasing => None,
        }
    }
}
