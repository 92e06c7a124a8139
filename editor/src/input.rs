//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the selection-tool gesture being tracked between
//! pointer-down and pointer-up (panning, moving or resizing a terrain). The
//! drawing tools keep their own session state in [`crate::tools`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Bounds, ObjectId};
use crate::geom::Vertex;
use crate::hit::Side;
use crate::storage::ViewMode;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Place a rectangular terrain patch.
    Terrain,
    /// Draw a chain of walls.
    Wall,
}

impl Tool {
    /// The tool bound to a single-character hotkey, if any.
    #[must_use]
    pub fn from_hotkey(key: &Key) -> Option<Self> {
        match key.0.to_lowercase().as_str() {
            "t" => Some(Self::Terrain),
            "w" => Some(Self::Wall),
            _ => None,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Backspace"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Backspace" || self.0 == "Delete"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The id of the currently selected entity, if any.
    pub selected_id: Option<ObjectId>,
    /// Guidance text shown while a drawing tool is active.
    pub guidance: Option<String>,
    /// Which view is shown.
    pub view_mode: ViewMode,
    /// Last known pointer position on the plan.
    pub pointer: Option<Vertex>,
}

/// Internal state for the selection-tool gesture machine.
///
/// Each active variant carries the context needed to compute deltas and emit
/// the final commit on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the plan by dragging empty space.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Vertex,
    },
    /// The user is moving a terrain across the plan.
    MovingTerrain {
        /// Id of the terrain being moved.
        id: ObjectId,
        /// Plan position of the pointer at pointer-down.
        start_world: Vertex,
        /// Terrain center at pointer-down.
        orig_center: Vertex,
        /// Live center, committed on release.
        center: Vertex,
    },
    /// The user is resizing a terrain by dragging one of its side handles.
    ResizingTerrain {
        /// Id of the terrain being resized.
        id: ObjectId,
        /// Which side is being dragged.
        side: Side,
        /// Plan position of the pointer at pointer-down.
        start_world: Vertex,
        /// Bounds at pointer-down.
        orig: Bounds,
        /// Live bounds, committed on release.
        bounds: Bounds,
    },
}

impl InputState {
    /// The terrain a running move or resize gesture is editing.
    #[must_use]
    pub fn transform_target(&self) -> Option<ObjectId> {
        match self {
            Self::MovingTerrain { id, .. } | Self::ResizingTerrain { id, .. } => Some(*id),
            Self::Idle | Self::Panning { .. } => None,
        }
    }
}
