//! Input model: keys, drag frames, the input mode, and the gesture state machine.
//!
//! A pointer drag reaches the engine as a stream of `DragFrame`s, each one
//! carrying the *cumulative* movement since the gesture began, a velocity
//! estimate, and `first` / `active` / `last` flags. `InputState` is the gesture
//! being tracked between the first and last frame, carrying the origin values
//! captured at gesture start so later frames never compound on earlier writes.
//!
//! `InputMode` replaces any global cursor bookkeeping: it is the one place the
//! presentation layer learns whether the hold-to-pan key is down.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::ElementId;
use crate::hit::Corner;

/// Key that arms canvas panning while held.
pub const PAN_KEY: &str = "Space";

/// Key that removes the selected element.
pub const DELETE_KEY: &str = "Delete";

/// A keyboard key.
///
/// The inner string holds the key code as reported by the browser (e.g. `"Space"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_pan(&self) -> bool {
        self.0 == PAN_KEY
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == DELETE_KEY
    }
}

/// Whether the canvas is idle, armed for panning, or being panned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Pointer drags manipulate elements.
    #[default]
    Idle,
    /// The pan key is held; the next drag pans the canvas.
    PanReady,
    /// A canvas pan drag is in progress.
    Panning,
}

impl InputMode {
    /// CSS cursor for this mode.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Idle => "default",
            Self::PanReady => "grab",
            Self::Panning => "grabbing",
        }
    }

    /// Whether drags in this mode pan the canvas.
    #[must_use]
    pub fn pans(self) -> bool {
        matches!(self, Self::PanReady | Self::Panning)
    }
}

/// One frame of a pointer drag gesture.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragFrame {
    /// Screen position where the gesture started.
    pub origin: Point,
    /// Movement since the gesture started, in screen pixels.
    pub movement: Point,
    /// Instantaneous pointer velocity estimate.
    #[serde(default)]
    pub velocity: Point,
    /// First frame of the gesture.
    #[serde(default)]
    pub first: bool,
    /// The pointer is still down.
    #[serde(default)]
    pub active: bool,
    /// Last frame of the gesture (pointer released).
    #[serde(default)]
    pub last: bool,
    /// Host clock at this frame, in milliseconds.
    pub time_ms: f64,
}

/// Direction for a z-order swap with the neighbouring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerDirection {
    Up,
    Down,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UiState {
    /// The id of the currently selected element, if any.
    pub selected: Option<ElementId>,
    /// Current input mode.
    pub mode: InputMode,
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries the context needed to turn the cumulative
/// movement of later frames into absolute writes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next first frame.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Cumulative movement at the previous frame, used to derive the increment.
        last_movement: Point,
    },
    /// The user is moving an element.
    DraggingElement {
        id: ElementId,
        /// Element x at the start of the drag.
        orig_x: f64,
        /// Element y at the start of the drag.
        orig_y: f64,
    },
    /// The user is resizing an element by one of its corner handles.
    ResizingElement {
        id: ElementId,
        corner: Corner,
        orig_x: f64,
        orig_y: f64,
        orig_w: f64,
        orig_h: f64,
    },
    /// The gesture started on nothing draggable; frames are dropped until it ends.
    Ignored,
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
