//! Input vocabulary delivered by the host: modifiers, keys and double-click
//! detection.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Backspace,
    Enter,
    Escape,
    Delete,
    /// Any other key; ignored by the editor core.
    Other,
}

impl Key {
    /// Map a host key name (as produced by browsers and winit) to a key.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Backspace" => Key::Backspace,
            "Enter" | "Return" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Delete" | "Del" => Key::Delete,
            _ => Key::Other,
        }
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double clicks from a stream of pointer-down events in canvas
/// pixels, for hosts that do not report them natively.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click and return whether it completes a double click.
    pub fn register(&mut self, position: Point, at: Instant) -> bool {
        if let Some((last_time, last_pos)) = self.last_click {
            let elapsed = at.saturating_duration_since(last_time);
            if elapsed < DOUBLE_CLICK_TIME && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE {
                // Reset so a triple click is not a second double click
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((at, position));
        false
    }

    pub fn reset(&mut self) {
        self.last_click = None;
    }
}
