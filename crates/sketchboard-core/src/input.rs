//! Platform-neutral input events.
//!
//! The platform layer translates its native events into [`InputEvent`] and
//! hands them to [`crate::Canvas::handle_event`] one at a time.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on Windows/Linux, Cmd on macOS. Either counts.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "char", rename_all = "snake_case")]
pub enum Key {
    /// A printable character.
    Character(char),
    Backspace,
    Delete,
    Enter,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Escape,
    Tab,
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    /// Pixel deltas, as reported by trackpads and most mice.
    #[default]
    Pixel,
    /// Line deltas from a notched mouse wheel.
    Line,
    Page,
}

/// A wheel or trackpad scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Pointer position in screen coordinates.
    pub position: Point,
    pub delta: Vec2,
    #[serde(default)]
    pub mode: DeltaMode,
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Finger down.
    Start,
    /// Finger dragging.
    Move,
    /// Finger up.
    End,
    /// Touch cancelled by the platform.
    Cancel,
}

/// A single touch point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier, stable for the life of the finger.
    pub id: u64,
    pub position: Point,
}

/// A touch event. `touches` lists the points that changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
}

/// All input events the canvas can receive. Positions are screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        position: Point,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
    },
    PointerUp {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    /// The pointer left the canvas.
    PointerLeave,
    Wheel(WheelEvent),
    Touch(TouchEvent),
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Convenience for a left-button press without modifiers.
    pub fn pointer_down(x: f64, y: f64) -> Self {
        InputEvent::PointerDown {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        InputEvent::PointerMove {
            position: Point::new(x, y),
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        InputEvent::PointerUp {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    pub fn key(key: Key) -> Self {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_script_format() {
        let json = r#"[
            {"type": "pointer_down", "position": {"x": 1.0, "y": 2.0}},
            {"type": "key_down", "key": {"key": "character", "char": "a"}},
            {"type": "key_down", "key": {"key": "arrow_left"}, "modifiers": {"shift": true}},
            {"type": "wheel", "position": {"x": 0.0, "y": 0.0}, "delta": {"x": 0.0, "y": -3.0}, "mode": "line"},
            {"type": "touch", "phase": "start", "touches": [{"id": 7, "position": {"x": 5.0, "y": 5.0}}]},
            {"type": "pointer_leave"}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], InputEvent::pointer_down(1.0, 2.0));
        assert_eq!(events[1], InputEvent::key(Key::Character('a')));
        assert!(matches!(
            events[2],
            InputEvent::KeyDown {
                key: Key::ArrowLeft,
                modifiers: Modifiers { shift: true, .. }
            }
        ));
        assert!(matches!(
            events[3],
            InputEvent::Wheel(WheelEvent {
                mode: DeltaMode::Line,
                ..
            })
        ));
    }

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::CTRL.command());
        assert!(!Modifiers::SHIFT.command());
    }
}
