//! Input event types

use super::keymap::{get_key_info, KeyCode};
use std::time::Instant;

/// Pointer button, identified by its physical index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Any button past the first three (side buttons etc.)
    Other(u8),
}

impl MouseButton {
    pub fn index(&self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
            Self::Other(n) => *n,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Middle => "Middle",
            Self::Right => "Right",
            Self::Other(_) => "Unknown",
        }
    }
}

impl From<u8> for MouseButton {
    fn from(index: u8) -> Self {
        match index {
            0 => Self::Left,
            1 => Self::Middle,
            2 => Self::Right,
            n => Self::Other(n),
        }
    }
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(button: crossterm::event::MouseButton) -> Self {
        use crossterm::event::MouseButton as Ct;
        match button {
            Ct::Left => Self::Left,
            Ct::Middle => Self::Middle,
            Ct::Right => Self::Right,
        }
    }
}

/// A single input event with the time it was observed
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerPress {
        button: MouseButton,
        timestamp: Instant,
    },
    PointerRelease {
        timestamp: Instant,
    },
    /// Vertical wheel movement; negative values scroll up
    WheelScroll {
        delta_y: f64,
        timestamp: Instant,
    },
    /// Pointer position relative to the receiving surface's origin
    PointerMove {
        x: f64,
        y: f64,
        timestamp: Instant,
    },
    KeyDown {
        code: KeyCode,
        /// Value the key produced
        key: String,
        timestamp: Instant,
    },
    KeyUp {
        code: KeyCode,
        timestamp: Instant,
    },
    FocusLost,
}

impl InputEvent {
    /// Key-down for `code`, with the key value taken from the keymap
    pub fn key_down(code: KeyCode, timestamp: Instant) -> Self {
        Self::KeyDown {
            code,
            key: get_key_info(code).key.to_string(),
            timestamp,
        }
    }

    pub fn key_up(code: KeyCode, timestamp: Instant) -> Self {
        Self::KeyUp { code, timestamp }
    }

    pub fn press(button: impl Into<MouseButton>, timestamp: Instant) -> Self {
        Self::PointerPress {
            button: button.into(),
            timestamp,
        }
    }

    pub fn timestamp(&self) -> Option<Instant> {
        match self {
            Self::PointerPress { timestamp, .. }
            | Self::PointerRelease { timestamp }
            | Self::WheelScroll { timestamp, .. }
            | Self::PointerMove { timestamp, .. }
            | Self::KeyDown { timestamp, .. }
            | Self::KeyUp { timestamp, .. } => Some(*timestamp),
            Self::FocusLost => None,
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, Self::KeyDown { .. } | Self::KeyUp { .. })
    }
}

/// Whether a key value is a single visible character
pub fn is_printable(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
}
