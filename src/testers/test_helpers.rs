//! Shared test utilities for tester modules
//!
//! Events are stamped relative to a fixed origin so timing windows can be
//! exercised without sleeping.

use crate::input::{InputEvent, KeyCode, MouseButton};
use std::time::{Duration, Instant};

/// KeyCode 30 = 'KeyA'
pub const KEY_A: KeyCode = KeyCode(30);
/// KeyCode 48 = 'KeyB'
pub const KEY_B: KeyCode = KeyCode(48);
/// KeyCode 42 = 'ShiftLeft'
pub const SHIFT: KeyCode = KeyCode(42);

/// Timestamp `ms` milliseconds after `origin`
pub fn at(origin: Instant, ms: u64) -> Instant {
    origin + Duration::from_millis(ms)
}

pub fn click(origin: Instant, button: u8, ms: u64) -> InputEvent {
    InputEvent::PointerPress {
        button: MouseButton::from(button),
        timestamp: at(origin, ms),
    }
}

pub fn wheel(origin: Instant, delta_y: f64, ms: u64) -> InputEvent {
    InputEvent::WheelScroll {
        delta_y,
        timestamp: at(origin, ms),
    }
}

pub fn move_to(origin: Instant, x: f64, y: f64, ms: u64) -> InputEvent {
    InputEvent::PointerMove {
        x,
        y,
        timestamp: at(origin, ms),
    }
}

/// Pointer move with sub-millisecond timing
pub fn move_at_us(origin: Instant, x: f64, y: f64, us: u64) -> InputEvent {
    InputEvent::PointerMove {
        x,
        y,
        timestamp: origin + Duration::from_micros(us),
    }
}

pub fn key_down(origin: Instant, code: KeyCode, ms: u64) -> InputEvent {
    InputEvent::key_down(code, at(origin, ms))
}

pub fn key_up(origin: Instant, code: KeyCode, ms: u64) -> InputEvent {
    InputEvent::key_up(code, at(origin, ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_offsets_from_origin() {
        let origin = Instant::now();
        assert_eq!(at(origin, 40) - origin, Duration::from_millis(40));
    }

    #[test]
    fn click_maps_button_index() {
        let origin = Instant::now();
        match click(origin, 2, 0) {
            InputEvent::PointerPress { button, .. } => assert_eq!(button, MouseButton::Right),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
