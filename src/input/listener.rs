//! Keyboard listener that polls the device for key state changes

use super::{InputEvent, KeyCode};
use device_query::{DeviceQuery, DeviceState};
use std::sync::mpsc;
use std::time::Instant;

/// Polls the global key state and reports press/release transitions
pub struct KeyboardListener {
    device_state: DeviceState,
    last_keys: Vec<KeyCode>,
    event_tx: mpsc::Sender<InputEvent>,
}

impl KeyboardListener {
    pub fn new(event_tx: mpsc::Sender<InputEvent>) -> Self {
        Self {
            device_state: DeviceState::new(),
            last_keys: Vec::new(),
            event_tx,
        }
    }

    /// Poll for keyboard state changes.
    /// Returns the number of events generated.
    pub fn poll(&mut self, now: Instant) -> usize {
        let current: Vec<KeyCode> = self
            .device_state
            .get_keys()
            .into_iter()
            .map(KeyCode::from)
            .collect();

        let events = diff_keys(&self.last_keys, &current, now);
        let count = events.len();
        for event in events {
            if self.event_tx.send(event).is_err() {
                log::debug!("keyboard event receiver dropped");
                break;
            }
        }

        self.last_keys = current;
        count
    }
}

/// Turn two consecutive key-state snapshots into key-down/key-up events.
///
/// Presses are reported before releases, each in snapshot order. A key
/// present in both snapshots produces nothing.
pub fn diff_keys(previous: &[KeyCode], current: &[KeyCode], now: Instant) -> Vec<InputEvent> {
    let pressed = current
        .iter()
        .filter(|key| !previous.contains(key))
        .map(|key| InputEvent::key_down(*key, now));
    let released = previous
        .iter()
        .filter(|key| !current.contains(key))
        .map(|key| InputEvent::key_up(*key, now));
    pressed.chain(released).collect()
}
