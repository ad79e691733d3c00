//! N-Key Rollover test module

use super::{format_summary, ResultStatus, TestResult, Tester};
use crate::feedback::Cue;
use crate::input::{InputEvent, KeyCode};
use std::collections::BTreeSet;
use std::time::Instant;

/// Summary produced before any key was pressed. The report treats it as
/// "no data" and leaves it out.
pub const NO_DATA_RESULT: &str = "Max Concurrent Keys: 0";

/// Tracks how many keys are held at the same time
pub struct KeyRolloverTester {
    /// Currently pressed keys
    pressed_keys: BTreeSet<KeyCode>,
    /// Maximum simultaneous keys since the last reset
    max_simultaneous: usize,
    active: bool,
}

impl KeyRolloverTester {
    pub fn new() -> Self {
        Self {
            pressed_keys: BTreeSet::new(),
            max_simultaneous: 0,
            active: false,
        }
    }

    /// Get current number of pressed keys
    pub fn current_count(&self) -> usize {
        self.pressed_keys.len()
    }

    /// Get maximum achieved rollover
    pub fn max_rollover(&self) -> usize {
        self.max_simultaneous
    }

    /// Get currently pressed keys, in scancode order
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.pressed_keys.iter().copied()
    }

    /// Get the rollover rating string
    pub fn rollover_rating(&self) -> String {
        match self.max_simultaneous {
            0 => "Not tested".to_string(),
            n if n >= 10 => "NKRO".to_string(),
            n => format!("{}KRO", n),
        }
    }
}

impl Default for KeyRolloverTester {
    fn default() -> Self {
        Self::new()
    }
}

impl Tester for KeyRolloverTester {
    fn name(&self) -> &'static str {
        "Key Rollover Test"
    }

    fn description(&self) -> &'static str {
        "Tests how many keys can be pressed simultaneously"
    }

    fn process_event(&mut self, event: &InputEvent) -> Cue {
        if !self.active {
            return Cue::None;
        }

        match event {
            InputEvent::KeyDown { code, .. } => {
                self.pressed_keys.insert(*code);
                self.max_simultaneous = self.max_simultaneous.max(self.pressed_keys.len());
            }
            InputEvent::KeyUp { code, .. } => {
                self.pressed_keys.remove(code);
            }
            // Releases that happen while unfocused are never seen
            InputEvent::FocusLost => self.pressed_keys.clear(),
            _ => {}
        }
        Cue::None
    }

    fn activate(&mut self, _now: Instant) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.pressed_keys.clear();
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn get_results(&self) -> Vec<TestResult> {
        let mut results = Vec::new();

        results.push(TestResult::info(
            "Currently Pressed",
            format!("{} keys", self.current_count()),
        ));

        let status = match self.max_simultaneous {
            0 => ResultStatus::Info,
            1..=2 => ResultStatus::Error,
            3..=5 => ResultStatus::Warning,
            _ => ResultStatus::Ok,
        };
        results.push(TestResult::new(
            "Max Rollover",
            self.rollover_rating(),
            status,
        ));

        if !self.pressed_keys.is_empty() {
            let names: Vec<String> = self.pressed_keys().map(|k| k.to_string()).collect();
            results.push(TestResult::info("Active Keys", names.join(" + ")));
        }

        results
    }

    fn summary(&self) -> String {
        format_summary(
            "Key Rollover Test Results",
            &[("Max Concurrent Keys", self.max_simultaneous.to_string())],
        )
    }

    fn reset(&mut self) {
        self.pressed_keys.clear();
        self.max_simultaneous = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testers::test_helpers::*;

    fn active_tester(origin: Instant) -> KeyRolloverTester {
        let mut tester = KeyRolloverTester::new();
        tester.activate(origin);
        tester
    }

    #[test]
    fn new_test_initial_state() {
        let tester = KeyRolloverTester::new();
        assert_eq!(tester.current_count(), 0);
        assert_eq!(tester.max_rollover(), 0);
        assert_eq!(tester.rollover_rating(), "Not tested");
        assert!(tester.summary().ends_with(NO_DATA_RESULT));
    }

    #[test]
    fn two_keys_held_then_focus_lost() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&key_down(origin, KEY_A, 0));
        tester.process_event(&key_down(origin, KEY_B, 10));

        assert_eq!(tester.current_count(), 2);
        assert_eq!(
            tester.summary(),
            "--- Key Rollover Test Results ---\nMax Concurrent Keys: 2"
        );

        tester.process_event(&InputEvent::FocusLost);
        assert_eq!(tester.current_count(), 0);
    }

    #[test]
    fn unmapped_keys_are_counted_separately() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);
        let scroll_lock = KeyCode::unmapped("ScrollLock");
        let f13 = KeyCode::unmapped("F13");

        tester.process_event(&key_down(origin, scroll_lock, 0));
        tester.process_event(&key_down(origin, f13, 5));

        assert_eq!(tester.current_count(), 2);
        assert_eq!(tester.max_rollover(), 2);
    }

    #[test]
    fn repeated_press_is_idempotent() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&key_down(origin, KEY_A, 0));
        tester.process_event(&key_down(origin, KEY_A, 30));
        tester.process_event(&key_down(origin, KEY_A, 60));

        assert_eq!(tester.current_count(), 1);
        assert_eq!(tester.max_rollover(), 1);
    }

    #[test]
    fn release_decrements_count() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&key_down(origin, KEY_A, 0));
        tester.process_event(&key_down(origin, KEY_B, 0));
        tester.process_event(&key_up(origin, KEY_A, 50));

        assert_eq!(tester.pressed_keys().collect::<Vec<_>>(), vec![KEY_B]);
    }

    #[test]
    fn max_survives_release_and_focus_loss() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        for code in 30..34 {
            tester.process_event(&key_down(origin, KeyCode(code), 0));
        }
        tester.process_event(&key_up(origin, KeyCode(30), 20));
        tester.process_event(&InputEvent::FocusLost);

        assert_eq!(tester.current_count(), 0);
        assert_eq!(tester.max_rollover(), 4);
        assert_eq!(tester.rollover_rating(), "4KRO");
    }

    #[test]
    fn rollover_rating_nkro() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        for code in 16..28 {
            tester.process_event(&key_down(origin, KeyCode(code), 0));
        }
        assert_eq!(tester.rollover_rating(), "NKRO");
    }

    #[test]
    fn active_keys_listed_by_name() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&key_down(origin, KEY_B, 0));
        tester.process_event(&key_down(origin, KEY_A, 0));

        let results = tester.get_results();
        let active = results.iter().find(|r| r.label == "Active Keys").unwrap();
        assert_eq!(active.value, "KeyA + KeyB");
    }

    #[test]
    fn reset_twice_equals_once() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&key_down(origin, KEY_A, 0));
        tester.reset();
        tester.reset();

        assert_eq!(tester.current_count(), 0);
        assert_eq!(tester.max_rollover(), 0);
        assert!(tester.summary().ends_with(NO_DATA_RESULT));
    }
}
