//! Key press timing, typing rate and stuck-key test module

use super::{format_summary, ResultStatus, TestResult, Tester};
use crate::feedback::Cue;
use crate::input::{is_printable, InputEvent, Interval, KeyCode};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// A key held longer than this without a release is flagged as stuck
pub const STUCK_KEY_TIMEOUT: Duration = Duration::from_millis(2000);
/// Trailing window used for the typing rate
pub const TYPING_WINDOW: Duration = Duration::from_secs(10);

const TYPING_TICK_MS: u64 = 250;
const STUCK_SCAN_MS: u64 = 500;

/// Visual state of a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Not touched since the last reset or focus loss
    Idle,
    /// Physically held
    Pressed,
    /// Pressed and released cleanly
    Ok,
    /// Held past the stuck-key timeout
    Fail,
}

/// Most recent key-down, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastKey {
    pub key: String,
    pub code: KeyCode,
}

/// Tracks per-key press/release timing
pub struct KeyboardTester {
    key_states: HashMap<KeyCode, KeyState>,
    /// Press time of every key currently held
    down_times: HashMap<KeyCode, Instant>,
    /// Timestamps of printable key-downs, oldest first
    char_hits: VecDeque<Instant>,
    chars_per_second: f64,
    last_key: Option<LastKey>,
    last_depress_ms: Option<u64>,
    typing_tick: Interval,
    stuck_scan: Interval,
    active: bool,
}

impl KeyboardTester {
    pub fn new() -> Self {
        Self {
            key_states: HashMap::new(),
            down_times: HashMap::new(),
            char_hits: VecDeque::new(),
            chars_per_second: 0.0,
            last_key: None,
            last_depress_ms: None,
            typing_tick: Interval::from_millis(TYPING_TICK_MS),
            stuck_scan: Interval::from_millis(STUCK_SCAN_MS),
            active: false,
        }
    }

    pub fn key_state(&self, code: KeyCode) -> KeyState {
        self.key_states.get(&code).copied().unwrap_or(KeyState::Idle)
    }

    pub fn key_states(&self) -> impl Iterator<Item = (KeyCode, KeyState)> + '_ {
        self.key_states.iter().map(|(code, state)| (*code, *state))
    }

    /// Keys that were pressed and released cleanly
    pub fn keys_tested(&self) -> usize {
        self.key_states
            .values()
            .filter(|state| **state == KeyState::Ok)
            .count()
    }

    pub fn stuck_keys(&self) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self
            .key_states
            .iter()
            .filter(|(_, state)| **state == KeyState::Fail)
            .map(|(code, _)| *code)
            .collect();
        keys.sort();
        keys
    }

    pub fn held_count(&self) -> usize {
        self.down_times.len()
    }

    /// Typing rate as of the last refresh tick
    pub fn chars_per_second(&self) -> f64 {
        self.chars_per_second
    }

    pub fn last_key(&self) -> Option<&LastKey> {
        self.last_key.as_ref()
    }

    /// Hold time of the last released key, in whole ms
    pub fn last_depress_ms(&self) -> Option<u64> {
        self.last_depress_ms
    }

    fn key_down(&mut self, code: KeyCode, key: &str, now: Instant) -> Cue {
        let mut cue = Cue::None;

        // Auto-repeat must not move the press time
        if !self.down_times.contains_key(&code) {
            self.down_times.insert(code, now);
            self.key_states.insert(code, KeyState::Pressed);
            cue = Cue::Key;
        }

        self.last_key = Some(LastKey {
            key: key.to_string(),
            code,
        });

        if is_printable(key) {
            self.char_hits.push_back(now);
        }

        cue
    }

    fn key_up(&mut self, code: KeyCode, now: Instant) {
        if let Some(pressed_at) = self.down_times.remove(&code) {
            let held = now.saturating_duration_since(pressed_at);
            self.last_depress_ms = Some((held.as_secs_f64() * 1000.0).round() as u64);
        }
        self.key_states.insert(code, KeyState::Ok);
    }

    /// Drop all press state; typing history is left to age out
    fn clear_press_state(&mut self) {
        self.down_times.clear();
        self.key_states.clear();
    }

    /// Forget keys that are still held; released keys keep their result
    fn drop_held_keys(&mut self) {
        for (code, _) in self.down_times.drain() {
            self.key_states.remove(&code);
        }
    }

    fn refresh_typing_rate(&mut self, now: Instant) {
        self.char_hits
            .retain(|hit| now.saturating_duration_since(*hit) < TYPING_WINDOW);
        self.chars_per_second = self.char_hits.len() as f64 / TYPING_WINDOW.as_secs_f64();
    }

    fn scan_stuck_keys(&mut self, now: Instant) {
        for (code, pressed_at) in &self.down_times {
            if now.saturating_duration_since(*pressed_at) > STUCK_KEY_TIMEOUT {
                let previous = self.key_states.insert(*code, KeyState::Fail);
                if previous != Some(KeyState::Fail) {
                    log::debug!("key {} held past stuck-key timeout", code);
                }
            }
        }
    }
}

impl Default for KeyboardTester {
    fn default() -> Self {
        Self::new()
    }
}

impl Tester for KeyboardTester {
    fn name(&self) -> &'static str {
        "Keyboard Test"
    }

    fn description(&self) -> &'static str {
        "Times key presses, measures typing rate and detects stuck keys"
    }

    fn process_event(&mut self, event: &InputEvent) -> Cue {
        if !self.active {
            return Cue::None;
        }

        match event {
            InputEvent::KeyDown {
                code,
                key,
                timestamp,
            } => self.key_down(*code, key, *timestamp),
            InputEvent::KeyUp { code, timestamp } => {
                self.key_up(*code, *timestamp);
                Cue::None
            }
            InputEvent::FocusLost => {
                self.clear_press_state();
                Cue::None
            }
            _ => Cue::None,
        }
    }

    fn tick(&mut self, now: Instant) {
        if !self.active {
            return;
        }

        // Timers cancelled by a reset come back on the next tick
        if !self.typing_tick.is_armed() {
            self.typing_tick.start(now);
        }
        if !self.stuck_scan.is_armed() {
            self.stuck_scan.start(now);
        }

        if self.typing_tick.poll(now) {
            self.refresh_typing_rate(now);
        }
        if self.stuck_scan.poll(now) {
            self.scan_stuck_keys(now);
        }
    }

    fn activate(&mut self, now: Instant) {
        self.active = true;
        self.typing_tick.start(now);
        self.stuck_scan.start(now);
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.typing_tick.cancel();
        self.stuck_scan.cancel();
        // Releases are not observed while inactive
        self.drop_held_keys();
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn get_results(&self) -> Vec<TestResult> {
        let mut results = Vec::new();

        let last_key = match &self.last_key {
            Some(last) => format!("{} ({})", display_key(&last.key), last.code),
            None => "N/A".to_string(),
        };
        results.push(TestResult::info("Last Key", last_key));
        results.push(TestResult::info(
            "Depress Time",
            format!("{} ms", self.last_depress_ms.unwrap_or(0)),
        ));
        results.push(TestResult::info(
            "Chars / Sec",
            format!("{:.1}", self.chars_per_second),
        ));
        results.push(TestResult::ok("Keys Tested", self.keys_tested().to_string()));
        results.push(TestResult::info("Held Keys", self.held_count().to_string()));

        let stuck = self.stuck_keys();
        if stuck.is_empty() {
            results.push(TestResult::ok("Stuck Keys", "None detected"));
        } else {
            let names: Vec<String> = stuck.iter().map(|code| code.to_string()).collect();
            results.push(TestResult::new(
                "Stuck Keys",
                names.join(", "),
                ResultStatus::Error,
            ));
        }

        results
    }

    fn summary(&self) -> String {
        if self.key_states.is_empty() && self.chars_per_second == 0.0 {
            return String::new();
        }

        format_summary(
            "Keyboard Test Results",
            &[
                ("Keys Tested", self.keys_tested().to_string()),
                ("Average CPS", format!("{:.1}", self.chars_per_second)),
            ],
        )
    }

    fn reset(&mut self) {
        self.clear_press_state();
        self.char_hits.clear();
        self.chars_per_second = 0.0;
        self.last_key = None;
        self.last_depress_ms = None;
        self.typing_tick.cancel();
        self.stuck_scan.cancel();
    }
}

fn display_key(key: &str) -> &str {
    if key == " " {
        "Space"
    } else {
        key
    }
}
