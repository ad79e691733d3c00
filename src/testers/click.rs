//! Click and scroll-wheel test module

use super::{format_summary, ResultStatus, TestResult, Tester};
use crate::feedback::Cue;
use crate::input::{InputEvent, MouseButton};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Smallest double-click threshold, in ms
pub const MIN_THRESHOLD_MS: u64 = 50;
/// Largest double-click threshold, in ms
pub const MAX_THRESHOLD_MS: u64 = 200;
/// Threshold adjustment step, in ms
pub const THRESHOLD_STEP_MS: u64 = 10;
/// Threshold used until the user changes it
pub const DEFAULT_THRESHOLD_MS: u64 = 100;

const CLICK_LOG_CAPACITY: usize = 11;
const SCROLL_LOG_CAPACITY: usize = 32;

/// Click counters, reset together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickStats {
    pub total: u64,
    pub double: u64,
    pub left: u64,
    pub middle: u64,
    pub right: u64,
}

/// One recorded button press
#[derive(Debug, Clone, PartialEq)]
pub struct ClickLogEntry {
    pub button: MouseButton,
    /// Time since the previous press; `None` for the first press
    pub gap_ms: Option<f64>,
    pub is_double: bool,
}

/// One recorded wheel movement
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollLogEntry {
    /// Signed vertical delta; negative scrolls up
    pub delta: f64,
    /// Time since the previous wheel event, 0 for the first
    pub gap_ms: f64,
}

/// Counts button presses, flags double-clicks and logs wheel activity
pub struct ClickTester {
    threshold: Duration,
    stats: ClickStats,
    /// Most recent first
    click_log: VecDeque<ClickLogEntry>,
    /// Most recent first
    scroll_log: VecDeque<ScrollLogEntry>,
    scroll_events: u64,
    last_press: Option<Instant>,
    last_scroll: Option<Instant>,
    /// A button is held over the hit target
    pressed: bool,
    active: bool,
}

impl ClickTester {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD_MS)
    }

    pub fn with_threshold(threshold_ms: u64) -> Self {
        Self {
            threshold: Duration::from_millis(snap_threshold(threshold_ms)),
            stats: ClickStats::default(),
            click_log: VecDeque::with_capacity(CLICK_LOG_CAPACITY + 1),
            scroll_log: VecDeque::with_capacity(SCROLL_LOG_CAPACITY + 1),
            scroll_events: 0,
            last_press: None,
            last_scroll: None,
            pressed: false,
            active: false,
        }
    }

    pub fn stats(&self) -> ClickStats {
        self.stats
    }

    pub fn click_log(&self) -> impl Iterator<Item = &ClickLogEntry> {
        self.click_log.iter()
    }

    pub fn scroll_log(&self) -> impl Iterator<Item = &ScrollLogEntry> {
        self.scroll_log.iter()
    }

    /// Wheel events recorded since the last reset
    pub fn scroll_events(&self) -> u64 {
        self.scroll_events
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold.as_millis() as u64
    }

    /// Set the double-click threshold, clamped to range and snapped to the step
    pub fn set_threshold(&mut self, threshold_ms: u64) {
        self.threshold = Duration::from_millis(snap_threshold(threshold_ms));
    }

    /// Move the threshold by `steps` increments of 10 ms
    pub fn adjust_threshold(&mut self, steps: i64) {
        let next = self.threshold_ms() as i64 + steps * THRESHOLD_STEP_MS as i64;
        self.set_threshold(next.max(0) as u64);
    }

    fn record_press(&mut self, button: MouseButton, now: Instant) {
        self.pressed = true;

        let gap = self.last_press.map(|last| now.saturating_duration_since(last));
        let is_double = gap.is_some_and(|g| g <= self.threshold);

        self.stats.total += 1;
        if is_double {
            self.stats.double += 1;
        }
        match button {
            MouseButton::Left => self.stats.left += 1,
            MouseButton::Middle => self.stats.middle += 1,
            MouseButton::Right => self.stats.right += 1,
            MouseButton::Other(_) => {}
        }

        self.click_log.push_front(ClickLogEntry {
            button,
            gap_ms: gap.map(|g| g.as_secs_f64() * 1000.0),
            is_double,
        });
        self.click_log.truncate(CLICK_LOG_CAPACITY);

        // Chained presses compare against the one right before them
        self.last_press = Some(now);
    }

    fn record_scroll(&mut self, delta_y: f64, now: Instant) {
        let gap_ms = self
            .last_scroll
            .map(|last| now.saturating_duration_since(last).as_secs_f64() * 1000.0)
            .unwrap_or(0.0);

        self.scroll_log.push_front(ScrollLogEntry {
            delta: delta_y,
            gap_ms,
        });
        self.scroll_log.truncate(SCROLL_LOG_CAPACITY);
        self.scroll_events += 1;
        self.last_scroll = Some(now);
    }
}

fn snap_threshold(ms: u64) -> u64 {
    let clamped = ms.clamp(MIN_THRESHOLD_MS, MAX_THRESHOLD_MS);
    ((clamped + THRESHOLD_STEP_MS / 2) / THRESHOLD_STEP_MS) * THRESHOLD_STEP_MS
}

impl Default for ClickTester {
    fn default() -> Self {
        Self::new()
    }
}

impl Tester for ClickTester {
    fn name(&self) -> &'static str {
        "Click Test"
    }

    fn description(&self) -> &'static str {
        "Counts mouse buttons, flags double-clicks and logs wheel scrolling"
    }

    fn process_event(&mut self, event: &InputEvent) -> Cue {
        if !self.active {
            return Cue::None;
        }

        match event {
            InputEvent::PointerPress { button, timestamp } => {
                self.record_press(*button, *timestamp);
                Cue::Click
            }
            InputEvent::PointerRelease { .. } | InputEvent::FocusLost => {
                self.pressed = false;
                Cue::None
            }
            InputEvent::WheelScroll { delta_y, timestamp } => {
                self.record_scroll(*delta_y, *timestamp);
                Cue::None
            }
            _ => Cue::None,
        }
    }

    fn activate(&mut self, _now: Instant) {
        self.active = true;
    }

    /// Counters and logs are kept; timing anchors do not span inactive time
    fn deactivate(&mut self) {
        self.active = false;
        self.pressed = false;
        self.last_press = None;
        self.last_scroll = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn get_results(&self) -> Vec<TestResult> {
        let mut results = Vec::new();

        results.push(TestResult::info("Total Clicks", self.stats.total.to_string()));
        results.push(TestResult::info("Left Button", self.stats.left.to_string()));
        results.push(TestResult::info("Middle Button", self.stats.middle.to_string()));
        results.push(TestResult::info("Right Button", self.stats.right.to_string()));

        let status = if self.stats.double == 0 {
            ResultStatus::Ok
        } else {
            ResultStatus::Warning
        };
        results.push(TestResult::new(
            "Double-Clicks",
            self.stats.double.to_string(),
            status,
        ));

        results.push(TestResult::info(
            "Threshold",
            format!("{} ms", self.threshold_ms()),
        ));
        results.push(TestResult::info(
            "Scroll Events",
            self.scroll_events.to_string(),
        ));

        results
    }

    fn summary(&self) -> String {
        if self.stats.total == 0 && self.scroll_events == 0 {
            return String::new();
        }

        format_summary(
            "Click Test Results",
            &[
                ("Total Clicks", self.stats.total.to_string()),
                ("Left Button", self.stats.left.to_string()),
                ("Middle Button", self.stats.middle.to_string()),
                ("Right Button", self.stats.right.to_string()),
                ("Double-Clicks", self.stats.double.to_string()),
                ("Scroll Events", self.scroll_events.to_string()),
            ],
        )
    }

    fn reset(&mut self) {
        self.stats = ClickStats::default();
        self.click_log.clear();
        self.scroll_log.clear();
        self.scroll_events = 0;
        self.last_press = None;
        self.last_scroll = None;
        self.pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testers::test_helpers::*;

    fn active_tester(origin: Instant) -> ClickTester {
        let mut tester = ClickTester::new();
        tester.activate(origin);
        tester
    }

    #[test]
    fn new_tester_initial_state() {
        let tester = ClickTester::new();
        assert_eq!(tester.stats(), ClickStats::default());
        assert_eq!(tester.threshold_ms(), 100);
        assert_eq!(tester.click_log().count(), 0);
        assert!(tester.summary().is_empty());
    }

    #[test]
    fn chained_presses_each_compare_to_previous() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        for ms in [0, 40, 80] {
            tester.process_event(&click(origin, 0, ms));
        }

        assert_eq!(tester.stats().total, 3);
        assert_eq!(tester.stats().double, 2);
    }

    #[test]
    fn gap_equal_to_threshold_is_double() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&click(origin, 0, 0));
        tester.process_event(&click(origin, 0, 100));
        tester.process_event(&click(origin, 0, 201));

        assert_eq!(tester.stats().double, 1);
    }

    #[test]
    fn first_press_is_never_double() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&click(origin, 0, 1));

        let entry = tester.click_log().next().unwrap();
        assert!(!entry.is_double);
        assert_eq!(entry.gap_ms, None);
    }

    #[test]
    fn buttons_are_bucketed_by_index() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&click(origin, 0, 0));
        tester.process_event(&click(origin, 1, 500));
        tester.process_event(&click(origin, 2, 1000));
        tester.process_event(&click(origin, 4, 1500));

        let stats = tester.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.left, 1);
        assert_eq!(stats.middle, 1);
        assert_eq!(stats.right, 1);
        assert_eq!(tester.click_log().next().unwrap().button.label(), "Unknown");
    }

    #[test]
    fn click_log_keeps_most_recent_eleven() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        for i in 0..15u64 {
            tester.process_event(&click(origin, 0, i * 1000));
        }

        let gaps: Vec<_> = tester.click_log().map(|e| e.gap_ms).collect();
        assert_eq!(gaps.len(), 11);
        // Oldest entries (including the first, gapless one) were evicted
        assert!(gaps.iter().all(|g| g.is_some()));
        assert_eq!(tester.stats().total, 15);
    }

    #[test]
    fn scroll_log_keeps_most_recent_thirty_two() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        for i in 0..40u64 {
            let delta = if i % 2 == 0 { -1.0 } else { 1.0 };
            tester.process_event(&wheel(origin, delta, i * 10));
        }

        assert_eq!(tester.scroll_log().count(), 32);
        assert_eq!(tester.scroll_events(), 40);
        let newest = tester.scroll_log().next().unwrap();
        assert_eq!(newest.delta, 1.0);
        assert!((newest.gap_ms - 10.0).abs() < 1e-6);
    }

    #[test]
    fn first_scroll_gap_is_zero() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&wheel(origin, -3.0, 500));
        assert_eq!(tester.scroll_log().next().unwrap().gap_ms, 0.0);
    }

    #[test]
    fn release_only_clears_pressed_flag() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&click(origin, 0, 0));
        assert!(tester.is_pressed());

        tester.process_event(&InputEvent::PointerRelease {
            timestamp: at(origin, 50),
        });
        assert!(!tester.is_pressed());
        assert_eq!(tester.stats().total, 1);
    }

    #[test]
    fn press_returns_click_cue() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);
        assert_eq!(tester.process_event(&click(origin, 0, 0)), Cue::Click);
        assert_eq!(tester.process_event(&wheel(origin, 1.0, 5)), Cue::None);
    }

    #[test]
    fn inactive_tester_ignores_events() {
        let origin = Instant::now();
        let mut tester = ClickTester::new();
        tester.process_event(&click(origin, 0, 0));
        assert_eq!(tester.stats().total, 0);
    }

    #[test]
    fn reactivation_does_not_chain_to_earlier_press() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&click(origin, 0, 0));
        tester.process_event(&wheel(origin, 1.0, 10));
        tester.deactivate();
        tester.activate(at(origin, 20));
        tester.process_event(&click(origin, 0, 30));
        tester.process_event(&wheel(origin, 1.0, 40));

        assert_eq!(tester.stats().total, 2);
        assert_eq!(tester.stats().double, 0);
        assert_eq!(tester.click_log().next().unwrap().gap_ms, None);
        assert_eq!(tester.scroll_log().next().unwrap().gap_ms, 0.0);
        assert_eq!(tester.scroll_events(), 2);
    }

    #[test]
    fn threshold_is_clamped_and_snapped() {
        let mut tester = ClickTester::new();
        tester.set_threshold(10);
        assert_eq!(tester.threshold_ms(), 50);
        tester.set_threshold(999);
        assert_eq!(tester.threshold_ms(), 200);
        tester.set_threshold(134);
        assert_eq!(tester.threshold_ms(), 130);

        tester.adjust_threshold(-2);
        assert_eq!(tester.threshold_ms(), 110);
    }

    #[test]
    fn summary_lists_counts() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&click(origin, 0, 0));
        tester.process_event(&click(origin, 2, 30));
        tester.process_event(&wheel(origin, 1.0, 100));

        assert_eq!(
            tester.summary(),
            "--- Click Test Results ---\n\
             Total Clicks: 2\n\
             Left Button: 1\n\
             Middle Button: 0\n\
             Right Button: 1\n\
             Double-Clicks: 1\n\
             Scroll Events: 1"
        );
    }

    #[test]
    fn reset_twice_equals_once() {
        let origin = Instant::now();
        let mut tester = active_tester(origin);

        tester.process_event(&click(origin, 0, 0));
        tester.process_event(&wheel(origin, 1.0, 10));

        tester.reset();
        assert_eq!(tester.stats(), ClickStats::default());
        assert_eq!(tester.scroll_events(), 0);
        tester.reset();
        assert_eq!(tester.stats(), ClickStats::default());
        assert!(tester.summary().is_empty());

        // Chain anchor is cleared too
        tester.process_event(&click(origin, 0, 20));
        assert_eq!(tester.stats().double, 0);
    }
}
