//! Pointer polling rate test module

use super::{format_summary, ResultStatus, TestResult, Tester};
use crate::feedback::Cue;
use crate::input::{FrameRequest, InputEvent};
use std::collections::VecDeque;
use std::time::Instant;

/// Samples kept in the sliding window
pub const WINDOW_CAPACITY: usize = 500;

/// One pointer position, relative to the measuring surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSample {
    pub x: f64,
    pub y: f64,
    pub timestamp: Instant,
}

/// Rates derived from the sample window, unrounded
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PollStats {
    pub current_hz: f64,
    pub average_hz: f64,
    /// Running maximum of `current_hz` since the last reset
    pub max_hz: f64,
    /// Samples currently in the window
    pub count: usize,
}

impl PollStats {
    pub fn current_rounded(&self) -> u64 {
        self.current_hz.round() as u64
    }

    pub fn average_rounded(&self) -> u64 {
        self.average_hz.round() as u64
    }

    pub fn max_rounded(&self) -> u64 {
        self.max_hz.round() as u64
    }

    /// At least one interval has produced a rate
    pub fn has_rate(&self) -> bool {
        self.max_hz > 0.0
    }
}

/// Whether the surface has seen any movement yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Measuring,
}

/// Estimates pointer report rate from move-event inter-arrival times
pub struct PollingRateTester {
    /// Oldest first
    samples: VecDeque<PollSample>,
    stats: PollStats,
    phase: PollPhase,
    /// Coalesced redraw of the trace
    frame: FrameRequest,
    /// Points as of the last drawn frame
    trace: Vec<(f64, f64)>,
    frames_drawn: u64,
    active: bool,
}

impl PollingRateTester {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW_CAPACITY + 1),
            stats: PollStats::default(),
            phase: PollPhase::Idle,
            frame: FrameRequest::new(),
            trace: Vec::with_capacity(WINDOW_CAPACITY),
            frames_drawn: 0,
            active: false,
        }
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn samples(&self) -> impl Iterator<Item = &PollSample> {
        self.samples.iter()
    }

    /// Trace as of the last drawn frame
    pub fn trace(&self) -> &[(f64, f64)] {
        &self.trace
    }

    pub fn redraw_pending(&self) -> bool {
        self.frame.is_pending()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Animation frame callback. Redraws the trace if a redraw was requested
    /// since the previous frame; returns whether it drew.
    pub fn on_frame(&mut self) -> bool {
        if !self.frame.take() {
            return false;
        }
        self.trace.clear();
        self.trace.extend(self.samples.iter().map(|s| (s.x, s.y)));
        self.frames_drawn += 1;
        true
    }

    fn record_sample(&mut self, sample: PollSample) {
        self.phase = PollPhase::Measuring;

        self.samples.push_back(sample);
        if self.samples.len() > WINDOW_CAPACITY {
            self.samples.pop_front();
        }

        self.update_stats();
        self.frame.request();
    }

    fn update_stats(&mut self) {
        let len = self.samples.len();
        self.stats.count = len;
        if len < 2 {
            return;
        }

        let (Some(first), Some(prev), Some(last)) = (
            self.samples.front(),
            self.samples.get(len - 2),
            self.samples.back(),
        ) else {
            return;
        };

        let interval_ms = elapsed_ms(prev.timestamp, last.timestamp);
        // Two reports with the same timestamp carry no rate information
        if interval_ms > 0.0 {
            let current = 1000.0 / interval_ms;
            self.stats.current_hz = current;
            self.stats.max_hz = self.stats.max_hz.max(current);
        }

        let span_ms = elapsed_ms(first.timestamp, last.timestamp);
        self.stats.average_hz = if span_ms > 0.0 {
            1000.0 * (len - 1) as f64 / span_ms
        } else {
            0.0
        };
    }
}

fn elapsed_ms(from: Instant, to: Instant) -> f64 {
    to.saturating_duration_since(from).as_secs_f64() * 1000.0
}

impl Default for PollingRateTester {
    fn default() -> Self {
        Self::new()
    }
}

impl Tester for PollingRateTester {
    fn name(&self) -> &'static str {
        "Polling Rate Test"
    }

    fn description(&self) -> &'static str {
        "Measures pointer report rate from the timing of move events"
    }

    fn process_event(&mut self, event: &InputEvent) -> Cue {
        if !self.active {
            return Cue::None;
        }

        if let InputEvent::PointerMove { x, y, timestamp } = event {
            self.record_sample(PollSample {
                x: *x,
                y: *y,
                timestamp: *timestamp,
            });
        }
        Cue::None
    }

    fn activate(&mut self, _now: Instant) {
        self.active = true;
        // Surface is redrawn on the first frame after becoming visible
        self.frame.request();
    }

    /// The window only spans the active period; the rates already derived
    /// stay for the report.
    fn deactivate(&mut self) {
        self.active = false;
        self.frame.cancel();
        self.samples.clear();
        self.trace.clear();
        self.stats.count = 0;
        self.phase = PollPhase::Idle;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn get_results(&self) -> Vec<TestResult> {
        let mut results = Vec::new();

        if self.phase == PollPhase::Idle {
            results.push(TestResult::info("Status", "Move the mouse over the surface"));
        }

        results.push(TestResult::info(
            "Current Rate",
            format!("{} Hz", self.stats.current_rounded()),
        ));

        let avg = self.stats.average_hz;
        let status = if !self.stats.has_rate() {
            ResultStatus::Info
        } else if avg >= 500.0 {
            ResultStatus::Ok
        } else if avg >= 125.0 {
            ResultStatus::Warning
        } else {
            ResultStatus::Error
        };
        results.push(TestResult::new(
            "Average Rate",
            format!("{} Hz", self.stats.average_rounded()),
            status,
        ));

        results.push(TestResult::info(
            "Maximum Rate",
            format!("{} Hz", self.stats.max_rounded()),
        ));
        results.push(TestResult::info("Event Count", self.stats.count.to_string()));

        results
    }

    fn summary(&self) -> String {
        if !self.stats.has_rate() {
            return String::new();
        }

        format_summary(
            "Polling Rate Test Results",
            &[
                ("Average Rate", format!("{} Hz", self.stats.average_rounded())),
                ("Maximum Rate", format!("{} Hz", self.stats.max_rounded())),
            ],
        )
    }

    fn reset(&mut self) {
        self.samples.clear();
        self.stats = PollStats::default();
        self.phase = PollPhase::Idle;
        self.frame.cancel();
        // Draw the empty surface immediately
        self.trace.clear();
    }
}
