//! Input tester state machines
//!
//! Each tester folds a stream of [`InputEvent`]s into bounded rolling state
//! and exposes the same contract to the host: process events, advance its
//! own timers, report results and reset.

mod click;
mod keyboard;
mod polling;
mod rollover;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use click::{ClickLogEntry, ClickStats, ClickTester, ScrollLogEntry};
pub use keyboard::{KeyState, KeyboardTester, LastKey};
pub use polling::{PollPhase, PollSample, PollStats, PollingRateTester};
pub use rollover::{KeyRolloverTester, NO_DATA_RESULT};

use crate::feedback::Cue;
use crate::input::InputEvent;
use std::time::Instant;

/// Common contract for all testers
pub trait Tester {
    /// Name of the tester
    fn name(&self) -> &'static str;

    /// Short description
    fn description(&self) -> &'static str;

    /// Fold one input event into the tester's state
    fn process_event(&mut self, event: &InputEvent) -> Cue;

    /// Advance periodic work to `now`
    fn tick(&mut self, _now: Instant) {}

    /// Start receiving input; arms any periodic timers
    fn activate(&mut self, now: Instant);

    /// Stop receiving input; cancels timers and pending redraws
    fn deactivate(&mut self);

    fn is_active(&self) -> bool;

    /// Live result lines for the results panel
    fn get_results(&self) -> Vec<TestResult>;

    /// Plain-text summary for the exported report.
    ///
    /// Empty when nothing meaningful has been recorded.
    fn summary(&self) -> String;

    /// Restore the initial state. Calling it twice is the same as once.
    fn reset(&mut self);
}

/// Render a summary block: header line followed by `Label: value` lines
pub(crate) fn format_summary(header: &str, lines: &[(&str, String)]) -> String {
    let mut out = format!("--- {} ---", header);
    for (label, value) in lines {
        out.push('\n');
        out.push_str(label);
        out.push_str(": ");
        out.push_str(value);
    }
    out
}

/// A single test result entry
#[derive(Debug, Clone)]
pub struct TestResult {
    pub label: String,
    pub value: String,
    pub status: ResultStatus,
}

impl TestResult {
    pub fn new(label: impl Into<String>, value: impl Into<String>, status: ResultStatus) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            status,
        }
    }

    pub fn ok(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Ok)
    }

    pub fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Warning)
    }

    pub fn error(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Error)
    }

    pub fn info(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Info)
    }
}

/// Status of a test result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Ok,
    Warning,
    Error,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_summary_joins_lines() {
        let text = format_summary(
            "Demo Test Results",
            &[("Count", "3".to_string()), ("Rate", "5 Hz".to_string())],
        );
        assert_eq!(text, "--- Demo Test Results ---\nCount: 3\nRate: 5 Hz");
    }
}
