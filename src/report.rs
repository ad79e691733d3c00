//! Combined session report and export

use crate::testers::NO_DATA_RESULT;
use chrono::{DateTime, Local, TimeZone};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// First line of every exported report
pub const REPORT_HEADER: &str = "TESTING REPORT";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Whether a tester summary belongs in the combined report
pub fn is_reportable(summary: &str) -> bool {
    if summary.trim().is_empty() {
        return false;
    }
    !summary.lines().any(|line| line.trim() == NO_DATA_RESULT)
}

/// Human-readable report date, e.g. `Friday, October 16, 2026 at 3:04:05 PM`
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%A, %B %-d, %Y at %-I:%M:%S %p").to_string()
}

/// Join tester summaries under the report header, skipping empty and
/// "no data" results
pub fn build_report<Tz, S>(summaries: &[S], generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    S: AsRef<str>,
{
    let body: Vec<&str> = summaries
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| is_reportable(s))
        .collect();

    let report = format!(
        "{}\nDate: {}\n\n{}",
        REPORT_HEADER,
        format_timestamp(generated_at),
        body.join("\n\n")
    );
    report.trim().to_string()
}

/// Destination for an assembled report
pub trait ReportSink {
    /// Deliver the report; returns a short description of where it went
    fn deliver(&mut self, report: &str) -> Result<String, ExportError>;
}

/// Writes each report to a timestamped text file
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sink writing into the current working directory
    pub fn current_dir() -> Self {
        Self::new(".")
    }
}

impl ReportSink for FileSink {
    fn deliver(&mut self, report: &str) -> Result<String, ExportError> {
        let filename = format!(
            "input_report_{}.txt",
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.dir.join(filename);
        fs::write(&path, report)?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 15, 4, 5).unwrap()
    }

    #[test]
    fn timestamp_is_long_form() {
        assert_eq!(
            format_timestamp(&fixed_time()),
            "Friday, October 16, 2026 at 3:04:05 PM"
        );
    }

    #[test]
    fn rollover_without_data_is_not_reportable() {
        assert!(!is_reportable(
            "--- Key Rollover Test Results ---\nMax Concurrent Keys: 0"
        ));
        assert!(is_reportable(
            "--- Key Rollover Test Results ---\nMax Concurrent Keys: 10"
        ));
        assert!(!is_reportable("  \n"));
    }

    #[test]
    fn report_joins_results_with_blank_lines() {
        let summaries = vec![
            "--- Click Test Results ---\nTotal Clicks: 3".to_string(),
            String::new(),
            "--- Keyboard Test Results ---\nKeys Tested: 2\nAverage CPS: 0.4".to_string(),
            "--- Key Rollover Test Results ---\nMax Concurrent Keys: 0".to_string(),
        ];

        let report = build_report(&summaries, &fixed_time());

        assert_eq!(
            report,
            "TESTING REPORT\n\
             Date: Friday, October 16, 2026 at 3:04:05 PM\n\
             \n\
             --- Click Test Results ---\n\
             Total Clicks: 3\n\
             \n\
             --- Keyboard Test Results ---\n\
             Keys Tested: 2\n\
             Average CPS: 0.4"
        );
    }

    #[test]
    fn report_with_no_results_is_just_header() {
        let report = build_report::<Utc, &str>(&[], &fixed_time());
        assert_eq!(
            report,
            "TESTING REPORT\nDate: Friday, October 16, 2026 at 3:04:05 PM"
        );
    }

    #[test]
    fn file_sink_writes_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = FileSink::new(dir.path());

        let location = sink.deliver("TESTING REPORT").expect("deliver");

        let written = fs::read_to_string(&location).expect("read back");
        assert_eq!(written, "TESTING REPORT");
        assert!(location.contains("input_report_"));
    }

    #[test]
    fn header_only_report_is_still_delivered() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = FileSink::new(dir.path());
        let report = build_report::<Utc, &str>(&[], &fixed_time());

        let location = sink.deliver(&report).expect("deliver");

        assert_eq!(fs::read_to_string(&location).expect("read back"), report);
    }

    #[test]
    fn file_sink_missing_dir_fails() {
        let mut sink = FileSink::new("/nonexistent/input-testkit/reports");
        assert!(matches!(sink.deliver("TESTING REPORT"), Err(ExportError::Io(_))));
    }
}
