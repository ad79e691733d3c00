//! Input TestKit - terminal diagnostics for mice and keyboards
//!
//! Four testers share one event-driven contract: clicks and double-clicks,
//! pointer polling rate, per-key press timing with stuck-key detection, and
//! key rollover. A host shell switches between them and exports a combined
//! plain-text report.

pub mod config;
pub mod feedback;
pub mod input;
pub mod report;
pub mod testers;
pub mod ui;

pub use config::{Settings, Theme};
pub use input::{InputEvent, KeyCode};
pub use testers::Tester;
