//! Persisted settings for Input TestKit
//!
//! Three values survive between runs: the color theme, whether audible
//! feedback is on, and the keyboard visual scale. They are read once at
//! startup and written back after every change.
//!
//! ## Settings File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/input-testkit/settings.toml` |
//! | macOS | `~/Library/Application Support/input-testkit/settings.toml` |
//! | Windows | `%APPDATA%\input-testkit\settings.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use input_testkit::Settings;
//!
//! let mut settings = Settings::load().unwrap_or_default();
//! settings.toggle_theme();
//! settings.save().expect("Failed to save settings");
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Smallest keyboard scale, in percent
pub const MIN_KEYBOARD_SCALE: u8 = 70;
/// Largest keyboard scale, in percent
pub const MAX_KEYBOARD_SCALE: u8 = 120;
/// Keyboard scale used when nothing is stored
pub const DEFAULT_KEYBOARD_SCALE: u8 = 80;

/// Error type for settings operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Directory holding the settings and log files.
///
/// Creates the directory if it doesn't exist.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = base.join("input-testkit");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir)
}

/// Path to the settings file
pub fn settings_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Color theme options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// User settings shared with every tester as read-only context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub sound_enabled: bool,
    /// Keyboard visual scale in percent
    pub keyboard_scale: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            sound_enabled: false,
            keyboard_scale: DEFAULT_KEYBOARD_SCALE,
        }
    }
}

impl Settings {
    /// Load settings from the default file.
    ///
    /// Returns defaults if the file doesn't exist, an error if it exists but
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = settings_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&contents)?;
        Ok(settings.clamped())
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = settings_path()?;
        self.save_to(&path)
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Pull out-of-range values back into range
    pub fn clamped(mut self) -> Self {
        self.keyboard_scale = self
            .keyboard_scale
            .clamp(MIN_KEYBOARD_SCALE, MAX_KEYBOARD_SCALE);
        self
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    /// Change the keyboard scale by `delta` percent, staying in range.
    /// Returns true if the value changed.
    pub fn adjust_keyboard_scale(&mut self, delta: i16) -> bool {
        let next = (self.keyboard_scale as i16 + delta)
            .clamp(MIN_KEYBOARD_SCALE as i16, MAX_KEYBOARD_SCALE as i16) as u8;
        let changed = next != self.keyboard_scale;
        self.keyboard_scale = next;
        changed
    }

    /// Keyboard scale as a factor (0.7 - 1.2)
    pub fn keyboard_scale_factor(&self) -> f64 {
        self.keyboard_scale as f64 / 100.0
    }
}
