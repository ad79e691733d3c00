//! Theme color definitions for the UI
//!
//! Provides dark and light color palettes that can be switched at runtime.

use crate::config::Theme;
use crate::testers::{KeyState, ResultStatus};
use ratatui::style::Color;

/// Complete color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Main background
    pub bg: Color,
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (headings, active tab, trace line)
    pub accent: Color,
    /// Success / OK status
    pub green: Color,
    /// Warning status
    pub yellow: Color,
    /// Error status
    pub red: Color,
    /// Informational values
    pub cyan: Color,
    /// Key idle (untouched) background
    pub key_off: Color,
    /// Key held background
    pub key_on: Color,
    /// Key released cleanly background
    pub key_ok: Color,
    /// Key stuck background
    pub key_fail: Color,
    /// Key label text (idle)
    pub key_text: Color,
    /// Key label text on a filled key
    pub key_text_on: Color,
    /// Click pad background
    pub pad: Color,
    /// Click pad background while a button is held
    pub pad_pressed: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(22, 22, 30),
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            accent: Color::Rgb(240, 140, 60),
            green: Color::Rgb(80, 200, 120),
            yellow: Color::Rgb(240, 180, 80),
            red: Color::Rgb(240, 90, 100),
            cyan: Color::Rgb(80, 200, 220),
            key_off: Color::Rgb(40, 40, 50),
            key_on: Color::Rgb(90, 90, 110),
            key_ok: Color::Rgb(30, 90, 60),
            key_fail: Color::Rgb(130, 30, 40),
            key_text: Color::Rgb(180, 180, 190),
            key_text_on: Color::Rgb(235, 235, 240),
            pad: Color::Rgb(200, 100, 40),
            pad_pressed: Color::Rgb(150, 70, 25),
        }
    }

    /// High contrast for bright terminals
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(245, 245, 248),
            fg: Color::Rgb(30, 30, 40),
            dim: Color::Rgb(130, 130, 150),
            accent: Color::Rgb(210, 100, 20),
            green: Color::Rgb(30, 150, 70),
            yellow: Color::Rgb(180, 120, 0),
            red: Color::Rgb(200, 50, 60),
            cyan: Color::Rgb(0, 130, 160),
            key_off: Color::Rgb(220, 220, 228),
            key_on: Color::Rgb(190, 190, 205),
            key_ok: Color::Rgb(200, 240, 215),
            key_fail: Color::Rgb(250, 200, 205),
            key_text: Color::Rgb(50, 50, 60),
            key_text_on: Color::Rgb(20, 20, 25),
            pad: Color::Rgb(250, 160, 90),
            pad_pressed: Color::Rgb(225, 125, 55),
        }
    }

    pub fn status_color(&self, status: ResultStatus) -> Color {
        match status {
            ResultStatus::Ok => self.green,
            ResultStatus::Warning => self.yellow,
            ResultStatus::Error => self.red,
            ResultStatus::Info => self.cyan,
        }
    }

    /// Background and text colors for a key cap
    pub fn key_colors(&self, state: KeyState) -> (Color, Color) {
        match state {
            KeyState::Idle => (self.key_off, self.key_text),
            KeyState::Pressed => (self.key_on, self.key_text_on),
            KeyState::Ok => (self.key_ok, self.key_text_on),
            KeyState::Fail => (self.key_fail, self.key_text_on),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_theme_selects_correct_palette() {
        let dark = ThemeColors::from_theme(Theme::Dark);
        let light = ThemeColors::from_theme(Theme::Light);
        assert_eq!(dark.bg, Color::Rgb(22, 22, 30));
        assert_eq!(light.bg, Color::Rgb(245, 245, 248));
    }

    #[test]
    fn key_states_have_distinct_colors() {
        let colors = ThemeColors::dark();
        let states = [KeyState::Idle, KeyState::Pressed, KeyState::Ok, KeyState::Fail];
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(colors.key_colors(*a).0, colors.key_colors(*b).0);
            }
        }
    }

    #[test]
    fn status_colors_follow_palette() {
        let colors = ThemeColors::light();
        assert_eq!(colors.status_color(ResultStatus::Ok), colors.green);
        assert_eq!(colors.status_color(ResultStatus::Error), colors.red);
    }
}
