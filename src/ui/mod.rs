//! Terminal User Interface components

mod app;
mod keyboard_visual;
pub mod theme;
mod widgets;

pub use app::{App, AppState, AppView, Command, STATUS_TIMEOUT};
pub use keyboard_visual::{KeyGlyph, KeySlot, KeyboardLayout, KeyboardVisual};
pub use theme::ThemeColors;
pub use widgets::*;
