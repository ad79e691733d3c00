//! Input events, key codes and the sources that produce them

pub mod clock;
mod event;
pub mod keymap;
mod listener;

pub use clock::{Clock, FrameRequest, Interval, ManualClock, SystemClock};
pub use event::{is_printable, InputEvent, MouseButton};
pub use keymap::{get_key_info, KeyCode, KeyInfo, KEYMAP};
pub use listener::{diff_keys, KeyboardListener};
