//! Key code definitions and key naming

use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, Mutex};

/// First code handed out to keys without a fixed scancode
const UNMAPPED_BASE: u16 = 0x1000;

/// Codes assigned to unmapped keys so far, by backend key name
static UNMAPPED: LazyLock<Mutex<HashMap<String, KeyCode>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Represents a physical key code (evdev scancode numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Look up a key by its DOM-style code name, e.g. `"KeyA"`
    pub fn from_name(name: &str) -> Option<Self> {
        KEYMAP
            .iter()
            .find(|(_, info)| info.name == name)
            .map(|(code, _)| *code)
    }

    pub fn info(&self) -> Option<&'static KeyInfo> {
        KEYMAP.get(self)
    }

    /// Code for a key the scancode table does not cover, stable for the
    /// life of the process. Different names never share a code.
    pub fn unmapped(name: &str) -> Self {
        let mut table = match UNMAPPED.lock() {
            Ok(table) => table,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(code) = table.get(name) {
            return *code;
        }
        let code = KeyCode(UNMAPPED_BASE.saturating_add(table.len() as u16));
        table.insert(name.to_string(), code);
        code
    }
}

impl From<u16> for KeyCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.info() {
            Some(info) => f.write_str(info.name),
            None => write!(f, "Scancode{}", self.0),
        }
    }
}

impl From<device_query::Keycode> for KeyCode {
    fn from(keycode: device_query::Keycode) -> Self {
        use device_query::Keycode as DK;
        let code = match keycode {
            DK::Escape => 1,
            DK::Key1 => 2,
            DK::Key2 => 3,
            DK::Key3 => 4,
            DK::Key4 => 5,
            DK::Key5 => 6,
            DK::Key6 => 7,
            DK::Key7 => 8,
            DK::Key8 => 9,
            DK::Key9 => 10,
            DK::Key0 => 11,
            DK::Minus => 12,
            DK::Equal => 13,
            DK::Backspace => 14,
            DK::Tab => 15,
            DK::Q => 16,
            DK::W => 17,
            DK::E => 18,
            DK::R => 19,
            DK::T => 20,
            DK::Y => 21,
            DK::U => 22,
            DK::I => 23,
            DK::O => 24,
            DK::P => 25,
            DK::LeftBracket => 26,
            DK::RightBracket => 27,
            DK::Enter => 28,
            DK::LControl => 29,
            DK::A => 30,
            DK::S => 31,
            DK::D => 32,
            DK::F => 33,
            DK::G => 34,
            DK::H => 35,
            DK::J => 36,
            DK::K => 37,
            DK::L => 38,
            DK::Semicolon => 39,
            DK::Apostrophe => 40,
            DK::Grave => 41,
            DK::LShift => 42,
            DK::BackSlash => 43,
            DK::Z => 44,
            DK::X => 45,
            DK::C => 46,
            DK::V => 47,
            DK::B => 48,
            DK::N => 49,
            DK::M => 50,
            DK::Comma => 51,
            DK::Dot => 52,
            DK::Slash => 53,
            DK::RShift => 54,
            DK::NumpadMultiply => 55,
            DK::LAlt => 56,
            DK::Space => 57,
            DK::CapsLock => 58,
            DK::F1 => 59,
            DK::F2 => 60,
            DK::F3 => 61,
            DK::F4 => 62,
            DK::F5 => 63,
            DK::F6 => 64,
            DK::F7 => 65,
            DK::F8 => 66,
            DK::F9 => 67,
            DK::F10 => 68,
            DK::Numpad7 => 71,
            DK::Numpad8 => 72,
            DK::Numpad9 => 73,
            DK::NumpadSubtract => 74,
            DK::Numpad4 => 75,
            DK::Numpad5 => 76,
            DK::Numpad6 => 77,
            DK::NumpadAdd => 78,
            DK::Numpad1 => 79,
            DK::Numpad2 => 80,
            DK::Numpad3 => 81,
            DK::Numpad0 => 82,
            DK::NumpadDecimal => 83,
            DK::F11 => 87,
            DK::F12 => 88,
            DK::NumpadEnter => 96,
            DK::RControl => 97,
            DK::NumpadDivide => 98,
            DK::RAlt => 100,
            DK::Home => 102,
            DK::Up => 103,
            DK::PageUp => 104,
            DK::Left => 105,
            DK::Right => 106,
            DK::End => 107,
            DK::Down => 108,
            DK::PageDown => 109,
            DK::Insert => 110,
            DK::Delete => 111,
            DK::LMeta => 125,
            DK::RMeta => 126,
            DK::NumpadEquals => 117,
            other => return Self::unmapped(&format!("{:?}", other)),
        };
        Self(code)
    }
}

/// Naming information about a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// DOM-style code name (`KeyA`, `ShiftLeft`, ...)
    pub name: &'static str,
    /// Short label for key caps
    pub label: &'static str,
    /// Value the key produces without modifiers; a single character for
    /// printable keys, a descriptive name otherwise
    pub key: &'static str,
}

impl KeyInfo {
    const fn new(name: &'static str, label: &'static str, key: &'static str) -> Self {
        Self { name, label, key }
    }
}

const UNKNOWN_KEY: KeyInfo = KeyInfo::new("Unidentified", "?", "Unidentified");

/// Static keymap for a standard US layout
pub static KEYMAP: LazyLock<HashMap<KeyCode, KeyInfo>> = LazyLock::new(|| {
    let entries: &[(u16, KeyInfo)] = &[
        // Function row
        (1, KeyInfo::new("Escape", "Esc", "Escape")),
        (59, KeyInfo::new("F1", "F1", "F1")),
        (60, KeyInfo::new("F2", "F2", "F2")),
        (61, KeyInfo::new("F3", "F3", "F3")),
        (62, KeyInfo::new("F4", "F4", "F4")),
        (63, KeyInfo::new("F5", "F5", "F5")),
        (64, KeyInfo::new("F6", "F6", "F6")),
        (65, KeyInfo::new("F7", "F7", "F7")),
        (66, KeyInfo::new("F8", "F8", "F8")),
        (67, KeyInfo::new("F9", "F9", "F9")),
        (68, KeyInfo::new("F10", "F10", "F10")),
        (87, KeyInfo::new("F11", "F11", "F11")),
        (88, KeyInfo::new("F12", "F12", "F12")),
        // Number row
        (41, KeyInfo::new("Backquote", "`", "`")),
        (2, KeyInfo::new("Digit1", "1", "1")),
        (3, KeyInfo::new("Digit2", "2", "2")),
        (4, KeyInfo::new("Digit3", "3", "3")),
        (5, KeyInfo::new("Digit4", "4", "4")),
        (6, KeyInfo::new("Digit5", "5", "5")),
        (7, KeyInfo::new("Digit6", "6", "6")),
        (8, KeyInfo::new("Digit7", "7", "7")),
        (9, KeyInfo::new("Digit8", "8", "8")),
        (10, KeyInfo::new("Digit9", "9", "9")),
        (11, KeyInfo::new("Digit0", "0", "0")),
        (12, KeyInfo::new("Minus", "-", "-")),
        (13, KeyInfo::new("Equal", "=", "=")),
        (14, KeyInfo::new("Backspace", "Bksp", "Backspace")),
        // Top letter row
        (15, KeyInfo::new("Tab", "Tab", "Tab")),
        (16, KeyInfo::new("KeyQ", "Q", "q")),
        (17, KeyInfo::new("KeyW", "W", "w")),
        (18, KeyInfo::new("KeyE", "E", "e")),
        (19, KeyInfo::new("KeyR", "R", "r")),
        (20, KeyInfo::new("KeyT", "T", "t")),
        (21, KeyInfo::new("KeyY", "Y", "y")),
        (22, KeyInfo::new("KeyU", "U", "u")),
        (23, KeyInfo::new("KeyI", "I", "i")),
        (24, KeyInfo::new("KeyO", "O", "o")),
        (25, KeyInfo::new("KeyP", "P", "p")),
        (26, KeyInfo::new("BracketLeft", "[", "[")),
        (27, KeyInfo::new("BracketRight", "]", "]")),
        (43, KeyInfo::new("Backslash", "\\", "\\")),
        // Home row
        (58, KeyInfo::new("CapsLock", "Caps", "CapsLock")),
        (30, KeyInfo::new("KeyA", "A", "a")),
        (31, KeyInfo::new("KeyS", "S", "s")),
        (32, KeyInfo::new("KeyD", "D", "d")),
        (33, KeyInfo::new("KeyF", "F", "f")),
        (34, KeyInfo::new("KeyG", "G", "g")),
        (35, KeyInfo::new("KeyH", "H", "h")),
        (36, KeyInfo::new("KeyJ", "J", "j")),
        (37, KeyInfo::new("KeyK", "K", "k")),
        (38, KeyInfo::new("KeyL", "L", "l")),
        (39, KeyInfo::new("Semicolon", ";", ";")),
        (40, KeyInfo::new("Quote", "'", "'")),
        (28, KeyInfo::new("Enter", "Enter", "Enter")),
        // Bottom letter row
        (42, KeyInfo::new("ShiftLeft", "Shift", "Shift")),
        (44, KeyInfo::new("KeyZ", "Z", "z")),
        (45, KeyInfo::new("KeyX", "X", "x")),
        (46, KeyInfo::new("KeyC", "C", "c")),
        (47, KeyInfo::new("KeyV", "V", "v")),
        (48, KeyInfo::new("KeyB", "B", "b")),
        (49, KeyInfo::new("KeyN", "N", "n")),
        (50, KeyInfo::new("KeyM", "M", "m")),
        (51, KeyInfo::new("Comma", ",", ",")),
        (52, KeyInfo::new("Period", ".", ".")),
        (53, KeyInfo::new("Slash", "/", "/")),
        (54, KeyInfo::new("ShiftRight", "Shift", "Shift")),
        // Bottom row (modifiers + space)
        (29, KeyInfo::new("ControlLeft", "Ctrl", "Control")),
        (125, KeyInfo::new("MetaLeft", "Win", "Meta")),
        (56, KeyInfo::new("AltLeft", "Alt", "Alt")),
        (57, KeyInfo::new("Space", "Space", " ")),
        (100, KeyInfo::new("AltRight", "Alt", "Alt")),
        (126, KeyInfo::new("MetaRight", "Win", "Meta")),
        (97, KeyInfo::new("ControlRight", "Ctrl", "Control")),
        // Arrow keys
        (103, KeyInfo::new("ArrowUp", "Up", "ArrowUp")),
        (105, KeyInfo::new("ArrowLeft", "Left", "ArrowLeft")),
        (108, KeyInfo::new("ArrowDown", "Down", "ArrowDown")),
        (106, KeyInfo::new("ArrowRight", "Right", "ArrowRight")),
        // Navigation cluster
        (110, KeyInfo::new("Insert", "Ins", "Insert")),
        (102, KeyInfo::new("Home", "Home", "Home")),
        (104, KeyInfo::new("PageUp", "PgUp", "PageUp")),
        (111, KeyInfo::new("Delete", "Del", "Delete")),
        (107, KeyInfo::new("End", "End", "End")),
        (109, KeyInfo::new("PageDown", "PgDn", "PageDown")),
        // Numpad
        (82, KeyInfo::new("Numpad0", "0", "0")),
        (79, KeyInfo::new("Numpad1", "1", "1")),
        (80, KeyInfo::new("Numpad2", "2", "2")),
        (81, KeyInfo::new("Numpad3", "3", "3")),
        (75, KeyInfo::new("Numpad4", "4", "4")),
        (76, KeyInfo::new("Numpad5", "5", "5")),
        (77, KeyInfo::new("Numpad6", "6", "6")),
        (71, KeyInfo::new("Numpad7", "7", "7")),
        (72, KeyInfo::new("Numpad8", "8", "8")),
        (73, KeyInfo::new("Numpad9", "9", "9")),
        (74, KeyInfo::new("NumpadSubtract", "-", "-")),
        (78, KeyInfo::new("NumpadAdd", "+", "+")),
        (98, KeyInfo::new("NumpadDivide", "/", "/")),
        (55, KeyInfo::new("NumpadMultiply", "*", "*")),
        (83, KeyInfo::new("NumpadDecimal", ".", ".")),
        (96, KeyInfo::new("NumpadEnter", "Enter", "Enter")),
        (117, KeyInfo::new("NumpadEqual", "=", "=")),
    ];

    entries
        .iter()
        .map(|(code, info)| (KeyCode(*code), info.clone()))
        .collect()
});

/// Get key info by code, returns a placeholder if not found
pub fn get_key_info(code: KeyCode) -> KeyInfo {
    code.info().cloned().unwrap_or(UNKNOWN_KEY)
}
