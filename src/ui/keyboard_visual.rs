//! Visual keyboard layout rendering

use super::theme::ThemeColors;
use crate::input::{get_key_info, KeyCode};
use crate::testers::{KeyState, KeyboardTester};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

/// What is drawn on a key cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyGlyph {
    /// Plain text label from the keymap
    Label(&'static str),
    Backspace,
    Tab,
    CapsLock,
    Enter,
    Shift,
    Meta,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl KeyGlyph {
    /// Resolve the glyph for a key code
    pub fn for_code(code: KeyCode) -> Self {
        match code.as_u16() {
            14 => Self::Backspace,
            15 => Self::Tab,
            58 => Self::CapsLock,
            28 => Self::Enter,
            42 | 54 => Self::Shift,
            125 | 126 => Self::Meta,
            57 => Self::Space,
            103 => Self::ArrowUp,
            108 => Self::ArrowDown,
            105 => Self::ArrowLeft,
            106 => Self::ArrowRight,
            _ => Self::Label(get_key_info(code).label),
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Label(label) => label,
            Self::Backspace => "←",
            Self::Tab => "⇥",
            Self::CapsLock => "⇪",
            Self::Enter => "↵",
            Self::Shift => "⇧",
            Self::Meta => "◆",
            Self::Space => "────",
            Self::ArrowUp => "▲",
            Self::ArrowDown => "▼",
            Self::ArrowLeft => "◀",
            Self::ArrowRight => "▶",
        }
    }
}

/// One key cap in the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySlot {
    pub code: KeyCode,
    pub glyph: KeyGlyph,
    /// Width in tenths of a standard key
    pub width: u16,
    /// Empty space before the key, in tenths of a standard key
    pub gap_before: u16,
}

impl KeySlot {
    fn new(code: u16, width: u16) -> Self {
        let code = KeyCode(code);
        Self {
            code,
            glyph: KeyGlyph::for_code(code),
            width,
            gap_before: 0,
        }
    }

    fn after_gap(mut self, gap: u16) -> Self {
        self.gap_before = gap;
        self
    }
}

/// Rows of key caps for a US ANSI board, glyphs resolved up front
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    rows: Vec<Vec<KeySlot>>,
}

impl KeyboardLayout {
    pub fn ansi() -> Self {
        let unit = |codes: &[u16]| codes.iter().map(|c| KeySlot::new(*c, 10)).collect::<Vec<_>>();

        let mut number_row = unit(&[41, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]);
        number_row.push(KeySlot::new(14, 20));

        let mut top_row = vec![KeySlot::new(15, 15)];
        top_row.extend(unit(&[16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27]));
        top_row.push(KeySlot::new(43, 15));

        let mut home_row = vec![KeySlot::new(58, 18)];
        home_row.extend(unit(&[30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40]));
        home_row.push(KeySlot::new(28, 22));

        let mut shift_row = vec![KeySlot::new(42, 23)];
        shift_row.extend(unit(&[44, 45, 46, 47, 48, 49, 50, 51, 52, 53]));
        shift_row.push(KeySlot::new(54, 27));
        shift_row.push(KeySlot::new(103, 10).after_gap(15));

        let bottom_row = vec![
            KeySlot::new(29, 12),
            KeySlot::new(125, 12),
            KeySlot::new(56, 12),
            KeySlot::new(57, 60),
            KeySlot::new(100, 12),
            KeySlot::new(126, 12),
            KeySlot::new(97, 12),
            KeySlot::new(105, 10).after_gap(5),
            KeySlot::new(108, 10),
            KeySlot::new(106, 10),
        ];

        Self {
            rows: vec![number_row, top_row, home_row, shift_row, bottom_row],
        }
    }

    pub fn rows(&self) -> &[Vec<KeySlot>] {
        &self.rows
    }

    pub fn slots(&self) -> impl Iterator<Item = &KeySlot> {
        self.rows.iter().flatten()
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Visual representation of a keyboard
pub struct KeyboardVisual<'a> {
    layout: &'a KeyboardLayout,
    tester: &'a KeyboardTester,
    colors: &'a ThemeColors,
    /// Cell width of a standard key
    unit: u16,
}

impl<'a> KeyboardVisual<'a> {
    pub fn new(
        layout: &'a KeyboardLayout,
        tester: &'a KeyboardTester,
        colors: &'a ThemeColors,
    ) -> Self {
        Self {
            layout,
            tester,
            colors,
            unit: 4,
        }
    }

    /// Size keys from a scale percentage (100 = five cells per key)
    pub fn scale(mut self, percent: u8) -> Self {
        self.unit = ((5.0 * percent as f64 / 100.0).round() as u16).max(3);
        self
    }

    fn cells(&self, tenths: u16) -> u16 {
        (self.unit * tenths + 5) / 10
    }

    fn render_key(&self, buf: &mut Buffer, area: Rect, x: u16, y: u16, slot: &KeySlot) {
        let w = self.cells(slot.width);
        if x + w > area.right() || y >= area.bottom() {
            return;
        }

        let state = self.tester.key_state(slot.code);
        let (bg, fg) = self.colors.key_colors(state);
        let mut style = Style::default().fg(fg).bg(bg);
        if state == KeyState::Pressed {
            style = style.add_modifier(Modifier::BOLD);
        }

        let label: String = format!("{:^w$}", slot.glyph.text(), w = w as usize)
            .chars()
            .take(w as usize)
            .collect();
        buf.set_string(x, y, label, style);
    }
}

impl Widget for KeyboardVisual<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 40 || area.height < 5 {
            buf.set_string(
                area.x,
                area.y,
                "⌨ Window too small",
                Style::default().fg(self.colors.dim),
            );
            return;
        }

        for (row_index, row) in self.layout.rows().iter().enumerate() {
            let y = area.y + row_index as u16;
            let mut x = area.x + 1;
            for slot in row {
                x += self.cells(slot.gap_before);
                self.render_key(buf, area, x, y, slot);
                x += self.cells(slot.width) + 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testers::Tester;
    use crate::testers::test_helpers::*;
    use std::time::Instant;

    #[test]
    fn glyphs_resolved_from_code() {
        assert_eq!(KeyGlyph::for_code(KeyCode(14)), KeyGlyph::Backspace);
        assert_eq!(KeyGlyph::for_code(KeyCode(54)), KeyGlyph::Shift);
        assert_eq!(KeyGlyph::for_code(KEY_A), KeyGlyph::Label("A"));
        assert_eq!(KeyGlyph::for_code(KeyCode(999)).text(), "?");
    }

    #[test]
    fn layout_has_each_key_once() {
        let layout = KeyboardLayout::ansi();
        let mut codes: Vec<KeyCode> = layout.slots().map(|s| s.code).collect();
        let total = codes.len();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), total);
        assert_eq!(layout.rows().len(), 5);
    }

    #[test]
    fn scale_changes_key_width() {
        let layout = KeyboardLayout::ansi();
        let tester = KeyboardTester::new();
        let colors = ThemeColors::dark();

        let small = KeyboardVisual::new(&layout, &tester, &colors).scale(70);
        let large = KeyboardVisual::new(&layout, &tester, &colors).scale(120);
        assert_eq!(small.cells(10), 4);
        assert_eq!(large.cells(10), 6);
    }

    #[test]
    fn pressed_key_drawn_in_pressed_color() {
        let origin = Instant::now();
        let layout = KeyboardLayout::ansi();
        let colors = ThemeColors::dark();
        let mut tester = KeyboardTester::new();
        tester.activate(origin);
        tester.process_event(&key_down(origin, KEY_A, 0));

        let area = Rect::new(0, 0, 100, 5);
        let mut buf = Buffer::empty(area);
        KeyboardVisual::new(&layout, &tester, &colors)
            .scale(80)
            .render(area, &mut buf);

        // Home row: 1 cell margin, then Caps (1.8u = 7 cells) and a gap
        let cell = &buf[(9, 2)];
        assert_eq!(cell.bg, colors.key_on);
    }
}
