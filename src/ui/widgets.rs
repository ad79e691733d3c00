//! Custom TUI widgets

use super::theme::ThemeColors;
use crate::testers::{
    ClickLogEntry, KeyRolloverTester, PollPhase, PollingRateTester, ResultStatus, ScrollLogEntry,
    TestResult,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as TraceLine},
        Block, Borders, Paragraph, Widget,
    },
};

/// Widget for displaying test results
pub struct ResultsPanel<'a> {
    results: &'a [TestResult],
    title: &'a str,
    colors: &'a ThemeColors,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(results: &'a [TestResult], title: &'a str, colors: &'a ThemeColors) -> Self {
        Self {
            results,
            title,
            colors,
        }
    }

    fn status_symbol(status: ResultStatus) -> &'static str {
        match status {
            ResultStatus::Ok => "[OK]",
            ResultStatus::Warning => "[!!]",
            ResultStatus::Error => "[XX]",
            ResultStatus::Info => "[--]",
        }
    }
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.fg));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;
        for result in self.results {
            if y >= inner.bottom() {
                break;
            }

            let color = self.colors.status_color(result.status);
            let line = Line::from(vec![
                Span::styled(
                    format!("{} ", Self::status_symbol(result.status)),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("{}: ", result.label),
                    Style::default()
                        .fg(self.colors.fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(&result.value, Style::default().fg(color)),
            ]);

            buf.set_line(inner.x, y, &line, inner.width);
            y += 1;
        }
    }
}

/// Widget for the help screen
pub struct HelpPanel<'a> {
    colors: &'a ThemeColors,
}

impl<'a> HelpPanel<'a> {
    pub fn new(colors: &'a ThemeColors) -> Self {
        Self { colors }
    }
}

impl Widget for HelpPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Help - Input TestKit")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = [
            "",
            " NAVIGATION",
            " -----------",
            " Tab / Shift+Tab  : Switch between test views",
            " F2-F5            : Jump to a specific view",
            " F1               : Toggle this help",
            " Ctrl+Q / Ctrl+C  : Quit application",
            "",
            " CONTROLS",
            " -----------",
            " Ctrl+R           : Reset current test",
            " Ctrl+E           : Export results of all tests",
            " Ctrl+T           : Toggle light/dark theme",
            " Ctrl+S           : Toggle sound feedback",
            " Ctrl+Left/Right  : Double-click threshold (Clicks)",
            "                    Keyboard scale (Keyboard)",
            "",
            " TESTS",
            " -----------",
            " F2. Clicks       : Button counts, double-clicks, wheel",
            " F3. Polling      : Pointer report rate while moving",
            " F4. Keyboard     : Key states, stuck keys, typing speed",
            " F5. Rollover     : Keys held at the same time",
        ];

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.contains("---") {
                Style::default().fg(self.colors.dim)
            } else if line.chars().nth(1).is_some_and(|c| c.is_ascii_uppercase())
                && !line.contains(':')
            {
                Style::default()
                    .fg(self.colors.yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    view: &'a str,
    elapsed: &'a str,
    events: u64,
    sound: bool,
    message: Option<&'a str>,
    colors: &'a ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(view: &'a str, elapsed: &'a str, events: u64, colors: &'a ThemeColors) -> Self {
        Self {
            view,
            elapsed,
            events,
            sound: false,
            message: None,
            colors,
        }
    }

    pub fn sound(mut self, enabled: bool) -> Self {
        self.sound = enabled;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.colors.key_off).fg(self.colors.fg);
        buf.set_style(area, bg_style);

        let left = format!(
            " {} | Sound {} ",
            self.view,
            if self.sound { "on" } else { "off" }
        );
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        if let Some(msg) = self.message {
            let msg_style = bg_style.fg(self.colors.yellow);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        let right = format!(" {} | Events: {} ", self.elapsed, self.events);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}

/// Tab bar widget
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    selected: usize,
    colors: &'a ThemeColors,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize, colors: &'a ThemeColors) -> Self {
        Self {
            tabs,
            selected,
            colors,
        }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bar_style = Style::default().bg(self.colors.key_off).fg(self.colors.fg);
        buf.set_style(area, bar_style);

        let mut x = area.x;
        for (i, tab) in self.tabs.iter().enumerate() {
            let style = if i == self.selected {
                Style::default()
                    .fg(self.colors.bg)
                    .bg(self.colors.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                bar_style
            };

            let label = format!(" F{} {} ", i + 2, tab);
            let width = label.chars().count() as u16;
            if x + width > area.right() {
                break;
            }
            buf.set_string(x, area.y, &label, style);
            x += width;

            if i + 1 < self.tabs.len() && x < area.right() {
                buf.set_string(x, area.y, "|", bar_style.fg(self.colors.dim));
                x += 1;
            }
        }
    }
}

/// Target area for mouse presses on the Clicks view
pub struct ClickPad<'a> {
    pressed: bool,
    threshold_ms: u64,
    colors: &'a ThemeColors,
}

impl<'a> ClickPad<'a> {
    pub fn new(pressed: bool, threshold_ms: u64, colors: &'a ThemeColors) -> Self {
        Self {
            pressed,
            threshold_ms,
            colors,
        }
    }
}

impl Widget for ClickPad<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = if self.pressed {
            self.colors.pad_pressed
        } else {
            self.colors.pad
        };
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Click here",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Scroll anywhere on this view"),
            Line::from(format!("Double-click threshold: {} ms", self.threshold_ms)),
        ];
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().bg(bg).fg(self.colors.key_text_on))
            .block(Block::default().borders(Borders::ALL))
            .render(area, buf);
    }
}

/// Most recent presses, newest on top
pub struct ClickLogPanel<'a, I> {
    entries: I,
    colors: &'a ThemeColors,
}

impl<'a, I> ClickLogPanel<'a, I>
where
    I: Iterator<Item = &'a ClickLogEntry>,
{
    pub fn new(entries: I, colors: &'a ThemeColors) -> Self {
        Self { entries, colors }
    }
}

impl<'a, I> Widget for ClickLogPanel<'a, I>
where
    I: Iterator<Item = &'a ClickLogEntry>,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = self.colors;
        let lines: Vec<Line> = self
            .entries
            .map(|entry| {
                let gap = entry
                    .gap_ms
                    .map(|ms| format!("{:>6.0} ms", ms))
                    .unwrap_or_else(|| "     - ms".to_string());
                let style = if entry.is_double {
                    Style::default().fg(colors.red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg)
                };
                let mut spans = vec![
                    Span::styled(format!("{:<8}", entry.button.label()), style),
                    Span::styled(gap, Style::default().fg(colors.cyan)),
                ];
                if entry.is_double {
                    spans.push(Span::styled("  DOUBLE", style));
                }
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(Block::default().title("Click Log").borders(Borders::ALL))
            .style(Style::default().fg(colors.fg))
            .render(area, buf);
    }
}

/// Most recent wheel events, newest on top
pub struct ScrollLogPanel<'a, I> {
    entries: I,
    total: u64,
    colors: &'a ThemeColors,
}

impl<'a, I> ScrollLogPanel<'a, I>
where
    I: Iterator<Item = &'a ScrollLogEntry>,
{
    pub fn new(entries: I, total: u64, colors: &'a ThemeColors) -> Self {
        Self {
            entries,
            total,
            colors,
        }
    }
}

impl<'a, I> Widget for ScrollLogPanel<'a, I>
where
    I: Iterator<Item = &'a ScrollLogEntry>,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = self.colors;
        let lines: Vec<Line> = self
            .entries
            .map(|entry| {
                let arrow = if entry.delta < 0.0 { "▲ up  " } else { "▼ down" };
                Line::from(vec![
                    Span::styled(arrow, Style::default().fg(colors.accent)),
                    Span::styled(
                        format!("{:>7.0} ms", entry.gap_ms),
                        Style::default().fg(colors.cyan),
                    ),
                ])
            })
            .collect();

        let title = format!("Scroll Log ({})", self.total);
        Paragraph::new(lines)
            .block(Block::default().title(title).borders(Borders::ALL))
            .style(Style::default().fg(colors.fg))
            .render(area, buf);
    }
}

/// Surface the pointer is moved over on the Polling view; draws the last
/// trace copied by the tester's frame callback
pub struct PollingSurface<'a> {
    tester: &'a PollingRateTester,
    colors: &'a ThemeColors,
}

impl<'a> PollingSurface<'a> {
    pub fn new(tester: &'a PollingRateTester, colors: &'a ThemeColors) -> Self {
        Self { tester, colors }
    }
}

impl Widget for PollingSurface<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Move the pointer here")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.dim));

        if self.tester.phase() == PollPhase::Idle {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new("Waiting for pointer movement...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.colors.dim))
                .render(inner, buf);
            return;
        }

        // Trace points are cell offsets from the surface's inner origin
        let width = area.width.saturating_sub(2).max(1) as f64;
        let height = area.height.saturating_sub(2).max(1) as f64;
        let trace = self.tester.trace();
        let color = self.colors.accent;

        Canvas::default()
            .block(block)
            .background_color(self.colors.bg)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for pair in trace.windows(2) {
                    let (x1, y1) = pair[0];
                    let (x2, y2) = pair[1];
                    ctx.draw(&TraceLine {
                        x1,
                        y1: height - y1,
                        x2,
                        y2: height - y2,
                        color,
                    });
                }
            })
            .render(area, buf);
    }
}

/// Big live counter for the Rollover view
pub struct RolloverDisplay<'a> {
    tester: &'a KeyRolloverTester,
    colors: &'a ThemeColors,
}

impl<'a> RolloverDisplay<'a> {
    pub fn new(tester: &'a KeyRolloverTester, colors: &'a ThemeColors) -> Self {
        Self { tester, colors }
    }
}

impl Widget for RolloverDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let keys: Vec<String> = self.tester.pressed_keys().map(|k| k.to_string()).collect();
        let held = if keys.is_empty() {
            "Press and hold as many keys as you can".to_string()
        } else {
            keys.join(" + ")
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} keys", self.tester.current_count()),
                Style::default()
                    .fg(self.colors.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Max: {}", self.tester.max_rollover()),
                Style::default().fg(self.colors.green),
            )),
            Line::from(""),
            Line::from(Span::styled(held, Style::default().fg(self.colors.fg))),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().title("Key Rollover").borders(Borders::ALL))
            .render(area, buf);
    }
}
