//! Main application state and logic

use crate::config::Settings;
use crate::feedback::Feedback;
use crate::input::{InputEvent, KeyCode};
use crate::report::{self, ExportError, FileSink, ReportSink};
use crate::testers::{
    ClickTester, KeyRolloverTester, KeyboardTester, PollingRateTester, TestResult, Tester,
};
use chrono::{DateTime, Local, TimeZone};
use crossterm::event::{
    KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long a status notice stays visible
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// Keyboard scale change per adjustment, in percent
const SCALE_STEP: i16 = 5;

/// Current view/tab in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Clicks,
    Polling,
    Keyboard,
    Rollover,
}

impl AppView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clicks => "Clicks",
            Self::Polling => "Polling",
            Self::Keyboard => "Keyboard",
            Self::Rollover => "Rollover",
        }
    }

    pub fn all() -> &'static [AppView] {
        &[Self::Clicks, Self::Polling, Self::Keyboard, Self::Rollover]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Clicks => 0,
            Self::Polling => 1,
            Self::Keyboard => 2,
            Self::Rollover => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// User commands bound to terminal key chords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextView,
    PrevView,
    ShowView(AppView),
    ToggleHelp,
    Reset,
    Export,
    ToggleTheme,
    ToggleSound,
    /// Step the active tester's parameter up or down
    Adjust(i64),
    Quit,
}

impl Command {
    /// Map a terminal key event to a command.
    ///
    /// Everything except Tab and the function keys needs Ctrl so that plain
    /// keys stay free for the keyboard testers.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            TermKey::Tab => Some(Self::NextView),
            TermKey::BackTab => Some(Self::PrevView),
            TermKey::F(1) => Some(Self::ToggleHelp),
            TermKey::F(n @ 2..=5) => AppView::from_index(n as usize - 2).map(Self::ShowView),
            TermKey::Left if ctrl => Some(Self::Adjust(-1)),
            TermKey::Right if ctrl => Some(Self::Adjust(1)),
            TermKey::Char(c) if ctrl => match c.to_ascii_lowercase() {
                'r' => Some(Self::Reset),
                'e' => Some(Self::Export),
                't' => Some(Self::ToggleTheme),
                's' => Some(Self::ToggleSound),
                'q' | 'c' => Some(Self::Quit),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Main application
pub struct App {
    /// Current view
    pub view: AppView,
    /// Application state
    pub state: AppState,
    /// Help overlay visible
    pub show_help: bool,
    pub click_tester: ClickTester,
    pub polling_tester: PollingRateTester,
    pub keyboard_tester: KeyboardTester,
    pub rollover_tester: KeyRolloverTester,
    /// Click pad area from the last render
    pub click_target: Rect,
    /// Polling surface area from the last render
    pub poll_surface: Rect,
    /// Application start time
    pub start_time: Instant,
    /// Total events dispatched to testers
    pub total_events: u64,
    /// Whether the terminal has input focus
    focused: bool,
    /// Keys physically down, as reported by the key listener
    held_keys: HashSet<KeyCode>,
    /// Keys that were already down at the last reset, view switch or focus
    /// regain. Their releases are not forwarded.
    stale_keys: HashSet<KeyCode>,
    settings: Settings,
    /// Where settings are written back; `None` keeps them in memory only
    settings_path: Option<PathBuf>,
    feedback: Feedback,
    sink: Box<dyn ReportSink>,
    status_message: Option<String>,
    status_time: Option<Instant>,
}

impl App {
    pub fn new(settings: Settings, now: Instant) -> Self {
        let mut app = Self {
            view: AppView::default(),
            state: AppState::Running,
            show_help: false,
            click_tester: ClickTester::new(),
            polling_tester: PollingRateTester::new(),
            keyboard_tester: KeyboardTester::new(),
            rollover_tester: KeyRolloverTester::new(),
            click_target: Rect::default(),
            poll_surface: Rect::default(),
            start_time: now,
            total_events: 0,
            focused: true,
            held_keys: HashSet::new(),
            stale_keys: HashSet::new(),
            settings,
            settings_path: None,
            feedback: Feedback::silent(),
            sink: Box::new(FileSink::current_dir()),
            status_message: None,
            status_time: None,
        };
        let view = app.view;
        app.tester_mut(view).activate(now);
        app
    }

    /// Persist settings to `path` on every change
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tester(&self, view: AppView) -> &dyn Tester {
        match view {
            AppView::Clicks => &self.click_tester,
            AppView::Polling => &self.polling_tester,
            AppView::Keyboard => &self.keyboard_tester,
            AppView::Rollover => &self.rollover_tester,
        }
    }

    pub fn tester_mut(&mut self, view: AppView) -> &mut dyn Tester {
        match view {
            AppView::Clicks => &mut self.click_tester,
            AppView::Polling => &mut self.polling_tester,
            AppView::Keyboard => &mut self.keyboard_tester,
            AppView::Rollover => &mut self.rollover_tester,
        }
    }

    /// Switch views. The old tester stops receiving input and timers; its
    /// recorded results are kept for the report.
    pub fn set_view(&mut self, view: AppView, now: Instant) {
        if view == self.view {
            return;
        }
        self.tester_mut(self.view).deactivate();
        self.view = view;
        self.tester_mut(view).activate(now);
        self.mark_held_keys_stale();
        log::info!("Switched to {} view", view.name());
    }

    pub fn next_view(&mut self, now: Instant) {
        self.set_view(self.view.next(), now);
    }

    pub fn prev_view(&mut self, now: Instant) {
        self.set_view(self.view.prev(), now);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The terminal regained focus. Keys already down become a baseline
    /// rather than fresh presses.
    pub fn focus_gained(&mut self) {
        if !self.focused {
            log::debug!("Focus regained with {} keys held", self.held_keys.len());
        }
        self.focused = true;
        self.mark_held_keys_stale();
    }

    fn mark_held_keys_stale(&mut self) {
        self.stale_keys = self.held_keys.clone();
    }

    /// Track key and focus state; returns whether the event reaches the
    /// active tester
    fn admit(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyDown { code, .. } => {
                self.held_keys.insert(*code);
                self.stale_keys.remove(code);
                self.focused
            }
            InputEvent::KeyUp { code, .. } => {
                self.held_keys.remove(code);
                let stale = self.stale_keys.remove(code);
                self.focused && !stale
            }
            InputEvent::FocusLost => {
                self.focused = false;
                true
            }
            _ => true,
        }
    }

    /// Feed an input event to the active tester
    pub fn handle_event(&mut self, event: &InputEvent) {
        if self.state != AppState::Running || !self.admit(event) {
            return;
        }
        self.total_events += 1;

        let cue = self.tester_mut(self.view).process_event(event);
        self.feedback.play(cue, self.settings.sound_enabled);
    }

    /// Translate a terminal mouse event into the active view's input event,
    /// using the areas recorded at the last render
    pub fn translate_mouse(&self, mouse: &MouseEvent, now: Instant) -> Option<InputEvent> {
        let pos = Position::new(mouse.column, mouse.row);

        match (self.view, mouse.kind) {
            (AppView::Clicks, MouseEventKind::Down(button)) if self.click_target.contains(pos) => {
                Some(InputEvent::press(button, now))
            }
            (AppView::Clicks, MouseEventKind::Up(_)) if self.click_tester.is_pressed() => {
                Some(InputEvent::PointerRelease { timestamp: now })
            }
            // Leaving the pad counts as a release
            (AppView::Clicks, MouseEventKind::Moved | MouseEventKind::Drag(_))
                if self.click_tester.is_pressed() && !self.click_target.contains(pos) =>
            {
                Some(InputEvent::PointerRelease { timestamp: now })
            }
            (AppView::Clicks, MouseEventKind::ScrollUp) => Some(InputEvent::WheelScroll {
                delta_y: -1.0,
                timestamp: now,
            }),
            (AppView::Clicks, MouseEventKind::ScrollDown) => Some(InputEvent::WheelScroll {
                delta_y: 1.0,
                timestamp: now,
            }),
            (AppView::Polling, MouseEventKind::Moved | MouseEventKind::Drag(_))
                if self.poll_surface.contains(pos) =>
            {
                Some(InputEvent::PointerMove {
                    x: (mouse.column - self.poll_surface.x) as f64,
                    y: (mouse.row - self.poll_surface.y) as f64,
                    timestamp: now,
                })
            }
            _ => None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) {
        if let Some(event) = self.translate_mouse(mouse, now) {
            self.handle_event(&event);
        }
    }

    /// Advance the active tester's timers
    pub fn tick(&mut self, now: Instant) {
        self.tester_mut(self.view).tick(now);
    }

    /// Animation frame; returns true if the polling trace was redrawn
    pub fn on_frame(&mut self) -> bool {
        self.polling_tester.on_frame()
    }

    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::NextView => self.next_view(now),
            Command::PrevView => self.prev_view(now),
            Command::ShowView(view) => self.set_view(view, now),
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::Reset => self.reset_current(),
            Command::Export => {
                if let Err(e) = self.export_results() {
                    log::debug!("Export command failed: {}", e);
                }
            }
            Command::ToggleTheme => self.toggle_theme(),
            Command::ToggleSound => self.toggle_sound(),
            Command::Adjust(steps) => self.adjust_parameter(steps),
            Command::Quit => self.quit(),
        }
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Reset the active tester only
    pub fn reset_current(&mut self) {
        self.tester_mut(self.view).reset();
        self.mark_held_keys_stale();
        log::info!("{} tester reset", self.view.name());
        self.set_status(format!("{} Test Reset", self.view.name()));
    }

    pub fn toggle_theme(&mut self) {
        self.settings.toggle_theme();
        self.set_status(format!("Theme: {}", self.settings.theme.name()));
        self.persist_settings();
    }

    pub fn toggle_sound(&mut self) {
        self.settings.toggle_sound();
        let message = match (self.settings.sound_enabled, self.feedback.is_available()) {
            (false, _) => "Sound off",
            (true, true) => "Sound on",
            (true, false) => "Sound unavailable",
        };
        self.set_status(message.to_string());
        self.persist_settings();
    }

    /// Adjust the active tester's parameter: double-click threshold on
    /// Clicks, keyboard scale on Keyboard
    pub fn adjust_parameter(&mut self, steps: i64) {
        match self.view {
            AppView::Clicks => {
                self.click_tester.adjust_threshold(steps);
                let threshold = self.click_tester.threshold_ms();
                self.set_status(format!("Double-click threshold: {} ms", threshold));
            }
            AppView::Keyboard => {
                let delta = (steps.clamp(-24, 24) as i16) * SCALE_STEP;
                if self.settings.adjust_keyboard_scale(delta) {
                    self.set_status(format!("Keyboard scale: {}%", self.settings.keyboard_scale));
                    self.persist_settings();
                }
            }
            AppView::Polling | AppView::Rollover => {}
        }
    }

    fn persist_settings(&mut self) {
        let result = match &self.settings_path {
            Some(path) => self.settings.save_to(path),
            None => return,
        };
        if let Err(e) = result {
            log::warn!("Failed to save settings: {}", e);
            self.set_status("Could not save settings".to_string());
        }
    }

    /// Summaries of every tester, in tab order
    pub fn summaries(&self) -> Vec<String> {
        AppView::all()
            .iter()
            .map(|view| self.tester(*view).summary())
            .collect()
    }

    pub fn report_at<Tz: TimeZone>(&self, generated_at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        report::build_report(&self.summaries(), generated_at)
    }

    /// Build the combined report and hand it to the sink
    pub fn export_results(&mut self) -> Result<String, ExportError> {
        let report = self.report_at(&Local::now());
        match self.sink.deliver(&report) {
            Ok(location) => {
                log::info!("Results exported to {}", location);
                self.set_status(format!("Results exported to {}", location));
                Ok(location)
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.set_status("Error exporting results.".to_string());
                Err(e)
            }
        }
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed() < STATUS_TIMEOUT => Some(msg),
            _ => None,
        }
    }

    /// Get results for current view
    pub fn current_results(&self) -> Vec<TestResult> {
        self.tester(self.view).get_results()
    }

    /// Get elapsed time formatted
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use crossterm::event::{KeyEventState, MouseButton as TermButton};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: TermKey, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> (App, Instant) {
        let now = Instant::now();
        let mut app = App::new(Settings::default(), now);
        app.click_target = Rect::new(10, 5, 20, 6);
        app.poll_surface = Rect::new(2, 2, 40, 10);
        (app, now)
    }

    #[test]
    fn views_cycle_in_both_directions() {
        assert_eq!(AppView::Rollover.next(), AppView::Clicks);
        assert_eq!(AppView::Clicks.prev(), AppView::Rollover);
        assert_eq!(AppView::from_index(2), Some(AppView::Keyboard));
        assert_eq!(AppView::from_index(4), None);
    }

    #[test]
    fn only_the_active_tester_is_active() {
        let (mut app, now) = app();
        assert!(app.click_tester.is_active());

        app.set_view(AppView::Keyboard, now);

        assert!(!app.click_tester.is_active());
        assert!(app.keyboard_tester.is_active());
        assert!(!app.rollover_tester.is_active());
    }

    #[test]
    fn command_chords() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(
            Command::from_key(&key(TermKey::Char('r'), ctrl)),
            Some(Command::Reset)
        );
        assert_eq!(
            Command::from_key(&key(TermKey::F(4), KeyModifiers::NONE)),
            Some(Command::ShowView(AppView::Keyboard))
        );
        assert_eq!(
            Command::from_key(&key(TermKey::Right, ctrl)),
            Some(Command::Adjust(1))
        );
        // Plain letters belong to the testers
        assert_eq!(
            Command::from_key(&key(TermKey::Char('r'), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn key_release_events_are_not_commands() {
        let mut event = key(TermKey::Tab, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(Command::from_key(&event), None);
    }

    #[test]
    fn press_outside_pad_is_ignored() {
        let (app, now) = app();
        let down = mouse(MouseEventKind::Down(TermButton::Left), 0, 0);
        assert_eq!(app.translate_mouse(&down, now), None);
    }

    #[test]
    fn press_inside_pad_then_leave_releases() {
        let (mut app, now) = app();

        app.handle_mouse(&mouse(MouseEventKind::Down(TermButton::Right), 12, 6), now);
        assert!(app.click_tester.is_pressed());
        assert_eq!(app.click_tester.stats().right, 1);

        let leave = mouse(MouseEventKind::Drag(TermButton::Right), 50, 6);
        assert_eq!(
            app.translate_mouse(&leave, now),
            Some(InputEvent::PointerRelease { timestamp: now })
        );
        app.handle_mouse(&leave, now);
        assert!(!app.click_tester.is_pressed());
    }

    #[test]
    fn wheel_direction_maps_to_delta_sign() {
        let (app, now) = app();
        assert_eq!(
            app.translate_mouse(&mouse(MouseEventKind::ScrollUp, 0, 0), now),
            Some(InputEvent::WheelScroll {
                delta_y: -1.0,
                timestamp: now
            })
        );
    }

    #[test]
    fn moves_are_surface_relative_on_polling_view() {
        let (mut app, now) = app();
        app.set_view(AppView::Polling, now);

        let moved = app.translate_mouse(&mouse(MouseEventKind::Moved, 7, 4), now);
        assert_eq!(
            moved,
            Some(InputEvent::PointerMove {
                x: 5.0,
                y: 2.0,
                timestamp: now
            })
        );
        assert_eq!(
            app.translate_mouse(&mouse(MouseEventKind::Moved, 60, 4), now),
            None
        );
    }

    #[test]
    fn reset_sets_status_notice() {
        let (mut app, now) = app();
        app.handle_event(&InputEvent::press(MouseButton::Left, now));

        app.apply(Command::Reset, now);

        assert_eq!(app.click_tester.stats().total, 0);
        assert_eq!(app.get_status(), Some("Clicks Test Reset"));
    }

    #[test]
    fn adjust_depends_on_view() {
        let (mut app, now) = app();

        app.apply(Command::Adjust(2), now);
        assert_eq!(app.click_tester.threshold_ms(), 120);

        app.set_view(AppView::Keyboard, now);
        app.apply(Command::Adjust(-1), now);
        assert_eq!(app.settings().keyboard_scale, 75);

        app.set_view(AppView::Rollover, now);
        app.apply(Command::Adjust(1), now);
        assert_eq!(app.settings().keyboard_scale, 75);
        assert_eq!(app.click_tester.threshold_ms(), 120);
    }

    #[test]
    fn settings_changes_are_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        let (app, now) = app();
        let mut app = app.with_settings_path(&path);

        app.apply(Command::ToggleTheme, now);
        app.apply(Command::ToggleSound, now);

        let saved = Settings::load_from(&path).expect("load");
        assert_eq!(saved.theme, crate::config::Theme::Light);
        assert!(saved.sound_enabled);
    }

    #[test]
    fn keys_are_dropped_while_unfocused() {
        let (mut app, now) = app();
        app.set_view(AppView::Rollover, now);

        app.handle_event(&InputEvent::FocusLost);
        assert!(!app.is_focused());
        app.handle_event(&InputEvent::key_down(KeyCode(30), now));
        app.handle_event(&InputEvent::key_down(KeyCode(48), now));

        assert_eq!(app.rollover_tester.current_count(), 0);
        assert_eq!(app.total_events, 1);
    }

    #[test]
    fn keys_held_across_focus_regain_are_a_baseline() {
        let (mut app, now) = app();
        app.set_view(AppView::Keyboard, now);

        app.handle_event(&InputEvent::FocusLost);
        app.handle_event(&InputEvent::key_down(KeyCode(56), now));
        app.focus_gained();
        app.handle_event(&InputEvent::key_up(KeyCode(56), now));

        assert_eq!(app.keyboard_tester.keys_tested(), 0);

        // Later presses count normally
        app.handle_event(&InputEvent::key_down(KeyCode(56), now));
        app.handle_event(&InputEvent::key_up(KeyCode(56), now));
        assert_eq!(app.keyboard_tester.keys_tested(), 1);
    }

    #[test]
    fn quit_stops_event_dispatch() {
        let (mut app, now) = app();
        app.apply(Command::Quit, now);
        app.handle_event(&InputEvent::press(MouseButton::Left, now));
        assert_eq!(app.state, AppState::Quitting);
        assert_eq!(app.total_events, 0);
    }
}
