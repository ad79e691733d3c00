//! Input TestKit - terminal mouse and keyboard diagnostics

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::Style,
    symbols::border,
    widgets::{Block, Borders, Clear},
    Frame, Terminal,
};
use std::{
    fs::File,
    io::stdout,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
    },
    time::{Duration, Instant},
};

use input_testkit::{
    config::{self, Settings},
    feedback::{Feedback, TerminalBell},
    input::{Clock, InputEvent, KeyboardListener, SystemClock},
    testers::Tester,
    ui::{
        App, AppState, AppView, ClickLogPanel, ClickPad, Command, HelpPanel, KeyboardLayout,
        KeyboardVisual, PollingSurface, ResultsPanel, RolloverDisplay, ScrollLogPanel, StatusBar,
        TabBar, ThemeColors,
    },
};

/// Longest wait for terminal input per loop iteration
const POLL_TIMEOUT: Duration = Duration::from_millis(8);

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);

    // The terminal belongs to the UI, so logs go to a file
    match config::config_dir().map(|dir| dir.join("input-testkit.log")) {
        Ok(path) => match File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        },
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn load_settings() -> Settings {
    match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Using default settings: {}", e);
            Settings::default()
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    log::info!("Input TestKit v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))
            .context("failed to install signal handler")?;
    }

    let mut app = App::new(load_settings(), SystemClock.now())
        .with_feedback(Feedback::new(Box::new(TerminalBell::new(stdout()))));
    match config::settings_path() {
        Ok(path) => app = app.with_settings_path(path),
        Err(e) => log::warn!("Settings will not be saved: {}", e),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &shutdown);

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;
    result?;

    log::info!("Session ended after {} events", app.total_events);
    println!("\nInput TestKit session complete.");
    println!("Total events processed: {}", app.total_events);
    println!("Session duration: {}", app.elapsed_formatted());

    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, shutdown: &AtomicBool) -> Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<InputEvent>();
    let mut listener = KeyboardListener::new(event_tx);
    let layout = KeyboardLayout::ansi();
    let clock = SystemClock;

    loop {
        listener.poll(clock.now());
        while let Ok(input) = event_rx.try_recv() {
            app.handle_event(&input);
        }

        if event::poll(POLL_TIMEOUT)? {
            loop {
                let terminal_event = event::read()?;
                handle_terminal_event(app, terminal_event, clock.now());
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        app.tick(clock.now());
        app.on_frame();
        terminal.draw(|frame| draw(frame, app, &layout))?;

        if shutdown.load(Ordering::SeqCst) {
            app.quit();
        }
        if app.state == AppState::Quitting {
            return Ok(());
        }
    }
}

fn handle_terminal_event(app: &mut App, event: Event, now: Instant) {
    match event {
        Event::Key(key) => {
            if let Some(command) = Command::from_key(&key) {
                app.apply(command, now);
            }
        }
        Event::Mouse(mouse) => app.handle_mouse(&mouse, now),
        // The listener keeps polling; the app drops keys while unfocused
        Event::FocusLost => app.handle_event(&InputEvent::FocusLost),
        Event::FocusGained => app.focus_gained(),
        _ => {}
    }
}

fn draw(frame: &mut Frame, app: &mut App, layout: &KeyboardLayout) {
    let colors = ThemeColors::from_theme(app.settings().theme);
    let size = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg).fg(colors.fg)),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(10),   // Active view
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    let tab_names: Vec<&str> = AppView::all().iter().map(|v| v.name()).collect();
    frame.render_widget(TabBar::new(&tab_names, app.view.index(), &colors), chunks[0]);

    match app.view {
        AppView::Clicks => draw_clicks(frame, app, &colors, chunks[1]),
        AppView::Polling => draw_polling(frame, app, &colors, chunks[1]),
        AppView::Keyboard => draw_keyboard(frame, app, layout, &colors, chunks[1]),
        AppView::Rollover => draw_rollover(frame, app, &colors, chunks[1]),
    }

    if app.show_help {
        let area = chunks[1].inner(Margin::new(4, 1));
        frame.render_widget(Clear, area);
        frame.render_widget(HelpPanel::new(&colors), area);
    }

    let elapsed = app.elapsed_formatted();
    let status = StatusBar::new(app.view.name(), &elapsed, app.total_events, &colors)
        .sound(app.settings().sound_enabled)
        .message(app.get_status());
    frame.render_widget(status, chunks[2]);
}

fn draw_results(frame: &mut Frame, app: &App, colors: &ThemeColors, area: Rect) {
    let results = app.current_results();
    let tester = app.tester(app.view);
    let title = format!("{} - {}", tester.name(), tester.description());
    frame.render_widget(ResultsPanel::new(&results, &title, colors), area);
}

fn draw_clicks(frame: &mut Frame, app: &mut App, colors: &ThemeColors, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(9)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(13), Constraint::Min(3)])
        .split(columns[1]);

    app.click_target = left[0];
    let tester = &app.click_tester;
    frame.render_widget(
        ClickPad::new(tester.is_pressed(), tester.threshold_ms(), colors),
        left[0],
    );
    draw_results(frame, app, colors, left[1]);
    frame.render_widget(ClickLogPanel::new(tester.click_log(), colors), right[0]);
    frame.render_widget(
        ScrollLogPanel::new(tester.scroll_log(), tester.scroll_events(), colors),
        right[1],
    );
}

fn draw_polling(frame: &mut Frame, app: &mut App, colors: &ThemeColors, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(7)])
        .split(area);

    // Samples are relative to the drawable inside of the border
    app.poll_surface = rows[0].inner(Margin::new(1, 1));
    frame.render_widget(PollingSurface::new(&app.polling_tester, colors), rows[0]);
    draw_results(frame, app, colors, rows[1]);
}

fn draw_keyboard(
    frame: &mut Frame,
    app: &App,
    layout: &KeyboardLayout,
    colors: &ThemeColors,
    area: Rect,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(4)])
        .split(area);

    let kb_block = Block::default()
        .title(" ⌨ Keyboard ")
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(colors.dim));
    let kb_inner = kb_block.inner(rows[0]);
    frame.render_widget(kb_block, rows[0]);
    frame.render_widget(
        KeyboardVisual::new(layout, &app.keyboard_tester, colors)
            .scale(app.settings().keyboard_scale),
        kb_inner,
    );
    draw_results(frame, app, colors, rows[1]);
}

fn draw_rollover(frame: &mut Frame, app: &App, colors: &ThemeColors, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(area);

    frame.render_widget(RolloverDisplay::new(&app.rollover_tester, colors), rows[0]);
    draw_results(frame, app, colors, rows[1]);
}
