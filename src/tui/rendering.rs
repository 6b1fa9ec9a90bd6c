use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::config::TriageConfig;
use crate::form::ingest::IngestResolution;

use super::app::App;
use super::types::{AppMessage, InputMode};
use super::widgets;

pub async fn run_tui(config: TriageConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config)?;

    // Extract the receivers from the app
    let mut rx = app.rx.take().expect("receiver already taken");
    let mut ingest_rx = app.ingest_rx.take().expect("receiver already taken");

    let res = run_app(&mut terminal, &mut app, &mut rx, &mut ingest_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<AppMessage>,
    ingest_rx: &mut mpsc::UnboundedReceiver<IngestResolution>,
) -> Result<()> {
    loop {
        if app.should_quit {
            return Ok(());
        }

        app.update_time();

        terminal.draw(|f| ui(f, app))?;

        // Resolutions from background work first, so a settled read or
        // analysis is visible before the next keystroke is handled.
        while let Ok(res) = ingest_rx.try_recv() {
            app.form.resolve_ingest(res.generation, res.outcome);
        }
        while let Ok(msg) = rx.try_recv() {
            match msg {
                AppMessage::AnalysisResolved(outcome) => app.on_analysis_resolved(outcome),
            }
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => handle_key(app, key)?,
                Event::Paste(pasted) => app.handle_paste(&pasted),
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: event::KeyEvent) -> Result<()> {
    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => {
                app.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true;
            }
            KeyCode::Char('i') => {
                if app.form.ui.input_visible && app.form.ui.text_enabled {
                    app.input_mode = InputMode::EditingText;
                    app.status_message = "EDIT - type the email text, Esc when done".to_string();
                }
            }
            KeyCode::Char('f') => {
                if app.form.ui.input_visible {
                    app.open_picker();
                }
            }
            KeyCode::Enter | KeyCode::Char('s') => {
                if app.form.ui.submit_enabled {
                    app.submit();
                }
            }
            KeyCode::Char('r') | KeyCode::Char('n') => {
                if app.can_reset() {
                    app.reset();
                }
            }
            KeyCode::Char('?') => {
                app.status_message =
                    "i:edit text  f:browse file  Enter/s:submit  r/n:reset  q:quit".to_string();
            }
            _ => {}
        },
        InputMode::EditingText => match key.code {
            KeyCode::Esc => {
                app.input_mode = InputMode::Normal;
                app.status_message = "Ready".to_string();
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if app.form.ui.submit_enabled {
                    app.submit();
                }
            }
            KeyCode::Enter => {
                app.push_text_newline();
            }
            KeyCode::Backspace => {
                app.backspace_text();
            }
            KeyCode::Char(c) => {
                app.push_text_char(c);
            }
            _ => {}
        },
        InputMode::Picker => match key.code {
            KeyCode::Esc => {
                app.close_picker();
            }
            KeyCode::Enter => {
                if let Some(path) = app.picker.enter_selected()? {
                    app.close_picker();
                    app.select_file(path);
                }
            }
            _ => {
                app.picker.handle_key(key)?;
            }
        },
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Main area
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    f.render_widget(widgets::create_header(app), chunks[0]);

    if app.form.ui.input_visible {
        let show_picker = app.input_mode == InputMode::Picker;
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(if show_picker {
                [Constraint::Percentage(40), Constraint::Percentage(60)]
            } else {
                [Constraint::Percentage(0), Constraint::Percentage(100)]
            })
            .split(chunks[1]);

        if show_picker {
            f.render_widget(widgets::create_picker(app), main_chunks[0]);
        }

        let input_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(main_chunks[1]);

        f.render_widget(widgets::create_text_input(app), input_chunks[0]);
        f.render_widget(widgets::create_file_zone(app), input_chunks[1]);
    } else {
        f.render_widget(widgets::create_output(app), chunks[1]);
    }

    f.render_widget(widgets::create_status_bar(app), chunks[2]);
}
