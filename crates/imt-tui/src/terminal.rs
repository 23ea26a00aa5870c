//! Terminal setup, teardown, and main event loop.

use std::io;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tracing::error;

use crate::app::{InputMode, Panel, TuiApp};
use crate::views;

/// Launch the TUI. Startup (the host's ready signal) runs before the first
/// frame is drawn.
pub fn run(mut app: TuiApp) -> Result<(), String> {
    app.start().map_err(|e| e.to_string())?;

    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Main event loop.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|frame| draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        let event = event::read().map_err(|e| format!("event error: {e}"))?;
        if let Event::Key(key) = event
            && key.kind == KeyEventKind::Press
            && let Err(e) = app.handle_key(key)
        {
            error!(error = %e, "unrecoverable tracker error");
            return Err(e.to_string());
        }
    }
}

/// Main draw function.
fn draw(frame: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Panels
            Constraint::Length(1), // Message
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let title = Line::from(vec![
        Span::styled(" Initiative Tracker ", Style::default().fg(Color::White).bold()),
        Span::styled(
            format!("| {}", app.host.path().display()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    views::scene::draw(frame, app, panels[0]);
    views::tracker::draw(frame, app, panels[1]);

    if let Some(message) = &app.message {
        let color = if message.is_error {
            Color::Red
        } else {
            Color::Green
        };
        let line = Paragraph::new(Span::styled(
            format!(" {}", message.text),
            Style::default().fg(color),
        ));
        frame.render_widget(line, chunks[2]);
    }

    let status = Paragraph::new(status_hint(app))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, chunks[3]);

    if app.show_help {
        crate::shared::draw_help_popup(frame);
    }
}

/// Context-sensitive status bar text.
fn status_hint(app: &TuiApp) -> &'static str {
    match (&app.mode, app.focus) {
        (InputMode::EditModifier { .. }, _) => "type modifier  Enter:save  Esc:cancel",
        (InputMode::Browse, Panel::Scene) => {
            "j/k:move  Space:select  c:clear  a:add  n:next turn  Tab:panel  ?:help  q:quit"
        }
        (InputMode::Browse, Panel::Tracker) => {
            "j/k:move  r:roll  m:modifier  n:next turn  Tab:panel  ?:help  q:quit"
        }
    }
}
