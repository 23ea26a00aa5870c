//! The initiative list and the turn control.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{InputMode, Panel, TuiApp};

/// Background of the row whose turn it is.
const ACTIVE_BG: Color = Color::Rgb(0x33, 0x33, 0x33);

/// Draw the tracker panel.
pub fn draw(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let focused = app.focus == Panel::Tracker;
    let block = Block::default()
        .title(" Initiative ")
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Rows
            Constraint::Length(1), // Next Turn
        ])
        .split(inner);

    let view = app.presenter.view();

    if view.rows.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "No one tracked. Select character pieces and press a.",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(hint, chunks[0]);
    } else {
        let rows: Vec<Row> = view
            .rows
            .iter()
            .map(|row| {
                let modifier = match &app.mode {
                    InputMode::EditModifier { id, buffer } if id == &row.id => Cell::from(
                        Span::styled(format!("{buffer}_"), Style::default().fg(Color::Yellow).bold()),
                    ),
                    _ => Cell::from(row.modifier_field.clone()),
                };
                let marker = if row.active { "\u{25b6}" } else { " " };
                let roll = row.roll.map(|r| r.to_string()).unwrap_or_else(|| "-".into());
                let style = if row.active {
                    Style::default().bg(ACTIVE_BG).fg(Color::White).bold()
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(marker),
                    Cell::from(row.name.clone()),
                    Cell::from(Text::from(row.initiative.to_string()).right_aligned()),
                    modifier,
                    Cell::from(Span::styled(roll, Style::default().fg(Color::DarkGray))),
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(vec!["", "Name", "Init", "Mod", "Roll"])
            .style(Style::default().fg(Color::DarkGray));

        let widths = [
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(5),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default();
        if focused {
            state.select(Some(app.tracker_cursor));
        }
        frame.render_stateful_widget(table, chunks[0], &mut state);
    }

    let button = Line::from(vec![
        Span::styled(
            format!("[ {} ]", view.next_turn_label()),
            Style::default().fg(Color::Black).bg(Color::Green).bold(),
        ),
        Span::styled("  n", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(button), chunks[1]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
