//! The host scene: canvas items, selection, and offered context actions.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use imt_core::Layer;

use crate::app::{Panel, TuiApp};

/// Draw the scene panel.
pub fn draw(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let focused = app.focus == Panel::Scene;
    let title = format!(" Scene: {} ", app.host.name());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Items
            Constraint::Length(1), // Context actions
        ])
        .split(inner);

    let items: Vec<ListItem> = app
        .host
        .items()
        .iter()
        .map(|item| {
            let check = if app.host.is_selected(&item.id) {
                "[x] "
            } else {
                "[ ] "
            };
            let name = item.name.clone().unwrap_or_else(|| item.id.to_string());
            let layer_color = match item.layer {
                Layer::Character => Color::Green,
                _ => Color::DarkGray,
            };
            ListItem::new(Line::from(vec![
                Span::styled(check, Style::default().fg(Color::Yellow)),
                Span::raw(name),
                Span::styled(
                    format!("  {}", item.layer),
                    Style::default().fg(layer_color),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = ListState::default();
    if focused && !app.host.items().is_empty() {
        state.select(Some(app.scene_cursor));
    }
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let actions = app.host.available_actions();
    let line = if actions.is_empty() {
        Line::from(Span::styled(
            "no actions for this selection",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let spans: Vec<Span> = actions
            .iter()
            .flat_map(|a| {
                vec![
                    Span::styled(format!("{} ", a.icon), Style::default().fg(Color::Green).bold()),
                    Span::styled(a.label.clone(), Style::default().fg(Color::Green)),
                    Span::styled("  a  ", Style::default().fg(Color::DarkGray)),
                ]
            })
            .collect();
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line), chunks[1]);
}
