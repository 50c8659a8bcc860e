//! UI rendering for the bench.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem},
    style::{Color, Style, Modifier},
};
use crate::circuit::Direction as PortDirection;
use crate::Trit;
use super::app::BenchApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &BenchApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .split(frame.area());

    // Left side: components and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    draw_components(frame, left_chunks[0], app);
    draw_status(frame, left_chunks[1], app);

    // Right side: switches, probes and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(chunks[1]);

    draw_switches(frame, right_chunks[0], app);
    draw_probes(frame, right_chunks[1], app);
    draw_help(frame, right_chunks[2]);
}

/// Draw every component with its port values.
fn draw_components(frame: &mut Frame, area: Rect, app: &BenchApp) {
    let items: Vec<ListItem> = app
        .sim
        .circuit()
        .components()
        .map(|component| {
            let mut spans = vec![
                Span::styled(format!("{:<10}", component.id()), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("{:<14}", component.kind()), Style::default().fg(Color::DarkGray)),
            ];
            for (direction, port, value) in component.ports() {
                let arrow = match direction {
                    PortDirection::In => "▸",
                    PortDirection::Out => "◂",
                };
                spans.push(Span::raw(format!(" {}{}=", arrow, port)));
                spans.push(Span::styled(format!("{}", value), trit_style(value)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(format!(" {} ", app.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(list, area);
}

/// Draw switches, highlighting the selected one.
fn draw_switches(frame: &mut Frame, area: Rect, app: &BenchApp) {
    let items: Vec<ListItem> = app
        .sim
        .circuit()
        .switches()
        .enumerate()
        .map(|(index, component)| {
            let value = component.gate().held().unwrap_or_default();
            let is_selected = index == app.selected;
            let prefix = if is_selected { "▶ " } else { "  " };
            let style = if is_selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{:<10} ", prefix, component.id()), style),
                Span::styled(format!("{}", value), trit_style(value)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Switches ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(list, area);
}

/// Draw probe readings.
fn draw_probes(frame: &mut Frame, area: Rect, app: &BenchApp) {
    let items: Vec<ListItem> = app
        .sim
        .circuit()
        .probes()
        .map(|(id, value)| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("  {:<10} ", id)),
                Span::styled(format!("{}", value), trit_style(value).add_modifier(Modifier::BOLD)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Probes ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(list, area);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &BenchApp) {
    let state = if app.sim.is_running() { "RUN" } else { "STOP" };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("[{} #{}] ", state, app.sim.steps()),
            if app.sim.is_running() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            },
        ),
        Span::raw(app.status.clone()),
    ]))
    .block(Block::default()
        .title(" Status ")
        .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s: Step  r: Run  p: Pause  t/space: Toggle"),
        Line::from("↑↓: Select switch  x: Reset  q: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}

/// Get color style for a signal value.
fn trit_style(t: Trit) -> Style {
    match t {
        Trit::Neg => Style::default().fg(Color::Red),
        Trit::Null => Style::default().fg(Color::Gray),
        Trit::Pos => Style::default().fg(Color::Green),
    }
}
