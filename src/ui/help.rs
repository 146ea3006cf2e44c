use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::components;

const SHORTCUTS: &[(&str, &str)] = &[
    ("←  h  p", "Previous block"),
    ("→  l  n", "Next block"),
    ("1 - 9", "Jump to block"),
    ("Tab  s", "Open block selector"),
    ("r", "Reload current block"),
    ("↑↓ j k", "Scroll content"),
    ("PgUp PgDn", "Scroll a page"),
    ("Home", "Back to top"),
    ("?", "This help"),
    ("q  Esc", "Quit"),
    ("Ctrl+C", "Quit"),
];

pub fn render_help_view(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    if let [header, body, footer] = &chunks[..] {
        components::render_view_header(f, *header, "Help");
        render_help_body(f, *body);
        render_help_footer(f, *footer);
    }
}

fn render_help_body(f: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Navigation",
            Style::default().fg(Color::Cyan),
        )]),
        Line::from(""),
    ];
    lines.extend(SHORTCUTS.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("  {:<11}", keys), Style::default().fg(Color::Yellow)),
            Span::styled(*action, Style::default().fg(Color::White)),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        "  Prev and Next are disabled at the ends of the list and while a block is loading.",
        Style::default().fg(Color::DarkGray),
    )]));

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn render_help_footer(f: &mut Frame, area: Rect) {
    components::render_navigation_footer(f, area, "HELP", &[("Esc", "back")], &[]);
}
