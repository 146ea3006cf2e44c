use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use crate::app::App;
use crate::navigator::RenderProjection;
use crate::ui::components;
use crate::ui::utils::centered_rect;

/// Block selector modal over the viewer
pub fn render_selector(f: &mut Frame, app: &App, projection: &RenderProjection) {
    let area = centered_rect(40, 60, f.area());
    f.render_widget(Clear, area);

    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::styled(" ", Style::default()),
                Span::styled(
                    "Blocks",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" ", Style::default()),
            ]))
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0)])
        .split(area);

    let Some(list_area) = chunks.first().copied() else {
        return;
    };

    let items: Vec<ListItem> = projection
        .options
        .iter()
        .enumerate()
        .map(|(index, code)| {
            let highlighted = index == app.selector_index;
            let prefix = if highlighted { "> " } else { "  " };
            let marker = if index == projection.selected_index {
                " ●"
            } else {
                ""
            };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:>3}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(code.clone(), components::selected_name_style(highlighted)),
                Span::styled(marker, Style::default().fg(Color::Green)),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.selector_index));
    f.render_stateful_widget(List::new(items), list_area, &mut state);
}
