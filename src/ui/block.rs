use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::App;
use crate::navigator::RenderProjection;
use crate::ui::components;
use crate::ui::markup::{html_to_text, wrap_lines};
use crate::ui::utils::centered_rect;

/// Draws the viewer from a projection. Only scroll, animation and toast
/// come from the app itself.
pub fn render_block_view(f: &mut Frame, app: &App, projection: &RenderProjection) {
    let banner_height = if projection.error_banner.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(3),             // Navigation
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(0),                // Content
            Constraint::Length(3),             // Footer
        ])
        .split(f.area());

    if let [header, navigation, banner, content, footer] = &chunks[..] {
        render_header(f, app, projection, *header);
        render_navigation(f, projection, *navigation);
        if let Some(message) = &projection.error_banner {
            render_error_banner(f, message, *banner);
        }
        render_content(f, app, projection, *content);
        if projection.loading_overlay {
            render_loading_overlay(f, app, projection, *content);
        }
        render_footer(f, projection, *footer);

        if let Some(message) = app.status_toast_message() {
            let toast_area = Rect {
                x: header.x + 1,
                y: header.y + 1,
                width: header.width.saturating_sub(2),
                height: 1,
            };
            components::render_status_toast(f, toast_area, message);
        }
    }
}

fn render_header(f: &mut Frame, app: &App, projection: &RenderProjection, area: Rect) {
    let mut extra = vec![
        Span::styled(" · ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(
                "block {}/{}",
                projection.selected_index + 1,
                projection.options.len()
            ),
            Style::default().fg(Color::White),
        ),
    ];
    if let Some(loaded_at) = &app.last_loaded_at {
        extra.push(Span::styled(
            format!("  loaded {}", loaded_at),
            Style::default().fg(Color::DarkGray),
        ));
    }
    components::render_view_header_with_extra(
        f,
        area,
        &format!("Proposal {}", projection.proposal_code),
        extra,
    );
}

fn render_navigation(f: &mut Frame, projection: &RenderProjection, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(0),
            Constraint::Length(12),
        ])
        .split(area);

    if let [previous, selector, next] = &chunks[..] {
        render_control(f, "◀ Prev", projection.previous_disabled, *previous);
        render_selector_value(f, projection, *selector);
        render_control(f, "Next ▶", projection.next_disabled, *next);
    }
}

fn render_control(f: &mut Frame, label: &str, disabled: bool, area: Rect) {
    let style = components::control_style(disabled);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(label.to_string(), style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style)),
        area,
    );
}

// The selector always mirrors the current index, even while loading
fn render_selector_value(f: &mut Frame, projection: &RenderProjection, area: Rect) {
    let code = projection.selected_code().unwrap_or_default();
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                code.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▾", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn render_error_banner(f: &mut Frame, message: &str, area: Rect) {
    f.render_widget(
        Paragraph::new(Line::from(vec![Span::styled(
            format!(" Something's wrong: {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        ),
        area,
    );
}

fn render_content(f: &mut Frame, app: &App, projection: &RenderProjection, area: Rect) {
    let text = projection
        .content
        .as_deref()
        .map(html_to_text)
        .unwrap_or_default();
    let wrapped = wrap_lines(&text, area.width.saturating_sub(2) as usize);

    // Scroll is clamped so the last line can reach the bottom edge and no further
    let visible_height = area.height.saturating_sub(2) as usize;
    let max_scroll = u16::try_from(wrapped.len().saturating_sub(visible_height)).unwrap_or(u16::MAX);
    app.content_scroll_limit.set(max_scroll);
    let scroll = app.content_scroll.min(max_scroll);

    let lines: Vec<Line> = wrapped
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::White))))
        .collect();

    f.render_widget(
        Paragraph::new(lines).scroll((scroll, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn render_loading_overlay(f: &mut Frame, app: &App, projection: &RenderProjection, area: Rect) {
    let overlay = centered_rect(40, 30, area);
    f.render_widget(Clear, overlay);

    let code = projection.selected_code().unwrap_or_default();
    let spinner = components::spinner_frame(app.loading_frame);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    spinner,
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" Loading {}", code),
                    Style::default().fg(Color::White),
                ),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .style(Style::default().bg(Color::Black)),
        ),
        overlay,
    );
}

fn render_footer(f: &mut Frame, projection: &RenderProjection, area: Rect) {
    components::render_navigation_footer(
        f,
        area,
        "VIEW",
        &[
            ("←→", "prev/next"),
            ("Tab", "select"),
            ("r", "reload"),
            ("?", "help"),
            ("q", "quit"),
        ],
        &[("LOADING", projection.loading_overlay)],
    );
}
