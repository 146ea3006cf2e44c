mod block;
mod components;
mod help;
pub mod markup;
mod selector;
mod utils;

use crate::app::{App, AppMode};
use ratatui::Frame;

pub fn render(f: &mut Frame, app: &App) {
    let projection = app.projection();
    match app.mode {
        AppMode::Viewing => block::render_block_view(f, app, &projection),
        AppMode::Selector => {
            // Show the viewer as background, then overlay the selector
            block::render_block_view(f, app, &projection);
            selector::render_selector(f, app, &projection);
        }
        AppMode::Help => help::render_help_view(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{StaticFetcher, runtime, settle, test_app, test_app_with};
    use crate::navigator::NavigationIntent;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_loading_view_shows_overlay() {
        let runtime = runtime();
        let app = test_app(&runtime, &["b1", "b2"], &[]);
        let screen = draw(&app);
        assert!(screen.contains("Loading b1"));
        assert!(screen.contains("Proposal 2024-1-SCI-001"));
        assert!(screen.contains("block 1/2"));
    }

    #[test]
    fn test_idle_view_shows_content() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1", "b2"], &[]);
        settle(&mut app);
        let screen = draw(&app);
        assert!(screen.contains("content of b1"));
        assert!(!screen.contains("Loading"));
        assert!(!screen.contains("Something's wrong"));
    }

    #[test]
    fn test_error_view_shows_banner() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1", "b2", "b3"], &["b2"]);
        settle(&mut app);
        app.navigate(NavigationIntent::Next);
        settle(&mut app);

        let screen = draw(&app);
        assert!(screen.contains("Something's wrong: not found"));
        assert!(screen.contains("block 2/3"));
        assert!(!screen.contains("content of"));
    }

    #[test]
    fn test_selector_lists_blocks() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1", "b2", "b3"], &[]);
        settle(&mut app);
        app.open_selector();

        let screen = draw(&app);
        assert!(screen.contains("Blocks"));
        assert!(screen.contains("2. b2"));
        assert!(screen.contains("3. b3"));
    }

    #[test]
    fn test_help_view() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1"], &[]);
        app.open_help();
        let screen = draw(&app);
        assert!(screen.contains("Reload current block"));
    }

    #[test]
    fn test_long_block_scrolls_to_its_last_line() {
        let runtime = runtime();
        let html = format!("<p>{}TAILMARK</p>", "lorem ".repeat(599));
        let fetcher = StaticFetcher {
            bodies: vec![("b1".to_string(), html)],
            ..StaticFetcher::default()
        };
        let mut app = test_app_with(&runtime, &["b1"], fetcher);
        settle(&mut app);

        let screen = draw(&app);
        assert!(screen.contains("lorem"));
        assert!(!screen.contains("TAILMARK"));

        for _ in 0..50 {
            app.scroll_content_down_page();
        }
        let screen = draw(&app);
        assert!(screen.contains("TAILMARK"));
        assert_eq!(app.content_scroll, app.content_scroll_limit.get());

        // One line back up hides the tail again
        app.scroll_content_up(1);
        assert!(!draw(&app).contains("TAILMARK"));
    }
}
