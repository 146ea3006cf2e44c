const PAGE_LINES: u16 = 20;

impl crate::app::App {
    pub fn scroll_content_up(&mut self, lines: u16) {
        let from = self.content_scroll.min(self.content_scroll_limit.get());
        self.content_scroll = from.saturating_sub(lines);
    }

    /// Stops once the last wrapped line sits at the bottom of the content area
    pub fn scroll_content_down(&mut self, lines: u16) {
        let limit = self.content_scroll_limit.get();
        self.content_scroll = self.content_scroll.saturating_add(lines).min(limit);
    }

    pub fn scroll_content_up_page(&mut self) {
        self.scroll_content_up(PAGE_LINES);
    }

    pub fn scroll_content_down_page(&mut self) {
        self.scroll_content_down(PAGE_LINES);
    }

    pub fn scroll_content_to_top(&mut self) {
        self.content_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use crate::app::tests::{runtime, settle, test_app};

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1"], &[]);
        settle(&mut app);

        app.scroll_content_down_page();
        assert_eq!(app.content_scroll, 0);

        app.content_scroll_limit.set(30);
        app.scroll_content_down(3);
        assert_eq!(app.content_scroll, 3);
        app.scroll_content_down_page();
        assert_eq!(app.content_scroll, 23);
        app.scroll_content_down_page();
        assert_eq!(app.content_scroll, 30);
        app.scroll_content_up(30);
        assert_eq!(app.content_scroll, 0);
    }

    #[test]
    fn test_scroll_up_starts_from_the_visible_offset() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1"], &[]);
        settle(&mut app);

        // The area grew after scrolling, so fewer lines are hidden now
        app.content_scroll = 40;
        app.content_scroll_limit.set(10);
        app.scroll_content_up(1);
        assert_eq!(app.content_scroll, 9);
    }
}
