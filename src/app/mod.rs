mod help;
mod navigation;
mod scroll;
mod selector;
mod types;

pub use navigation::Navigable;
pub use types::*;

use crate::navigator::{BlockNavigator, NavigationIntent, RenderProjection};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// How long a status toast stays visible
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Main application state
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,
    pub navigator: BlockNavigator,

    // Selector popup cursor, separate from the navigator's selection until confirmed
    pub selector_index: usize,

    pub content_scroll: u16,
    // Largest useful offset for the wrapped content, recorded on every draw
    pub content_scroll_limit: Cell<u16>,
    pub status_toast: Option<StatusToast>,
    pub last_loaded_at: Option<String>,
    pub loading_frame: u8,
    pub last_loading_tick: Option<Instant>,
}

impl App {
    /// Creates the application around an already mounted navigator
    pub fn new(navigator: BlockNavigator) -> Self {
        let selector_index = navigator.state().current_index();
        Self {
            mode: AppMode::Viewing,
            should_quit: false,
            navigator,
            selector_index,
            content_scroll: 0,
            content_scroll_limit: Cell::new(0),
            status_toast: None,
            last_loaded_at: None,
            loading_frame: 0,
            last_loading_tick: None,
        }
    }

    #[must_use]
    pub fn projection(&self) -> RenderProjection {
        self.navigator.projection()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.navigator.state().is_loading()
    }

    /// Applies settled fetches. Called once per frame from the event loop.
    pub fn check_fetch_events(&mut self) {
        if self.navigator.pump() > 0 {
            self.content_scroll = 0;
            self.last_loaded_at = Some(chrono::Local::now().format("%H:%M:%S").to_string());
        }
    }

    /// Forwards an intent to the navigator, explaining rejected ones with a toast.
    pub fn navigate(&mut self, intent: NavigationIntent) {
        if self.navigator.dispatch(intent) {
            self.content_scroll = 0;
            return;
        }

        // Only direct selection ignores loading; it fails on range alone
        let message = match intent {
            NavigationIntent::Select(_) => "NO SUCH BLOCK",
            _ if self.is_loading() => "LOADING",
            NavigationIntent::Previous => "FIRST BLOCK",
            NavigationIntent::Next => "LAST BLOCK",
            NavigationIntent::Reload => "LOADING",
        };
        self.show_status_toast(message);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Detaches the navigator, cancelling any fetch still in flight
    pub fn shutdown(self) {
        self.navigator.detach();
    }

    pub fn show_status_toast(&mut self, message: impl Into<String>) {
        self.status_toast = Some(StatusToast::new(message));
    }

    pub fn clear_expired_status_toast(&mut self) {
        let should_clear = self
            .status_toast
            .as_ref()
            .is_some_and(|toast| toast.is_expired(TOAST_DURATION));
        if should_clear {
            self.status_toast = None;
        }
    }

    #[must_use]
    pub fn status_toast_message(&self) -> Option<&str> {
        self.status_toast.as_ref().map(|toast| toast.message.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fetch::{ContentFetcher, FetchError};
    use crate::navigator::MountConfig;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    /// Answers every block immediately; `broken` blocks fail and `bodies`
    /// replace the default html for their block.
    #[derive(Default)]
    pub(crate) struct StaticFetcher {
        pub broken: Vec<String>,
        pub bodies: Vec<(String, String)>,
    }

    #[async_trait]
    impl ContentFetcher for StaticFetcher {
        async fn fetch(
            &self,
            _proposal_code: &str,
            block_code: &str,
            _cancel: CancellationToken,
        ) -> Result<String, FetchError> {
            if self.broken.iter().any(|code| code == block_code) {
                return Err(FetchError::Rejected {
                    status: 404,
                    detail: "not found".to_string(),
                });
            }
            if let Some((_, html)) = self.bodies.iter().find(|(code, _)| code == block_code) {
                return Ok(html.clone());
            }
            Ok(format!("<p>content of {block_code}</p>"))
        }
    }

    pub(crate) fn test_app(runtime: &tokio::runtime::Runtime, codes: &[&str], broken: &[&str]) -> App {
        let fetcher = StaticFetcher {
            broken: broken.iter().map(|code| code.to_string()).collect(),
            ..StaticFetcher::default()
        };
        test_app_with(runtime, codes, fetcher)
    }

    pub(crate) fn test_app_with(
        runtime: &tokio::runtime::Runtime,
        codes: &[&str],
        fetcher: StaticFetcher,
    ) -> App {
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(fetcher);
        let config = MountConfig::new("2024-1-SCI-001", codes.iter().map(|c| c.to_string()).collect());
        let navigator = BlockNavigator::mount(config, fetcher, runtime.handle().clone()).unwrap();
        App::new(navigator)
    }

    /// Waits for the live fetch, then lets the app pick up the outcome.
    pub(crate) fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.is_loading() && Instant::now() < deadline {
            app.check_fetch_events();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!app.is_loading(), "fetch never settled");
    }

    pub(crate) fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    #[test]
    fn test_settled_fetch_resets_scroll_and_stamps_time() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1", "b2"], &[]);
        app.content_scroll = 12;
        settle(&mut app);
        assert_eq!(app.content_scroll, 0);
        assert!(app.last_loaded_at.is_some());
        assert_eq!(app.projection().content.as_deref(), Some("<p>content of b1</p>"));
    }

    #[test]
    fn test_rejected_intents_show_toast() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1", "b2"], &[]);

        app.navigate(NavigationIntent::Next);
        assert_eq!(app.status_toast_message(), Some("LOADING"));
        app.navigate(NavigationIntent::Select(9));
        assert_eq!(app.status_toast_message(), Some("NO SUCH BLOCK"));
        assert!(app.is_loading());

        settle(&mut app);
        app.navigate(NavigationIntent::Previous);
        assert_eq!(app.status_toast_message(), Some("FIRST BLOCK"));
        assert_eq!(app.navigator.state().current_index(), 0);

        app.navigate(NavigationIntent::Select(5));
        assert_eq!(app.status_toast_message(), Some("NO SUCH BLOCK"));

        app.navigate(NavigationIntent::Next);
        settle(&mut app);
        app.navigate(NavigationIntent::Next);
        assert_eq!(app.status_toast_message(), Some("LAST BLOCK"));
        assert_eq!(app.navigator.current_block(), Some("b2"));
    }

    #[test]
    fn test_error_keeps_viewer_interactive() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1", "b2", "b3"], &["b2"]);
        settle(&mut app);

        app.navigate(NavigationIntent::Next);
        settle(&mut app);
        let projection = app.projection();
        assert_eq!(projection.error_banner.as_deref(), Some("not found"));
        assert!(!projection.previous_disabled);
        assert!(!projection.next_disabled);

        app.navigate(NavigationIntent::Next);
        assert!(app.projection().error_banner.is_none());
        settle(&mut app);
        assert_eq!(app.navigator.current_block(), Some("b3"));
    }

    #[test]
    fn test_toast_expires() {
        let runtime = runtime();
        let mut app = test_app(&runtime, &["b1"], &[]);
        app.status_toast = Some(StatusToast {
            message: "OLD".to_string(),
            created_at: Instant::now() - Duration::from_secs(10),
        });
        app.clear_expired_status_toast();
        assert_eq!(app.status_toast_message(), None);
    }
}
