use super::blocks::BlockList;
use super::state::{NavigationState, ViewState};

/// Everything a renderer needs to draw the viewer. Derived from state only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderProjection {
    pub proposal_code: String,
    pub content: Option<String>,
    pub error_banner: Option<String>,
    pub loading_overlay: bool,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    pub selected_index: usize,
    pub options: Vec<String>,
}

impl RenderProjection {
    /// Code of the selected block, as shown by the selector.
    #[must_use]
    pub fn selected_code(&self) -> Option<&str> {
        self.options.get(self.selected_index).map(String::as_str)
    }
}

pub fn project(proposal_code: &str, blocks: &BlockList, state: &NavigationState) -> RenderProjection {
    let index = state.current_index();
    let loading = state.is_loading();
    let (content, error_banner) = match state.view() {
        ViewState::Idle { html } => (Some(html.clone()), None),
        ViewState::Error { message } => (None, Some(message.clone())),
        ViewState::Loading => (None, None),
    };

    RenderProjection {
        proposal_code: proposal_code.to_string(),
        content,
        error_banner,
        loading_overlay: loading,
        previous_disabled: index == 0 || loading,
        next_disabled: index >= blocks.last_index() || loading,
        selected_index: index,
        options: blocks.iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_blocks() -> BlockList {
        BlockList::new(vec!["b1".into(), "b2".into(), "b3".into()]).unwrap()
    }

    #[test]
    fn test_loading_disables_both_controls() {
        let state = NavigationState::mounted(1);
        let projection = project("2024-1-SCI-001", &three_blocks(), &state);
        assert!(projection.loading_overlay);
        assert!(projection.previous_disabled);
        assert!(projection.next_disabled);
        assert_eq!(projection.content, None);
        assert_eq!(projection.error_banner, None);
        assert_eq!(projection.selected_code(), Some("b2"));
    }

    #[test]
    fn test_idle_at_first_block() {
        let mut state = NavigationState::mounted(0);
        state.finish("<p>one</p>".into());
        let projection = project("P", &three_blocks(), &state);
        assert_eq!(projection.content.as_deref(), Some("<p>one</p>"));
        assert!(!projection.loading_overlay);
        assert!(projection.previous_disabled);
        assert!(!projection.next_disabled);
    }

    #[test]
    fn test_error_in_the_middle_enables_both_controls() {
        let mut state = NavigationState::mounted(0);
        state.begin_loading(1);
        state.fail("not found".into());
        let projection = project("P", &three_blocks(), &state);
        assert_eq!(projection.error_banner.as_deref(), Some("not found"));
        assert_eq!(projection.content, None);
        assert!(!projection.previous_disabled);
        assert!(!projection.next_disabled);
        assert_eq!(projection.selected_index, 1);
    }

    #[test]
    fn test_single_block_disables_both_controls() {
        let blocks = BlockList::new(vec!["only".into()]).unwrap();
        let mut state = NavigationState::mounted(0);
        state.finish(String::new());
        let projection = project("P", &blocks, &state);
        assert!(projection.previous_disabled);
        assert!(projection.next_disabled);
        assert_eq!(projection.options, vec!["only".to_string()]);
    }
}
