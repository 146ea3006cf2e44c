/// What the content area currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Idle { html: String },
    Error { message: String },
}

/// The single mutable value behind a navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_index: usize,
    view: ViewState,
}

impl NavigationState {
    /// A freshly mounted state is loading the block at `current_index`.
    pub(crate) fn mounted(current_index: usize) -> Self {
        Self {
            current_index,
            view: ViewState::Loading,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading)
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.view {
            ViewState::Idle { html } => Some(html),
            ViewState::Loading | ViewState::Error { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.view {
            ViewState::Error { message } => Some(message),
            ViewState::Loading | ViewState::Idle { .. } => None,
        }
    }

    /// Moves to `index` and clears content and error.
    pub(crate) fn begin_loading(&mut self, index: usize) {
        self.current_index = index;
        self.view = ViewState::Loading;
    }

    pub(crate) fn finish(&mut self, html: String) {
        self.view = ViewState::Idle { html };
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.view = ViewState::Error { message };
    }
}
