use crate::app::{App, AppMode, Navigable};
use crate::navigator::NavigationIntent;

impl App {
    /// Opens the block selector with the cursor on the current block
    pub fn open_selector(&mut self) {
        self.selector_index = self.navigator.state().current_index();
        self.mode = AppMode::Selector;
    }

    pub fn close_selector(&mut self) {
        self.mode = AppMode::Viewing;
    }

    /// Selects the highlighted block and returns to the viewer
    pub fn confirm_selector(&mut self) {
        let index = self.selector_index;
        self.close_selector();
        self.navigate(NavigationIntent::Select(index));
    }
}

// Selector cursor navigation
impl Navigable for App {
    fn get_item_count(&self) -> usize {
        self.navigator.blocks().len()
    }

    fn get_selected_index(&self) -> usize {
        self.selector_index
    }

    fn set_selected_index(&mut self, index: usize) {
        self.selector_index = index;
    }
}
