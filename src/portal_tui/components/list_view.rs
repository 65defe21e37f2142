//! Selectable list used by the menus and the record listings

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::portal_tui::{traits::Navigable, ui::Styles};

/// Items with a wrap-around selection. Record listings hold indices into a
/// fixture collection rather than the records themselves.
pub struct ListView<T> {
    pub items: Vec<T>,
    pub state: ListState,
    pub title: String,
}

impl<T> ListView<T> {
    pub fn new(items: Vec<T>, title: &str) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }

        Self {
            items,
            state,
            title: title.to_string(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Get currently selected item
    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Navigate to next item
    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Navigate to previous item
    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Draw the items; `row` receives each item and whether it is selected
    pub fn render<F>(&mut self, f: &mut Frame, area: Rect, row: F)
    where
        F: Fn(&T, bool) -> ListItem<'static>,
    {
        let selected = self.state.selected();
        let rows: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| row(item, selected == Some(i)))
            .collect();

        let list = List::new(rows)
            .block(
                Block::default()
                    .title(self.title.clone())
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(list, area, &mut self.state);
    }
}

impl<T: PartialEq> ListView<T> {
    /// Replace the items. The selected item stays selected if it is still
    /// present, otherwise the first item is.
    pub fn set_items(&mut self, items: Vec<T>) {
        let kept = self
            .selected()
            .and_then(|current| items.iter().position(|item| item == current));
        self.items = items;
        let fallback = if self.items.is_empty() { None } else { Some(0) };
        self.state.select(kept.or(fallback));
    }
}

impl<T> Navigable for ListView<T> {
    fn navigate_up(&mut self) {
        self.previous();
    }

    fn navigate_down(&mut self) {
        self.next();
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.items.len()
    }
}
