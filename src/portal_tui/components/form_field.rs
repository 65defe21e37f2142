//! Form field component for user input

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::portal_tui::{traits::FormHandler, ui::Styles};
use crate::submission::{FormDefinition, FormDraft};

/// Type of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Text,
    /// Masked unless revealed
    Secret,
    /// Value chosen from a fixed option list with Up/Down
    Dropdown,
}

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub required: bool,
    pub is_focused: bool,
    pub revealed: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
    pub dropdown_options: Vec<String>,
    pub dropdown_selected: Option<usize>,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(key: &'static str, label: &str, field_type: FormFieldType) -> Self {
        Self {
            key,
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            required: false,
            is_focused: false,
            revealed: false,
            cursor_position: 0,
            dropdown_options: Vec::new(),
            dropdown_selected: None,
            validation_error: None,
        }
    }

    pub fn text(key: &'static str, label: &str) -> Self {
        Self::new(key, label, FormFieldType::Text)
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_dropdown_options(mut self, options: Vec<String>) -> Self {
        self.set_dropdown_options(options);
        self
    }

    /// Replace the options; the current value is cleared
    pub fn set_dropdown_options(&mut self, options: Vec<String>) {
        self.dropdown_options = options;
        self.dropdown_selected = None;
        self.value.clear();
        self.cursor_position = 0;
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = value.chars().count();
        self.validation_error = None;
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn toggle_reveal(&mut self) {
        self.revealed = !self.revealed;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        let at = self.byte_index(self.cursor_position);
        self.value.insert(at, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        if self.cursor_position < self.value.chars().count() {
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.dropdown_selected = None;
        self.validation_error = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Select the previous option, wrapping around
    pub fn dropdown_up(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        let new_selected = match self.dropdown_selected {
            Some(0) | None => self.dropdown_options.len() - 1,
            Some(i) => i - 1,
        };
        self.select_dropdown(new_selected);
    }

    /// Select the next option, wrapping around
    pub fn dropdown_down(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        let new_selected = match self.dropdown_selected {
            Some(i) => (i + 1) % self.dropdown_options.len(),
            None => 0,
        };
        self.select_dropdown(new_selected);
    }

    fn select_dropdown(&mut self, index: usize) {
        if let Some(value) = self.dropdown_options.get(index).cloned() {
            self.dropdown_selected = Some(index);
            self.set_value(&value);
        }
    }

    fn display_value(&self) -> String {
        match self.field_type {
            FormFieldType::Secret if !self.revealed => "•".repeat(self.value.chars().count()),
            FormFieldType::Dropdown if !self.value.is_empty() => format!("◀ {} ▶", self.value),
            _ => self.value.clone(),
        }
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
        let display_text = if showing_placeholder {
            self.placeholder.clone()
        } else {
            self.display_value()
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let label = if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        };
        let title = if let Some(ref error) = self.validation_error {
            format!("{} - {}", label, error)
        } else {
            label
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if showing_placeholder {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let paragraph = Paragraph::new(display_text)
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        if self.is_focused && self.field_type != FormFieldType::Dropdown {
            let before: String = self.display_value().chars().take(self.cursor_position).collect();
            let cursor_x = area.x + 1 + before.width() as u16;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

/// Form container that manages multiple fields
#[derive(Debug, Clone)]
pub struct Form {
    pub definition: &'static FormDefinition,
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl Form {
    /// Fields whose key is required by `definition` are marked as such
    pub fn new(definition: &'static FormDefinition, fields: Vec<FormField>) -> Self {
        let fields = fields
            .into_iter()
            .map(|field| {
                if definition.required.contains(&field.key) {
                    field.required()
                } else {
                    field
                }
            })
            .collect();
        let mut form = Self {
            definition,
            fields,
            current_field: 0,
        };
        form.update_focus();
        form
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    pub fn value(&self, key: &str) -> &str {
        self.field(key).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        self.fields.get(self.current_field)
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    /// Flag the named fields as missing so they render in red
    pub fn mark_missing(&mut self, missing: &[&str]) {
        for field in &mut self.fields {
            field.validation_error = if missing.contains(&field.key) {
                Some("required".to_string())
            } else {
                None
            };
        }
    }

    /// Reset every field and focus the first one
    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.current_field = 0;
        self.update_focus();
    }

    /// Render fields stacked vertically, three rows each
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|_| Constraint::Length(3))
            .chain(std::iter::once(Constraint::Min(0)))
            .collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (field, chunk) in self.fields.iter().zip(chunks.iter()) {
            field.render(f, *chunk);
        }
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.focused_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.focused_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.focused_field_mut() {
            field.delete_char_forward();
        }
    }

    fn handle_cursor_left(&mut self) {
        if let Some(field) = self.focused_field_mut() {
            field.move_cursor_left();
        }
    }

    fn handle_cursor_right(&mut self) {
        if let Some(field) = self.focused_field_mut() {
            field.move_cursor_right();
        }
    }

    fn draft(&self) -> FormDraft {
        self.fields
            .iter()
            .fold(FormDraft::new(self.definition), |draft, field| {
                draft.with_value(field.key, field.value.clone())
            })
    }
}
