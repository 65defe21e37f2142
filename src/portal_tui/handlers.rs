//! Common event handlers for the portal TUI
//!
//! Reusable key handling composed by the screens. Each handler returns
//! `Some(action)` when it consumed the key.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::components::{Form, FormFieldType};
use super::traits::{FormHandler, Navigable, ScreenAction};

/// Common keyboard event handling utilities
pub struct CommonKeyHandler;

impl CommonKeyHandler {
    /// Handle navigation keys for list-based screens
    pub fn handle_navigation_keys<T: Navigable + ?Sized>(
        navigable: &mut T,
        key: KeyEvent,
    ) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Up => {
                navigable.navigate_up();
                Some(ScreenAction::None)
            }
            KeyCode::Down => {
                navigable.navigate_down();
                Some(ScreenAction::None)
            }
            KeyCode::PageUp => {
                navigable.navigate_to_first();
                Some(ScreenAction::None)
            }
            KeyCode::PageDown => {
                navigable.navigate_to_last();
                Some(ScreenAction::None)
            }
            _ => None,
        }
    }

    /// Handle form navigation and text editing
    pub fn handle_form_keys<T: FormHandler + ?Sized>(
        form: &mut T,
        key: KeyEvent,
    ) -> Option<ScreenAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        match key.code {
            KeyCode::Tab => {
                form.next_field();
                Some(ScreenAction::None)
            }
            KeyCode::BackTab => {
                form.previous_field();
                Some(ScreenAction::None)
            }
            KeyCode::Char(c) => {
                form.handle_char_input(c);
                Some(ScreenAction::None)
            }
            KeyCode::Backspace => {
                form.handle_backspace();
                Some(ScreenAction::None)
            }
            KeyCode::Delete => {
                form.handle_delete();
                Some(ScreenAction::None)
            }
            KeyCode::Left => {
                form.handle_cursor_left();
                Some(ScreenAction::None)
            }
            KeyCode::Right => {
                form.handle_cursor_right();
                Some(ScreenAction::None)
            }
            _ => None,
        }
    }

    /// Up/Down cycle the options of a focused dropdown, otherwise move between fields
    pub fn handle_field_keys(form: &mut Form, key: KeyEvent) -> Option<ScreenAction> {
        let on_dropdown = form
            .focused_field()
            .map(|field| field.field_type == FormFieldType::Dropdown)
            .unwrap_or(false);
        let handled = match (key.code, on_dropdown) {
            (KeyCode::Up, true) => form.focused_field_mut().map(|field| field.dropdown_up()),
            (KeyCode::Down, true) => form.focused_field_mut().map(|field| field.dropdown_down()),
            (KeyCode::Up, false) => Some(form.previous_field()),
            (KeyCode::Down, false) => Some(form.next_field()),
            _ => None,
        };
        handled.map(|_| ScreenAction::None)
    }

    /// Handle keys that work on every screen
    pub fn handle_global_keys(key: KeyEvent) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(ScreenAction::Quit)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_quits_but_plain_c_does_not() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(CommonKeyHandler::handle_global_keys(ctrl_c), Some(ScreenAction::Quit));
        assert_eq!(CommonKeyHandler::handle_global_keys(KeyEvent::from(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_arrow_keys_cycle_dropdown_or_move_focus() {
        use crate::actions::{fields, APPOINTMENT_FORM};
        use crate::portal_tui::components::FormField;

        let mut form = Form::new(
            &APPOINTMENT_FORM,
            vec![
                FormField::new(fields::TIME, "Time", FormFieldType::Dropdown)
                    .with_dropdown_options(vec!["09:00 AM".to_string(), "09:30 AM".to_string()]),
                FormField::text(fields::DATE, "Date"),
            ],
        );

        CommonKeyHandler::handle_field_keys(&mut form, KeyEvent::from(KeyCode::Down));
        assert_eq!(form.value(fields::TIME), "09:00 AM");
        assert_eq!(form.focused_field().map(|f| f.key), Some(fields::TIME));

        form.next_field();
        CommonKeyHandler::handle_field_keys(&mut form, KeyEvent::from(KeyCode::Down));
        assert_eq!(form.focused_field().map(|f| f.key), Some(fields::TIME));
        assert!(CommonKeyHandler::handle_field_keys(&mut form, KeyEvent::from(KeyCode::Enter)).is_none());
    }
}
