//! Appointment booking screen

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use tracing::debug;

use crate::actions::{self, fields, APPOINTMENT_FORM};
use crate::fixtures::Fixtures;
use crate::portal_tui::{
    components::{Form, FormField, FormFieldType, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{FormHandler, Screen, ScreenAction},
    ui::{render_header, render_instructions},
};

pub struct BookingScreen {
    fixtures: Arc<Fixtures>,
    pub form: Form,
}

impl BookingScreen {
    pub fn new(fixtures: Arc<Fixtures>) -> Self {
        let form = Form::new(
            &APPOINTMENT_FORM,
            vec![
                FormField::new(fields::SPECIALTY, "Specialty", FormFieldType::Dropdown)
                    .with_placeholder("Select specialty")
                    .with_dropdown_options(fixtures.specialty_names()),
                FormField::new(fields::DOCTOR, "Doctor", FormFieldType::Dropdown)
                    .with_placeholder("Choose doctor"),
                FormField::text(fields::DATE, "Date").with_placeholder("YYYY-MM-DD"),
                FormField::new(fields::TIME, "Time", FormFieldType::Dropdown)
                    .with_placeholder("Select time")
                    .with_dropdown_options(fixtures.time_slots.clone()),
                FormField::text(fields::PATIENT_NAME, "Patient Name").with_placeholder("Enter patient name"),
                FormField::text(fields::PHONE, "Phone Number").with_placeholder("Enter phone number"),
                FormField::text(fields::REASON, "Reason for Visit")
                    .with_placeholder("Brief description of your concern"),
            ],
        );
        Self { fixtures, form }
    }

    /// The doctor list follows the chosen specialty
    fn refresh_doctors(&mut self) {
        let doctors = self.fixtures.doctors_for(self.form.value(fields::SPECIALTY));
        if let Some(field) = self.form.field_mut(fields::DOCTOR) {
            field.set_dropdown_options(doctors);
        }
    }

    fn submit(&mut self, status: &mut StatusDisplay) {
        let draft = self.form.draft();
        match actions::book_appointment(&draft, status) {
            Ok(()) => self.form.mark_missing(&[]),
            Err(err) => {
                debug!("booking not submitted: {}", err);
                self.form.mark_missing(&draft.missing_fields());
            }
        }
    }
}

impl Screen for BookingScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(area);

        render_header(
            f,
            chunks[0],
            "Book an Appointment",
            "Schedule a consultation with our experienced doctors",
        );
        self.form.render(f, chunks[1]);
        render_instructions(
            f,
            chunks[2],
            &["Tab/Shift+Tab next/previous field, ↑/↓ choose option", "Enter book appointment, Esc back"],
        );
    }

    async fn handle_key_event(&mut self, key: KeyEvent, status: &mut StatusDisplay) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateBack),
            KeyCode::Enter => {
                self.submit(status);
                return Ok(ScreenAction::None);
            }
            _ => {}
        }

        let specialty_before = self.form.value(fields::SPECIALTY).to_string();
        if let Some(action) = CommonKeyHandler::handle_field_keys(&mut self.form, key) {
            if self.form.value(fields::SPECIALTY) != specialty_before {
                self.refresh_doctors();
            }
            return Ok(action);
        }

        Ok(CommonKeyHandler::handle_form_keys(&mut self.form, key).unwrap_or(ScreenAction::None))
    }

    fn help(&self) -> &'static str {
        "Book Appointment:\n\
         Tab / Shift+Tab - Next / previous field\n\
         ↑/↓ - Choose specialty, doctor or time\n\
         Type - Date, name, phone and reason\n\
         Enter - Book appointment\n\
         Esc - Back\n\n\
         Specialty, doctor, date and time are required."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::MISSING_INFORMATION;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[tokio::test]
    async fn test_changing_specialty_resets_doctor_choices() {
        let mut screen = BookingScreen::new(Arc::new(Fixtures::builtin().unwrap()));
        let mut status = StatusDisplay::new();

        screen.handle_key_event(press(KeyCode::Down), &mut status).await.unwrap();
        let specialty = screen.form.value(fields::SPECIALTY).to_string();
        let expected = screen.fixtures.doctors_for(&specialty);
        assert!(!expected.is_empty());

        screen.form.next_field();
        screen.handle_key_event(press(KeyCode::Down), &mut status).await.unwrap();
        assert_eq!(screen.form.value(fields::DOCTOR), expected[0]);

        screen.form.previous_field();
        screen.handle_key_event(press(KeyCode::Down), &mut status).await.unwrap();
        assert_eq!(screen.form.value(fields::DOCTOR), "");
    }

    #[tokio::test]
    async fn test_enter_with_missing_fields_flags_them() {
        let mut screen = BookingScreen::new(Arc::new(Fixtures::builtin().unwrap()));
        let mut status = StatusDisplay::new();

        screen.handle_key_event(press(KeyCode::Enter), &mut status).await.unwrap();

        assert_eq!(status.get_current().unwrap().title, MISSING_INFORMATION);
        for key in APPOINTMENT_FORM.required {
            assert!(screen.form.field(key).unwrap().validation_error.is_some());
        }
        assert!(screen.form.field(fields::REASON).unwrap().validation_error.is_none());
    }
}
