//! Emergency ambulance request screen

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use crate::actions::{self, fields, EMERGENCY_FORM};
use crate::geolocation::{self, Locator};
use crate::portal_tui::{
    components::{Form, FormField, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{FormHandler, Screen, ScreenAction},
    ui::{render_instructions, Styles},
};

pub struct EmergencyScreen {
    locator: Arc<dyn Locator>,
    pub form: Form,
}

impl EmergencyScreen {
    pub fn new(locator: Arc<dyn Locator>) -> Self {
        let form = Form::new(
            &EMERGENCY_FORM,
            vec![
                FormField::text(fields::PATIENT_NAME, "Patient Name").with_placeholder("Enter patient name"),
                FormField::text(fields::PHONE, "Phone Number").with_placeholder("Emergency contact number"),
                FormField::text(fields::LOCATION, "Location")
                    .with_placeholder("Enter your address or use auto-detect (Ctrl+L)"),
                FormField::text(fields::EMERGENCY_TYPE, "Emergency Type")
                    .with_placeholder("e.g., Heart attack, Accident, Fall, etc."),
                FormField::text(fields::DESCRIPTION, "Additional Details")
                    .with_placeholder("Provide any additional information about the emergency"),
            ],
        );
        Self { locator, form }
    }

    /// Ask the locator once; the typed location is kept when detection fails
    async fn detect_location(&mut self, status: &mut StatusDisplay) {
        status.set_loading("Detecting Location", "Requesting your current position...");
        if let Some(location) = geolocation::detect_location(self.locator.as_ref(), status).await {
            if let Some(field) = self.form.field_mut(fields::LOCATION) {
                field.set_value(&location);
            }
        }
    }

    fn submit(&mut self, status: &mut StatusDisplay) {
        let draft = self.form.draft();
        match actions::request_emergency(&draft, status) {
            Ok(()) => self.form.mark_missing(&[]),
            Err(err) => {
                debug!("emergency request not sent: {}", err);
                self.form.mark_missing(&draft.missing_fields());
            }
        }
    }

    fn draw_banner(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled("Emergency Services", Styles::emergency())),
            Line::from(Span::styled(
                "Life-threatening emergency? Call 911 immediately. Available 24/7.",
                Styles::warning(),
            )),
        ];
        let banner = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::emergency()),
        );
        f.render_widget(banner, area);
    }
}

impl Screen for EmergencyScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(area);

        self.draw_banner(f, chunks[0]);
        self.form.render(f, chunks[1]);
        render_instructions(
            f,
            chunks[2],
            &["Tab/↑/↓ move between fields, Ctrl+L or F2 detect location", "Enter request ambulance, Esc back"],
        );
    }

    async fn handle_key_event(&mut self, key: KeyEvent, status: &mut StatusDisplay) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateBack),
            KeyCode::Enter => {
                self.submit(status);
                return Ok(ScreenAction::None);
            }
            KeyCode::F(2) => {
                self.detect_location(status).await;
                return Ok(ScreenAction::None);
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.detect_location(status).await;
                return Ok(ScreenAction::None);
            }
            _ => {}
        }

        if let Some(action) = CommonKeyHandler::handle_field_keys(&mut self.form, key) {
            return Ok(action);
        }
        Ok(CommonKeyHandler::handle_form_keys(&mut self.form, key).unwrap_or(ScreenAction::None))
    }

    fn help(&self) -> &'static str {
        "Emergency Services:\n\
         Tab / ↑/↓ - Move between fields\n\
         Ctrl+L / F2 - Detect current location\n\
         Enter - Request ambulance\n\
         Esc - Back\n\n\
         Patient name, phone, location and emergency type are required."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::testing::StaticLocator;
    use crate::geolocation::{Coordinates, LocationError};

    fn screen_with(answer: Result<Coordinates, LocationError>) -> EmergencyScreen {
        EmergencyScreen::new(Arc::new(StaticLocator(answer)))
    }

    #[tokio::test]
    async fn test_detected_location_fills_field() {
        let mut screen = screen_with(Coordinates::new(40.712776, -74.005974));
        let mut status = StatusDisplay::new();

        screen.handle_key_event(KeyEvent::from(KeyCode::F(2)), &mut status).await.unwrap();

        assert_eq!(screen.form.value(fields::LOCATION), "40.712776, -74.005974");
        assert_eq!(status.get_current().unwrap().title, "Location Retrieved");
    }

    #[tokio::test]
    async fn test_failed_detection_keeps_typed_location() {
        let mut screen = screen_with(Err(LocationError::PermissionDenied));
        let mut status = StatusDisplay::new();
        if let Some(field) = screen.form.field_mut(fields::LOCATION) {
            field.set_value("12 Main St");
        }

        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL), &mut status)
            .await
            .unwrap();

        assert_eq!(screen.form.value(fields::LOCATION), "12 Main St");
        assert_eq!(status.get_current().unwrap().title, "Location Error");
    }

    #[tokio::test]
    async fn test_request_sent_without_optional_details() {
        let mut screen = screen_with(Err(LocationError::Unsupported));
        let mut status = StatusDisplay::new();
        for (key, value) in [
            (fields::PATIENT_NAME, "David Brown"),
            (fields::PHONE, "+1-555-0127"),
            (fields::LOCATION, "12 Main St"),
            (fields::EMERGENCY_TYPE, "Fall"),
        ] {
            if let Some(field) = screen.form.field_mut(key) {
                field.set_value(value);
            }
        }

        screen.handle_key_event(KeyEvent::from(KeyCode::Enter), &mut status).await.unwrap();
        assert_eq!(status.get_current().unwrap().title, "Emergency Request Sent!");
    }
}
