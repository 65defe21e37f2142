//! Doctor portal login screen

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use crate::auth::{self, DEMO_EMAIL, DEMO_PASSWORD, EMAIL_FIELD, LOGIN_FORM, PASSWORD_FIELD};
use crate::portal_tui::{
    app::Screen as ScreenType,
    components::{Form, FormField, FormFieldType, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{FormHandler, Screen, ScreenAction},
    ui::{centered_rect, render_instructions, Styles},
};
use crate::submission::SubmissionTracker;

pub struct LoginScreen {
    login_delay: Duration,
    pub form: Form,
    tracker: SubmissionTracker,
}

impl LoginScreen {
    pub fn new(login_delay: Duration) -> Self {
        let form = Form::new(
            &LOGIN_FORM,
            vec![
                FormField::text(EMAIL_FIELD, "Email Address").with_placeholder("doctor@healthcare.com"),
                FormField::new(PASSWORD_FIELD, "Password", FormFieldType::Secret)
                    .with_placeholder("Enter your password"),
            ],
        );
        Self {
            login_delay,
            form,
            tracker: SubmissionTracker::new(),
        }
    }

    pub fn is_signing_in(&self) -> bool {
        self.tracker.is_pending()
    }

    fn submit(&mut self, status: &mut StatusDisplay) {
        if self.tracker.is_pending() {
            debug!("login already in progress");
            return;
        }
        let draft = self.form.draft();
        let delay = self.login_delay;
        match self
            .tracker
            .submit(&draft, status, |draft, _| auth::login_action(draft, delay))
        {
            Ok(()) => self.form.mark_missing(&[]),
            Err(err) => {
                debug!("login not submitted: {}", err);
                self.form.mark_missing(&draft.missing_fields());
            }
        }
    }

    fn toggle_password_visibility(&mut self) {
        if let Some(field) = self.form.field_mut(PASSWORD_FIELD) {
            field.toggle_reveal();
        }
    }
}

impl Screen for LoginScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let panel = centered_rect(60, 90, area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(6),
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(panel);

        let header = Paragraph::new(vec![
            Line::from(Span::styled("Doctor Portal", Styles::title())),
            Line::from(Span::styled("Sign in to access your dashboard", Styles::inactive())),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, chunks[0]);

        self.form.render(f, chunks[1]);

        let (label, style) = if self.is_signing_in() {
            ("Signing In...", Styles::warning())
        } else {
            ("Sign In", Styles::success())
        };
        let button = Paragraph::new(label)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        f.render_widget(button, chunks[2]);

        let demo = Paragraph::new(vec![
            Line::from(Span::styled("Demo Credentials:", Styles::info())),
            Line::from(format!("Email: {}  Password: {}", DEMO_EMAIL, DEMO_PASSWORD)),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border()));
        f.render_widget(demo, chunks[3]);

        render_instructions(
            f,
            chunks[4],
            &["Tab next field, F2 show/hide password", "Enter sign in, Esc back to patient portal"],
        );
    }

    async fn handle_key_event(&mut self, key: KeyEvent, status: &mut StatusDisplay) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateTo(ScreenType::Landing)),
            KeyCode::Enter => {
                self.submit(status);
                return Ok(ScreenAction::None);
            }
            KeyCode::F(2) => {
                self.toggle_password_visibility();
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
        "Doctor Login:\n\
         Tab / ↑/↓ - Move between fields\n\
         F2 - Show / hide password\n\
         Enter - Sign in\n\
         Esc - Back to patient portal"
    }

    fn tick(&mut self, status: &mut StatusDisplay) -> ScreenAction {
        match self.tracker.poll(status) {
            Some(route) => ScreenAction::NavigateTo(route.into()),
            None => ScreenAction::None,
        }
    }

    /// Every visit starts from an empty form with the password hidden
    fn on_enter(&mut self) {
        self.form.clear();
        if let Some(field) = self.form.field_mut(PASSWORD_FIELD) {
            field.revealed = false;
        }
        self.tracker.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::MISSING_INFORMATION;

    async fn type_text(screen: &mut LoginScreen, status: &mut StatusDisplay, text: &str) {
        for c in text.chars() {
            screen
                .handle_key_event(KeyEvent::from(KeyCode::Char(c)), status)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_blank_password_is_rejected_without_round_trip() {
        let mut screen = LoginScreen::new(Duration::from_millis(1));
        let mut status = StatusDisplay::new();

        type_text(&mut screen, &mut status, DEMO_EMAIL).await;
        screen.handle_key_event(KeyEvent::from(KeyCode::Enter), &mut status).await.unwrap();

        assert!(!screen.is_signing_in());
        let current = status.get_current().unwrap();
        assert_eq!(current.title, MISSING_INFORMATION);
        assert_eq!(current.message, "Please fill in all fields.");
    }

    #[tokio::test]
    async fn test_valid_credentials_navigate_to_dashboard() {
        let mut screen = LoginScreen::new(Duration::from_millis(1));
        let mut status = StatusDisplay::new();

        type_text(&mut screen, &mut status, DEMO_EMAIL).await;
        screen.handle_key_event(KeyEvent::from(KeyCode::Tab), &mut status).await.unwrap();
        type_text(&mut screen, &mut status, DEMO_PASSWORD).await;
        screen.handle_key_event(KeyEvent::from(KeyCode::Enter), &mut status).await.unwrap();
        assert!(screen.is_signing_in());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(screen.tick(&mut status), ScreenAction::NavigateTo(ScreenType::DoctorDashboard));
        assert_eq!(status.get_current().unwrap().title, "Login Successful");
    }

    #[tokio::test]
    async fn test_wrong_password_stays_on_login() {
        let mut screen = LoginScreen::new(Duration::from_millis(1));
        let mut status = StatusDisplay::new();

        type_text(&mut screen, &mut status, DEMO_EMAIL).await;
        screen.handle_key_event(KeyEvent::from(KeyCode::Tab), &mut status).await.unwrap();
        type_text(&mut screen, &mut status, "wrong").await;
        screen.handle_key_event(KeyEvent::from(KeyCode::Enter), &mut status).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(screen.tick(&mut status), ScreenAction::None);
        let current = status.get_current().unwrap();
        assert_eq!(current.title, "Invalid Credentials");
        assert!(!screen.is_signing_in());
    }

    #[tokio::test]
    async fn test_entering_clears_previous_credentials() {
        let mut screen = LoginScreen::new(Duration::from_millis(1));
        let mut status = StatusDisplay::new();

        type_text(&mut screen, &mut status, DEMO_EMAIL).await;
        screen.handle_key_event(KeyEvent::from(KeyCode::Tab), &mut status).await.unwrap();
        type_text(&mut screen, &mut status, DEMO_PASSWORD).await;
        screen.toggle_password_visibility();

        screen.on_enter();

        assert_eq!(screen.form.value(EMAIL_FIELD), "");
        assert_eq!(screen.form.value(PASSWORD_FIELD), "");
        assert!(!screen.form.field(PASSWORD_FIELD).unwrap().revealed);
        assert_eq!(screen.form.focused_field().map(|f| f.key), Some(EMAIL_FIELD));
    }

    #[test]
    fn test_password_visibility_toggle() {
        let mut screen = LoginScreen::new(Duration::from_millis(1));
        assert!(!screen.form.field(PASSWORD_FIELD).unwrap().revealed);
        screen.toggle_password_visibility();
        assert!(screen.form.field(PASSWORD_FIELD).unwrap().revealed);
    }
}
