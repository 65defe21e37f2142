//! Video consultation screen: doctor search plus an intake form

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::ListItem,
    Frame,
};
use tracing::warn;

use crate::actions::{self, fields, VIDEO_INTAKE_FORM};
use crate::fixtures::Fixtures;
use crate::listing::{self, Query};
use crate::models::Doctor;
use crate::portal_tui::{
    components::{Form, FormField, ListView, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{FormHandler, Screen, ScreenAction},
    ui::{pad, render_empty_state, render_header, render_instructions, Styles},
};
use crate::submission::SubmissionTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Doctors,
    Intake,
}

pub struct VideoScreen {
    fixtures: Arc<Fixtures>,
    connect_delay: Duration,
    search: FormField,
    doctors: ListView<usize>,
    pub intake: Form,
    focus: Focus,
    tracker: SubmissionTracker,
}

impl VideoScreen {
    pub fn new(fixtures: Arc<Fixtures>, connect_delay: Duration) -> Self {
        let doctors = ListView::new((0..fixtures.doctors.len()).collect(), "Available Doctors");
        let intake = Form::new(
            &VIDEO_INTAKE_FORM,
            vec![
                FormField::text(fields::PATIENT_NAME, "Patient Name").with_placeholder("Enter patient name"),
                FormField::text(fields::AGE, "Age").with_placeholder("Patient age"),
                FormField::text(fields::SYMPTOMS, "Symptoms").with_placeholder("Describe your symptoms"),
                FormField::text(fields::DURATION, "Duration")
                    .with_placeholder("How long have you had these symptoms?"),
            ],
        );
        let mut screen = Self {
            fixtures,
            connect_delay,
            search: FormField::text("search", "Search doctors").with_placeholder("Name or specialty"),
            doctors,
            intake,
            focus: Focus::Doctors,
            tracker: SubmissionTracker::new(),
        };
        screen.apply_focus();
        screen
    }

    fn apply_focus(&mut self) {
        self.search.set_focus(self.focus == Focus::Doctors);
        let current = self.intake.current_field;
        for (i, field) in self.intake.fields.iter_mut().enumerate() {
            field.set_focus(self.focus == Focus::Intake && i == current);
        }
    }

    fn refresh(&mut self) {
        let found = listing::filter(&self.fixtures.doctors, &Query::text(self.search.value.clone()));
        self.doctors.set_items(listing::positions(&self.fixtures.doctors, &found));
    }

    pub fn selected_doctor(&self) -> Option<&Doctor> {
        self.doctors
            .selected()
            .and_then(|&index| self.fixtures.doctors.get(index))
    }

    fn start_call(&mut self, status: &mut StatusDisplay) {
        let Some(doctor) = self.selected_doctor().cloned() else {
            status.set_warning("No Doctor Selected", "Search for a doctor to start a consultation.");
            return;
        };
        if !actions::can_start_video_consultation(&doctor) {
            status.set_warning(
                "Doctor Busy",
                format!("{} is busy. Next available: {}.", doctor.name, doctor.next_slot),
            );
            return;
        }

        let draft = self.intake.draft();
        let delay = self.connect_delay;
        if let Err(err) = self.tracker.submit(&draft, status, |_, notifier| {
            actions::video_consultation_action(&doctor, notifier, delay)
        }) {
            warn!("video consultation not started: {}", err);
        }
    }

    fn draw_doctors(&mut self, f: &mut Frame, area: Rect) {
        if self.doctors.is_empty() {
            render_empty_state(f, area, "Available Doctors", "No doctors match your search.");
            return;
        }
        let doctors = &self.fixtures.doctors;
        self.doctors
            .set_title(format!("Available Doctors ({}/{})", self.doctors.items.len(), doctors.len()));
        self.doctors.render(f, area, |&index, _| {
            let Some(doctor) = doctors.get(index) else {
                return ListItem::new("");
            };
            let availability = if doctor.is_available() {
                Span::styled("available", Styles::success())
            } else {
                Span::styled("busy", Styles::warning())
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(pad(&doctor.name, 24), Styles::default()),
                    availability,
                ]),
                Line::from(Span::styled(
                    format!(
                        "  {} | ★ {:.1} | {} | Next: {}",
                        doctor.specialty, doctor.rating, doctor.experience, doctor.next_slot
                    ),
                    Styles::inactive(),
                )),
            ])
        });
    }
}

impl Screen for VideoScreen {
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
            "Video Consultation",
            "Connect with qualified doctors from the comfort of your home",
        );

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(body[0]);

        self.search.render(f, left[0]);
        self.draw_doctors(f, left[1]);
        self.intake.render(f, body[1]);

        let call_hint = if self.tracker.is_pending() {
            "Connecting..."
        } else {
            "Enter start video call"
        };
        render_instructions(
            f,
            chunks[2],
            &["Tab switch doctors/intake, type to search, ↑/↓ select", call_hint],
        );
    }

    async fn handle_key_event(&mut self, key: KeyEvent, status: &mut StatusDisplay) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateBack),
            KeyCode::Enter => {
                self.start_call(status);
                return Ok(ScreenAction::None);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Doctors => Focus::Intake,
                    Focus::Intake => Focus::Doctors,
                };
                self.apply_focus();
                return Ok(ScreenAction::None);
            }
            _ => {}
        }

        let action = match self.focus {
            Focus::Doctors => {
                if let Some(action) = CommonKeyHandler::handle_navigation_keys(&mut self.doctors, key) {
                    action
                } else {
                    match key.code {
                        KeyCode::Char(c) => self.search.insert_char(c),
                        KeyCode::Backspace => self.search.delete_char(),
                        KeyCode::Delete => self.search.delete_char_forward(),
                        KeyCode::Left => self.search.move_cursor_left(),
                        KeyCode::Right => self.search.move_cursor_right(),
                        _ => return Ok(ScreenAction::None),
                    }
                    self.refresh();
                    ScreenAction::None
                }
            }
            Focus::Intake => match key.code {
                KeyCode::Up => {
                    self.intake.previous_field();
                    ScreenAction::None
                }
                KeyCode::Down => {
                    self.intake.next_field();
                    ScreenAction::None
                }
                _ => CommonKeyHandler::handle_form_keys(&mut self.intake, key).unwrap_or(ScreenAction::None),
            },
        };
        Ok(action)
    }

    fn help(&self) -> &'static str {
        "Video Consultation:\n\
         Type - Search doctors by name or specialty\n\
         ↑/↓ - Select doctor / intake field\n\
         Tab - Switch between doctors and intake form\n\
         Enter - Start video call with the selected doctor\n\
         Esc - Back\n\n\
         Busy doctors cannot be called until their next slot."
    }

    fn tick(&mut self, status: &mut StatusDisplay) -> ScreenAction {
        self.tracker.poll(status);
        ScreenAction::None
    }
}
