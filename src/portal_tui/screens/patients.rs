//! Doctor patients screen: search, detail panel and notes

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};
use tracing::debug;

use crate::actions::{self, fields, PATIENT_NOTE_FORM};
use crate::fixtures::Fixtures;
use crate::listing;
use crate::models::{Patient, PatientStatus};
use crate::portal_tui::{
    app::Screen as ScreenType,
    components::{Form, FormField, ListView, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{FormHandler, Screen, ScreenAction},
    ui::{pad, render_empty_state, render_header, render_instructions, Styles},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Note,
}

pub struct PatientsScreen {
    fixtures: Arc<Fixtures>,
    search: FormField,
    list: ListView<usize>,
    note: Form,
    focus: Focus,
}

impl PatientsScreen {
    pub fn new(fixtures: Arc<Fixtures>) -> Self {
        let list = ListView::new((0..fixtures.patients.len()).collect(), "Patients");
        let note = Form::new(
            &PATIENT_NOTE_FORM,
            vec![FormField::text(fields::NOTE, "New Note").with_placeholder("Add new note...")],
        );
        let mut screen = Self {
            fixtures,
            search: FormField::text("search", "Search")
                .with_placeholder("Search by patient name or condition..."),
            list,
            note,
            focus: Focus::List,
        };
        screen.apply_focus();
        screen
    }

    fn apply_focus(&mut self) {
        self.search.set_focus(self.focus == Focus::List);
        for field in &mut self.note.fields {
            field.set_focus(self.focus == Focus::Note);
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.apply_focus();
    }

    fn refresh(&mut self) {
        let found = listing::search(&self.fixtures.patients, &self.search.value);
        self.list.set_items(listing::positions(&self.fixtures.patients, &found));
    }

    pub fn selected(&self) -> Option<&Patient> {
        self.list
            .selected()
            .and_then(|&index| self.fixtures.patients.get(index))
    }

    fn save_note(&mut self, status: &mut StatusDisplay) {
        let Some(patient_id) = self.selected().map(|p| p.id.clone()) else {
            return;
        };
        let draft = self.note.draft();
        match actions::add_patient_note(&patient_id, &draft, status) {
            Ok(()) => {
                self.note.clear();
                self.set_focus(Focus::List);
            }
            Err(err) => {
                debug!("note not saved: {}", err);
                self.note.mark_missing(&draft.missing_fields());
            }
        }
    }

    fn draw_list(&mut self, f: &mut Frame, area: Rect) {
        if self.list.is_empty() {
            render_empty_state(f, area, "Patients", "No patients found matching your search criteria.");
            return;
        }
        let patients = &self.fixtures.patients;
        self.list.render(f, area, |&index, _| {
            let Some(p) = patients.get(index) else {
                return ListItem::new("");
            };
            let status_style = match p.status {
                PatientStatus::Active => Styles::success(),
                PatientStatus::Recovering => Styles::warning(),
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(pad(&p.name, 16)),
                    Span::styled(pad(&p.condition, 18), Styles::info()),
                    Span::styled(p.status.as_str(), status_style),
                ]),
                Line::from(Span::styled(
                    format!("  {}, {} | Last visit {} | Next {}", p.age, p.gender, p.last_visit, p.next_appointment),
                    Styles::inactive(),
                )),
            ])
        });
    }

    fn draw_detail(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let block = Block::default()
            .title("Patient Details")
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let lines = match self.selected() {
            Some(p) => {
                let mut lines = vec![
                    Line::from(Span::styled(format!("{} ({})", p.name, p.id), Styles::title())),
                    Line::from(format!("{} | {}", p.phone, p.email)),
                    Line::from(""),
                    Line::from(Span::styled("Medical History", Styles::info())),
                ];
                lines.extend(p.medical_history.iter().map(|h| Line::from(format!("• {}", h))));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Current Medications", Styles::info())));
                lines.extend(p.current_medications.iter().map(|m| Line::from(format!("• {}", m))));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Doctor's Notes", Styles::info())));
                lines.push(Line::from(p.notes.clone()));
                lines
            }
            None => vec![Line::from(Span::styled("Select a patient", Styles::inactive()))],
        };

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), chunks[0]);
        self.note.render(f, chunks[1]);
    }
}

impl Screen for PatientsScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(area);

        render_header(f, chunks[0], "Patient Management", "View and manage your patients");
        self.search.render(f, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        self.draw_list(f, body[0]);
        self.draw_detail(f, body[1]);

        let hints: &[&str] = match self.focus {
            Focus::List => &["Type to search, ↑/↓ select patient", "Enter write a note, Esc back to dashboard"],
            Focus::Note => &["Type the note", "Enter add note, Esc cancel"],
        };
        render_instructions(f, chunks[3], hints);
    }

    async fn handle_key_event(&mut self, key: KeyEvent, status: &mut StatusDisplay) -> Result<ScreenAction> {
        if self.focus == Focus::Note {
            match key.code {
                KeyCode::Esc => self.set_focus(Focus::List),
                KeyCode::Enter => self.save_note(status),
                _ => {
                    CommonKeyHandler::handle_form_keys(&mut self.note, key);
                }
            }
            return Ok(ScreenAction::None);
        }

        if let Some(action) = CommonKeyHandler::handle_navigation_keys(&mut self.list, key) {
            return Ok(action);
        }

        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateTo(ScreenType::DoctorDashboard)),
            KeyCode::Enter => {
                if self.selected().is_some() {
                    self.set_focus(Focus::Note);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert_char(c);
                self.refresh();
            }
            KeyCode::Backspace => {
                self.search.delete_char();
                self.refresh();
            }
            KeyCode::Left => self.search.move_cursor_left(),
            KeyCode::Right => self.search.move_cursor_right(),
            _ => {}
        }
        Ok(ScreenAction::None)
    }

    fn help(&self) -> &'static str {
        "Patients:\n\
         Type - Search by patient name or condition\n\
         ↑/↓ - Select patient\n\
         Enter - Write a note for the selected patient\n\
         Enter (in note) - Add note\n\
         Esc - Cancel note / back to dashboard"
    }
}
