//! Prescription management screen

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::actions;
use crate::fixtures::Fixtures;
use crate::listing;
use crate::models::{Prescription, PrescriptionStatus};
use crate::notification::Notifier;
use crate::portal_tui::{
    components::{FormField, ListView, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{Screen, ScreenAction},
    ui::{pad, render_empty_state, render_header, render_instructions, Styles},
};

pub struct PrescriptionsScreen {
    fixtures: Arc<Fixtures>,
    search: FormField,
    list: ListView<usize>,
}

impl PrescriptionsScreen {
    pub fn new(fixtures: Arc<Fixtures>) -> Self {
        let list = ListView::new((0..fixtures.prescriptions.len()).collect(), "My Prescriptions");
        let mut search = FormField::text("search", "Search prescriptions")
            .with_placeholder("Doctor, diagnosis or medication");
        search.set_focus(true);
        Self {
            fixtures,
            search,
            list,
        }
    }

    fn refresh(&mut self) {
        let found = listing::search(&self.fixtures.prescriptions, &self.search.value);
        self.list
            .set_items(listing::positions(&self.fixtures.prescriptions, &found));
    }

    pub fn selected(&self) -> Option<&Prescription> {
        self.list
            .selected()
            .and_then(|&index| self.fixtures.prescriptions.get(index))
    }

    fn draw_list(&mut self, f: &mut Frame, area: Rect) {
        if self.list.is_empty() {
            render_empty_state(f, area, "My Prescriptions", "No prescriptions found.");
            return;
        }
        let prescriptions = &self.fixtures.prescriptions;
        self.list.render(f, area, |&index, _| {
            let Some(rx) = prescriptions.get(index) else {
                return ListItem::new("");
            };
            let status_style = match rx.status {
                PrescriptionStatus::Active => Styles::success(),
                PrescriptionStatus::Completed => Styles::inactive(),
            };
            ListItem::new(Line::from(vec![
                Span::raw(pad(&rx.id, 7)),
                Span::raw(pad(&rx.date.to_string(), 11)),
                Span::raw(pad(&rx.doctor_name, 20)),
                Span::styled(rx.status.as_str(), status_style),
            ]))
        });
    }

    fn draw_detail(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Prescription Details")
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let Some(rx) = self.selected() else {
            f.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(format!("Prescription #{}", rx.id), Styles::title())),
            Line::from(format!("Prescribed by {} on {}", rx.doctor_name, rx.date)),
            Line::from(vec![
                Span::styled("Diagnosis: ", Styles::info()),
                Span::raw(rx.diagnosis.clone()),
            ]),
            Line::from(""),
            Line::from(Span::styled("Medications", Styles::info())),
        ];
        for med in &rx.medications {
            lines.push(Line::from(format!("• {} {}", med.name, med.dosage)));
            lines.push(Line::from(Span::styled(
                format!("  {} for {}", med.frequency, med.duration),
                Styles::inactive(),
            )));
        }

        let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
        f.render_widget(detail, area);
    }
}

impl Screen for PrescriptionsScreen {
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

        render_header(
            f,
            chunks[0],
            "Digital Prescriptions",
            "Manage your prescriptions and order medicines online",
        );
        self.search.render(f, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[2]);
        self.draw_list(f, body[0]);
        self.draw_detail(f, body[1]);

        render_instructions(
            f,
            chunks[3],
            &["Type to search, ↑/↓ select", "Enter download PDF, Ctrl+O order medicine, Esc back"],
        );
    }

    async fn handle_key_event(&mut self, key: KeyEvent, status: &mut StatusDisplay) -> Result<ScreenAction> {
        if let Some(action) = CommonKeyHandler::handle_navigation_keys(&mut self.list, key) {
            return Ok(action);
        }

        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateBack),
            KeyCode::Enter => {
                if let Some(rx) = self.selected() {
                    let notification = actions::download_prescription(&rx.id);
                    status.notify(notification);
                }
            }
            KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                status.notify(actions::order_medicine());
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
        "Digital Prescriptions:\n\
         Type - Search by doctor, diagnosis or medication\n\
         ↑/↓ - Select prescription\n\
         Enter - Download prescription PDF\n\
         Ctrl+O - Order medicine from the pharmacy\n\
         Esc - Back"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered_text<S: Screen>(screen: &mut S) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                screen.draw(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_medication_search_and_download() {
        let mut screen = PrescriptionsScreen::new(Arc::new(Fixtures::builtin().unwrap()));
        let mut status = StatusDisplay::new();

        for c in "metformin".chars() {
            screen
                .handle_key_event(KeyEvent::from(KeyCode::Char(c)), &mut status)
                .await
                .unwrap();
        }
        assert_eq!(screen.list.items.len(), 1);
        assert_eq!(screen.selected().unwrap().id, "RX002");

        screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter), &mut status)
            .await
            .unwrap();
        let current = status.get_current().unwrap();
        assert_eq!(current.title, "Downloading Prescription");
        assert_eq!(current.message, "Prescription RX002 is being downloaded as PDF.");

        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL), &mut status)
            .await
            .unwrap();
        assert_eq!(status.get_current().unwrap().title, "Redirecting to Pharmacy");
        assert_eq!(screen.search.value, "metformin");
    }

    #[tokio::test]
    async fn test_no_match_renders_empty_state() {
        let mut screen = PrescriptionsScreen::new(Arc::new(Fixtures::builtin().unwrap()));
        let mut status = StatusDisplay::new();
        assert!(!rendered_text(&mut screen).contains("No prescriptions found."));

        for c in "xyz".chars() {
            screen
                .handle_key_event(KeyEvent::from(KeyCode::Char(c)), &mut status)
                .await
                .unwrap();
        }
        assert!(screen.list.is_empty());
        assert!(rendered_text(&mut screen).contains("No prescriptions found."));
    }
}
