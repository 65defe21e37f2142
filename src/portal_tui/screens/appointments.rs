//! Doctor appointments screen: search, status filter and per-appointment actions

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use tracing::debug;

use crate::actions;
use crate::fixtures::Fixtures;
use crate::listing::{self, Query, StatusFilter};
use crate::models::{Appointment, AppointmentStatus};
use crate::notification::Notifier;
use crate::portal_tui::{
    app::Screen as ScreenType,
    components::{FormField, ListView, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{Screen, ScreenAction},
    ui::{pad, render_empty_state, render_header, render_instructions, Styles},
};

/// `all → upcoming → in-progress → completed → cancelled → all`
pub fn next_status_filter(current: StatusFilter<AppointmentStatus>) -> StatusFilter<AppointmentStatus> {
    let statuses = AppointmentStatus::ALL;
    match current {
        StatusFilter::All => StatusFilter::Only(statuses[0]),
        StatusFilter::Only(status) => statuses
            .iter()
            .position(|s| *s == status)
            .and_then(|i| statuses.get(i + 1))
            .map(|s| StatusFilter::Only(*s))
            .unwrap_or(StatusFilter::All),
    }
}

fn filter_label(filter: StatusFilter<AppointmentStatus>) -> &'static str {
    match filter {
        StatusFilter::All => "All Statuses",
        StatusFilter::Only(AppointmentStatus::Upcoming) => "Upcoming",
        StatusFilter::Only(AppointmentStatus::InProgress) => "In Progress",
        StatusFilter::Only(AppointmentStatus::Completed) => "Completed",
        StatusFilter::Only(AppointmentStatus::Cancelled) => "Cancelled",
    }
}

pub struct AppointmentsScreen {
    fixtures: Arc<Fixtures>,
    search: FormField,
    status_filter: StatusFilter<AppointmentStatus>,
    list: ListView<usize>,
}

impl AppointmentsScreen {
    pub fn new(fixtures: Arc<Fixtures>) -> Self {
        let list = ListView::new((0..fixtures.appointments.len()).collect(), "Appointments");
        let mut search = FormField::text("search", "Search").with_placeholder("Search by patient name or reason...");
        search.set_focus(true);
        Self {
            fixtures,
            search,
            status_filter: StatusFilter::All,
            list,
        }
    }

    pub fn query(&self) -> Query<AppointmentStatus> {
        Query::text(self.search.value.clone()).with_status(self.status_filter)
    }

    fn refresh(&mut self) {
        let found = listing::filter(&self.fixtures.appointments, &self.query());
        self.list
            .set_items(listing::positions(&self.fixtures.appointments, &found));
    }

    pub fn visible(&self) -> Vec<&Appointment> {
        self.list
            .items
            .iter()
            .filter_map(|&index| self.fixtures.appointments.get(index))
            .collect()
    }

    pub fn selected(&self) -> Option<&Appointment> {
        self.list
            .selected()
            .and_then(|&index| self.fixtures.appointments.get(index))
    }

    /// Start an upcoming appointment or complete an in-progress one
    fn act_on_selected(&self, status: &mut StatusDisplay) {
        let Some(appointment) = self.selected() else {
            return;
        };
        let notification = match appointment.status {
            AppointmentStatus::Upcoming => actions::start_consultation(appointment),
            AppointmentStatus::InProgress => actions::complete_appointment(appointment),
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => None,
        };
        match notification {
            Some(notification) => status.notify(notification),
            None => debug!("no action for appointment {} ({})", appointment.id, appointment.status.as_str()),
        }
    }

    fn draw_filter_bar(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(24)])
            .split(area);
        self.search.render(f, chunks[0]);

        let filter = Paragraph::new(filter_label(self.status_filter))
            .style(match self.status_filter {
                StatusFilter::All => Styles::default(),
                StatusFilter::Only(status) => Styles::appointment_status(status),
            })
            .block(
                Block::default()
                    .title("Status (Tab)")
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            );
        f.render_widget(filter, chunks[1]);
    }

    fn draw_list(&mut self, f: &mut Frame, area: Rect) {
        if self.list.is_empty() {
            render_empty_state(f, area, "Appointments", "No appointments found matching your criteria.");
            return;
        }
        self.list.set_title(format!(
            "Appointments ({}/{})",
            self.list.items.len(),
            self.fixtures.appointments.len()
        ));
        let appointments = &self.fixtures.appointments;
        self.list.render(f, area, |&index, _| {
            let Some(a) = appointments.get(index) else {
                return ListItem::new("");
            };
            let action_hint = match a.status {
                AppointmentStatus::Upcoming => "Enter: start",
                AppointmentStatus::InProgress => "Enter: complete",
                _ => "",
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(pad(&a.time, 10)),
                    Span::raw(pad(&a.patient, 16)),
                    Span::styled(pad(a.status.as_str(), 13), Styles::appointment_status(a.status)),
                    Span::styled(pad(a.kind.as_str(), 11), Styles::info()),
                    Span::styled(action_hint, Styles::inactive()),
                ]),
                Line::from(Span::styled(
                    format!("  {} | Age {} | {} | {}", a.date, a.age, a.phone, a.reason),
                    Styles::inactive(),
                )),
            ])
        });
    }
}

impl Screen for AppointmentsScreen {
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

        render_header(f, chunks[0], "Appointments", "Manage your patient appointments");
        self.draw_filter_bar(f, chunks[1]);
        self.draw_list(f, chunks[2]);
        render_instructions(
            f,
            chunks[3],
            &["Type to search, Tab cycle status filter, ↑/↓ select", "Enter start/complete, Esc back to dashboard"],
        );
    }

    async fn handle_key_event(&mut self, key: KeyEvent, status: &mut StatusDisplay) -> Result<ScreenAction> {
        if let Some(action) = CommonKeyHandler::handle_navigation_keys(&mut self.list, key) {
            return Ok(action);
        }

        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateTo(ScreenType::DoctorDashboard)),
            KeyCode::Enter => self.act_on_selected(status),
            KeyCode::Tab => {
                self.status_filter = next_status_filter(self.status_filter);
                self.refresh();
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
        "Appointments:\n\
         Type - Search by patient name or reason\n\
         Tab - Cycle status filter\n\
         ↑/↓ - Select appointment\n\
         Enter - Start upcoming / complete in-progress\n\
         Esc - Back to dashboard"
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

    fn screen() -> AppointmentsScreen {
        AppointmentsScreen::new(Arc::new(Fixtures::builtin().unwrap()))
    }

    #[test]
    fn test_filter_cycle_returns_to_all() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..5 {
            filter = next_status_filter(filter);
            seen.push(filter_label(filter));
        }
        assert_eq!(
            seen,
            vec!["Upcoming", "In Progress", "Completed", "Cancelled", "All Statuses"]
        );
    }

    #[tokio::test]
    async fn test_tab_filters_by_status() {
        let mut screen = screen();
        let mut status = StatusDisplay::new();

        screen.handle_key_event(KeyEvent::from(KeyCode::Tab), &mut status).await.unwrap();
        let ids: Vec<&str> = screen.visible().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["APT001", "APT004", "APT005"]);

        for c in "blood".chars() {
            screen
                .handle_key_event(KeyEvent::from(KeyCode::Char(c)), &mut status)
                .await
                .unwrap();
        }
        let ids: Vec<&str> = screen.visible().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["APT005"]);
    }

    #[tokio::test]
    async fn test_enter_starts_or_completes() {
        let mut screen = screen();
        let mut status = StatusDisplay::new();

        screen.handle_key_event(KeyEvent::from(KeyCode::Enter), &mut status).await.unwrap();
        assert_eq!(status.get_current().unwrap().title, "Patient Ready");

        // APT002 is completed: nothing to do
        screen.handle_key_event(KeyEvent::from(KeyCode::Down), &mut status).await.unwrap();
        screen.handle_key_event(KeyEvent::from(KeyCode::Enter), &mut status).await.unwrap();
        assert_eq!(status.history().count(), 1);

        screen.handle_key_event(KeyEvent::from(KeyCode::Down), &mut status).await.unwrap();
        screen.handle_key_event(KeyEvent::from(KeyCode::Enter), &mut status).await.unwrap();
        let current = status.get_current().unwrap();
        assert_eq!(current.title, "Status Updated");
        assert_eq!(current.message, "Appointment APT003 status changed to completed.");
    }

    #[tokio::test]
    async fn test_no_match_renders_empty_state() {
        let mut screen = screen();
        let mut status = StatusDisplay::new();
        assert!(rendered_text(&mut screen).contains("John Smith"));

        for c in "xyz".chars() {
            screen
                .handle_key_event(KeyEvent::from(KeyCode::Char(c)), &mut status)
                .await
                .unwrap();
        }
        assert!(screen.visible().is_empty());
        assert!(rendered_text(&mut screen).contains("No appointments found matching your criteria."));
    }
}
