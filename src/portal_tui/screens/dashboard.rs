//! Doctor dashboard screen

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};

use crate::actions;
use crate::fixtures::Fixtures;
use crate::notification::Notifier;
use crate::portal_tui::{
    app::Screen as ScreenType,
    components::{ListView, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{Screen, ScreenAction},
    ui::{pad, render_header, Styles},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    ManagePatients,
    ScheduleManagement,
    ViewAllAppointments,
    Logout,
}

impl QuickAction {
    const ALL: [QuickAction; 4] = [
        QuickAction::ManagePatients,
        QuickAction::ScheduleManagement,
        QuickAction::ViewAllAppointments,
        QuickAction::Logout,
    ];

    fn label(self) -> &'static str {
        match self {
            QuickAction::ManagePatients => "Manage Patients",
            QuickAction::ScheduleManagement => "Schedule Management",
            QuickAction::ViewAllAppointments => "View All Appointments",
            QuickAction::Logout => "Logout",
        }
    }

    fn shortcut(self) -> char {
        match self {
            QuickAction::ManagePatients => 'p',
            QuickAction::ScheduleManagement => 's',
            QuickAction::ViewAllAppointments => 'a',
            QuickAction::Logout => 'l',
        }
    }
}

pub struct DashboardScreen {
    fixtures: Arc<Fixtures>,
    actions: ListView<QuickAction>,
}

impl DashboardScreen {
    pub fn new(fixtures: Arc<Fixtures>) -> Self {
        Self {
            fixtures,
            actions: ListView::new(QuickAction::ALL.to_vec(), "Quick Actions"),
        }
    }

    fn run(&self, action: QuickAction, status: &mut StatusDisplay) -> ScreenAction {
        match action {
            QuickAction::ManagePatients => ScreenAction::NavigateTo(ScreenType::DoctorPatients),
            QuickAction::ScheduleManagement | QuickAction::ViewAllAppointments => {
                ScreenAction::NavigateTo(ScreenType::DoctorAppointments)
            }
            QuickAction::Logout => {
                let completion = actions::logout();
                status.notify(completion.notification);
                completion
                    .navigate_to
                    .map(|route| ScreenAction::NavigateTo(route.into()))
                    .unwrap_or(ScreenAction::None)
            }
        }
    }

    fn draw_stats(&self, f: &mut Frame, area: Rect) {
        let stats = &self.fixtures.dashboard_stats;
        if stats.is_empty() {
            return;
        }
        let constraints: Vec<Constraint> = stats
            .iter()
            .map(|_| Constraint::Ratio(1, stats.len() as u32))
            .collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (stat, cell) in stats.iter().zip(cells.iter()) {
            let card = Paragraph::new(vec![
                Line::from(Span::styled(stat.value.clone(), Styles::title())),
                Line::from(Span::styled(stat.title.clone(), Styles::inactive())),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border()));
            f.render_widget(card, *cell);
        }
    }

    fn draw_schedule(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .fixtures
            .today_schedule
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(pad(&entry.time, 10), Styles::default().add_modifier(Modifier::BOLD)),
                    Span::raw(pad(&entry.patient, 18)),
                    Span::styled(pad(&entry.visit_type, 14), Styles::inactive()),
                    Span::styled(entry.status.as_str(), Styles::appointment_status(entry.status)),
                ])
            })
            .collect();

        let schedule = Paragraph::new(lines).block(
            Block::default()
                .title("Today's Appointments")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(schedule, area);
    }

    fn draw_activity(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .fixtures
            .recent_activity
            .iter()
            .map(|entry| Line::from(vec![Span::styled("• ", Styles::success()), Span::raw(entry.clone())]))
            .collect();
        let activity = Paragraph::new(lines).block(
            Block::default()
                .title("Recent Activity")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(activity, area);
    }
}

impl Screen for DashboardScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(area);

        render_header(f, chunks[0], "Doctor Dashboard", "Welcome back, Dr. Sarah Johnson");
        self.draw_stats(f, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);
        self.draw_schedule(f, body[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(body[1]);
        self.actions.render(f, side[0], |action, is_selected| {
            let style = match (action, is_selected) {
                (_, true) => Styles::selected(),
                (QuickAction::Logout, false) => Styles::error(),
                _ => Styles::default(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", action.shortcut().to_ascii_uppercase()), Styles::info()),
                Span::styled(action.label(), style),
            ]))
        });
        self.draw_activity(f, side[1]);
    }

    async fn handle_key_event(&mut self, key: KeyEvent, status: &mut StatusDisplay) -> Result<ScreenAction> {
        if let Some(action) = CommonKeyHandler::handle_navigation_keys(&mut self.actions, key) {
            return Ok(action);
        }

        let action = match key.code {
            KeyCode::Enter => match self.actions.selected().copied() {
                Some(action) => self.run(action, status),
                None => ScreenAction::None,
            },
            KeyCode::Char('q') => ScreenAction::Quit,
            KeyCode::Char(c) => match QuickAction::ALL.iter().find(|a| a.shortcut() == c) {
                Some(&action) => self.run(action, status),
                None => ScreenAction::None,
            },
            _ => ScreenAction::None,
        };
        Ok(action)
    }

    fn help(&self) -> &'static str {
        "Doctor Dashboard:\n\
         ↑/↓ - Navigate quick actions\n\
         Enter - Run quick action\n\
         P - Manage patients\n\
         S / A - Appointments\n\
         L - Logout\n\
         q - Quit"
    }
}
