//! Patient portal landing screen

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::portal_tui::{
    app::Screen as ScreenType,
    components::{ListView, StatusDisplay},
    handlers::CommonKeyHandler,
    traits::{Screen, ScreenAction},
    ui::{render_instructions, Styles},
};

/// Landing menu entry
#[derive(Debug, Clone)]
pub struct MenuOption {
    pub title: &'static str,
    pub description: &'static str,
    pub shortcut: char,
    pub screen: ScreenType,
}

impl MenuOption {
    const fn new(title: &'static str, description: &'static str, shortcut: char, screen: ScreenType) -> Self {
        Self {
            title,
            description,
            shortcut,
            screen,
        }
    }
}

pub struct LandingScreen {
    menu: ListView<MenuOption>,
}

impl Default for LandingScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LandingScreen {
    pub fn new() -> Self {
        let options = vec![
            MenuOption::new("Book Appointments", "Schedule with top doctors", 'b', ScreenType::Booking),
            MenuOption::new("Video Consultation", "Connect instantly online", 'v', ScreenType::Video),
            MenuOption::new("Digital Prescriptions", "Get medicines delivered", 'p', ScreenType::Prescriptions),
            MenuOption::new("Emergency Services", "24/7 ambulance booking", 'e', ScreenType::Emergency),
            MenuOption::new("Doctor Portal", "Sign in to manage patients and appointments", 'd', ScreenType::DoctorLogin),
        ];
        Self {
            menu: ListView::new(options, "Services"),
        }
    }

    fn draw_hero(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("HealthCare+", Styles::title()),
                Span::raw("  "),
                Span::styled("Emergency: 911", Styles::emergency()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Your Health, Our ", Styles::default().add_modifier(Modifier::BOLD)),
                Span::styled("Priority", Styles::title()),
            ]),
            Line::from(Span::styled(
                "Book appointments, connect with doctors via video calls, get prescriptions, \
                 and access emergency services - all in one platform.",
                Styles::inactive(),
            )),
        ];
        let hero = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(hero, area);
    }
}

impl Screen for LandingScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(area);

        self.draw_hero(f, chunks[0]);

        self.menu.render(f, chunks[1], |option, is_selected| {
            let style = if is_selected {
                Styles::selected()
            } else {
                Styles::default()
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("[{}] ", option.shortcut.to_ascii_uppercase()), Styles::info()),
                    Span::styled(option.title, style.add_modifier(Modifier::BOLD)),
                ]),
                Line::from(Span::styled(format!("     {}", option.description), Styles::inactive())),
            ])
        });

        render_instructions(
            f,
            chunks[2],
            &["↑/↓ move, Enter open, letter shortcuts jump directly", "q quit, F1 help"],
        );
    }

    async fn handle_key_event(&mut self, key: KeyEvent, _status: &mut StatusDisplay) -> Result<ScreenAction> {
        if let Some(action) = CommonKeyHandler::handle_navigation_keys(&mut self.menu, key) {
            return Ok(action);
        }

        let action = match key.code {
            KeyCode::Enter => self
                .menu
                .selected()
                .map(|option| ScreenAction::NavigateTo(option.screen.clone()))
                .unwrap_or(ScreenAction::None),
            KeyCode::Char('q') => ScreenAction::Quit,
            KeyCode::Char(c) => self
                .menu
                .items
                .iter()
                .find(|option| option.shortcut == c.to_ascii_lowercase())
                .map(|option| ScreenAction::NavigateTo(option.screen.clone()))
                .unwrap_or(ScreenAction::None),
            _ => ScreenAction::None,
        };
        Ok(action)
    }

    fn help(&self) -> &'static str {
        "Patient Portal:\n\
         ↑/↓ - Navigate services\n\
         Enter - Open service\n\
         B - Book appointment\n\
         V - Video consultation\n\
         P - Prescriptions\n\
         E - Emergency services\n\
         D - Doctor portal\n\
         q - Quit"
    }
}
