//! Main TUI application state and logic

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::info;

use super::components::StatusDisplay;
use super::handlers::CommonKeyHandler;
use super::screens::*;
use super::traits::{Screen as _, ScreenAction};
use super::ui::{centered_rect, Styles};
use crate::config::Config;
use crate::fixtures::Fixtures;
use crate::geolocation::Locator;
use crate::routes::{Route, Router};

/// How long a notification stays in the status bar
const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(6);

/// Application screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Booking,
    Video,
    Prescriptions,
    Emergency,
    DoctorLogin,
    DoctorDashboard,
    DoctorAppointments,
    DoctorPatients,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Landing => "Patient Portal",
            Screen::Booking => "Book Appointment",
            Screen::Video => "Video Consultation",
            Screen::Prescriptions => "Prescriptions",
            Screen::Emergency => "Emergency Services",
            Screen::DoctorLogin => "Doctor Login",
            Screen::DoctorDashboard => "Doctor Dashboard",
            Screen::DoctorAppointments => "Appointments",
            Screen::DoctorPatients => "Patients",
        }
    }

    /// The route a screen lives under; patient sections share the portal page
    pub fn route(&self) -> Route {
        match self {
            Screen::Landing | Screen::Booking | Screen::Video | Screen::Prescriptions | Screen::Emergency => {
                Route::PatientPortal
            }
            Screen::DoctorLogin => Route::DoctorLogin,
            Screen::DoctorDashboard => Route::DoctorDashboard,
            Screen::DoctorAppointments => Route::DoctorAppointments,
            Screen::DoctorPatients => Route::DoctorPatients,
        }
    }
}

impl From<Route> for Screen {
    fn from(route: Route) -> Self {
        match route {
            Route::PatientPortal => Screen::Landing,
            Route::DoctorLogin => Screen::DoctorLogin,
            Route::DoctorDashboard => Screen::DoctorDashboard,
            Route::DoctorAppointments => Screen::DoctorAppointments,
            Route::DoctorPatients => Screen::DoctorPatients,
        }
    }
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: Screen,
    /// Previous screen for navigation
    pub previous_screen: Option<Screen>,
    /// Application configuration
    pub config: Config,
    /// Notification surface shared by every screen
    pub status: StatusDisplay,

    // Screen states
    pub landing: LandingScreen,
    pub booking: BookingScreen,
    pub video: VideoScreen,
    pub prescriptions: PrescriptionsScreen,
    pub emergency: EmergencyScreen,
    pub login: LoginScreen,
    pub dashboard: DashboardScreen,
    pub appointments: AppointmentsScreen,
    pub patients: PatientsScreen,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
}

impl App {
    /// Create a new TUI application
    pub fn new(config: Config, fixtures: Fixtures, locator: Arc<dyn Locator>) -> Self {
        let fixtures = Arc::new(fixtures);
        Self {
            current_screen: Screen::Landing,
            previous_screen: None,

            landing: LandingScreen::new(),
            booking: BookingScreen::new(fixtures.clone()),
            video: VideoScreen::new(fixtures.clone(), config.video_connect_delay()),
            prescriptions: PrescriptionsScreen::new(fixtures.clone()),
            emergency: EmergencyScreen::new(locator),
            login: LoginScreen::new(config.login_delay()),
            dashboard: DashboardScreen::new(fixtures.clone()),
            appointments: AppointmentsScreen::new(fixtures.clone()),
            patients: PatientsScreen::new(fixtures),

            config,
            status: StatusDisplay::new().with_auto_clear(NOTIFICATION_TIMEOUT),
            should_quit: false,
            show_help_popup: false,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick = self.config.tick();
        info!("TUI started on {}", self.current_screen.route().as_path());

        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key).await?;
                    }
                }
            }

            self.on_tick();

            if self.should_quit {
                break;
            }
        }

        info!("TUI exiting");
        Ok(())
    }

    /// Handle keyboard input events
    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(action) = CommonKeyHandler::handle_global_keys(key) {
            self.apply_action(action);
            return Ok(());
        }

        let menu_screen = matches!(self.current_screen, Screen::Landing | Screen::DoctorDashboard);
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Char('?') if menu_screen => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help_popup {
            if key.code == KeyCode::Esc {
                self.show_help_popup = false;
            }
            return Ok(());
        }

        let status = &mut self.status;
        let action = match self.current_screen {
            Screen::Landing => self.landing.handle_key_event(key, status).await?,
            Screen::Booking => self.booking.handle_key_event(key, status).await?,
            Screen::Video => self.video.handle_key_event(key, status).await?,
            Screen::Prescriptions => self.prescriptions.handle_key_event(key, status).await?,
            Screen::Emergency => self.emergency.handle_key_event(key, status).await?,
            Screen::DoctorLogin => self.login.handle_key_event(key, status).await?,
            Screen::DoctorDashboard => self.dashboard.handle_key_event(key, status).await?,
            Screen::DoctorAppointments => self.appointments.handle_key_event(key, status).await?,
            Screen::DoctorPatients => self.patients.handle_key_event(key, status).await?,
        };
        self.apply_action(action);
        Ok(())
    }

    /// Settle pending submissions on every screen and expire old notifications
    pub fn on_tick(&mut self) {
        let status = &mut self.status;
        let actions = [
            self.landing.tick(status),
            self.booking.tick(status),
            self.video.tick(status),
            self.prescriptions.tick(status),
            self.emergency.tick(status),
            self.login.tick(status),
            self.dashboard.tick(status),
            self.appointments.tick(status),
            self.patients.tick(status),
        ];
        for action in actions {
            self.apply_action(action);
        }

        if self.status.should_auto_clear() {
            self.status.clear();
        }
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen),
            ScreenAction::NavigateBack => {
                let target = self.previous_screen.take().unwrap_or(Screen::Landing);
                self.navigate_to_screen(target);
                self.previous_screen = None;
            }
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::None => {}
        }
    }

    /// Navigate to a specific screen
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        if screen == self.current_screen {
            return;
        }
        info!(
            from = self.current_screen.route().as_path(),
            to = screen.route().as_path(),
            "navigate to {}",
            screen.title()
        );
        self.previous_screen = Some(std::mem::replace(&mut self.current_screen, screen));
        self.show_help_popup = false;
        match self.current_screen {
            Screen::Landing => self.landing.on_enter(),
            Screen::Booking => self.booking.on_enter(),
            Screen::Video => self.video.on_enter(),
            Screen::Prescriptions => self.prescriptions.on_enter(),
            Screen::Emergency => self.emergency.on_enter(),
            Screen::DoctorLogin => self.login.on_enter(),
            Screen::DoctorDashboard => self.dashboard.on_enter(),
            Screen::DoctorAppointments => self.appointments.on_enter(),
            Screen::DoctorPatients => self.patients.on_enter(),
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        match self.current_screen {
            Screen::Landing => self.landing.draw(f, chunks[0]),
            Screen::Booking => self.booking.draw(f, chunks[0]),
            Screen::Video => self.video.draw(f, chunks[0]),
            Screen::Prescriptions => self.prescriptions.draw(f, chunks[0]),
            Screen::Emergency => self.emergency.draw(f, chunks[0]),
            Screen::DoctorLogin => self.login.draw(f, chunks[0]),
            Screen::DoctorDashboard => self.dashboard.draw(f, chunks[0]),
            Screen::DoctorAppointments => self.appointments.draw(f, chunks[0]),
            Screen::DoctorPatients => self.patients.draw(f, chunks[0]),
        }

        let fallback = format!(
            "HealthCare+ - {} ({}) | Esc: Back | Ctrl+Q: Quit | F1: Help",
            self.current_screen.title(),
            self.current_screen.route().as_path()
        );
        self.status.render(f, chunks[1], &fallback);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn screen_help(&self) -> &'static str {
        match self.current_screen {
            Screen::Landing => self.landing.help(),
            Screen::Booking => self.booking.help(),
            Screen::Video => self.video.help(),
            Screen::Prescriptions => self.prescriptions.help(),
            Screen::Emergency => self.emergency.help(),
            Screen::DoctorLogin => self.login.help(),
            Screen::DoctorDashboard => self.dashboard.help(),
            Screen::DoctorAppointments => self.appointments.help(),
            Screen::DoctorPatients => self.patients.help(),
        }
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);

        let help_content = format!(
            "Global Shortcuts:\n\
             Esc - Go back\n\
             Ctrl+C / Ctrl+Q - Quit application\n\
             F1 - Toggle this help\n\n{}",
            self.screen_help()
        );
        let help_popup = Paragraph::new(help_content)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );

        f.render_widget(help_popup, popup_area);
    }
}

impl Router for App {
    fn navigate(&mut self, route: Route) {
        self.navigate_to_screen(route.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{DEMO_EMAIL, DEMO_PASSWORD, EMAIL_FIELD, PASSWORD_FIELD};
    use crate::submission::MISSING_INFORMATION;
    use crate::geolocation::testing::StaticLocator;
    use crate::geolocation::LocationError;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let mut config = Config::default();
        config.delays.login_delay_ms = 1;
        config.delays.video_connect_delay_ms = 1;
        App::new(
            config,
            Fixtures::builtin().unwrap(),
            Arc::new(StaticLocator(Err(LocationError::Unsupported))),
        )
    }

    fn rendered_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 45)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    async fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::from(code)).await.unwrap();
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c)).await;
        }
    }

    #[test]
    fn test_every_screen_renders() {
        let mut app = app();
        for (screen, expected) in [
            (Screen::Landing, "Priority"),
            (Screen::Booking, "Book an Appointment"),
            (Screen::Video, "Dr. Sarah Johnson"),
            (Screen::Prescriptions, "RX001"),
            (Screen::Emergency, "Emergency Services"),
            (Screen::DoctorLogin, "Demo Credentials"),
            (Screen::DoctorDashboard, "Quick Actions"),
            (Screen::DoctorAppointments, "John Smith"),
            (Screen::DoctorPatients, "Mike Davis"),
        ] {
            app.navigate_to_screen(screen.clone());
            let text = rendered_text(&mut app);
            assert!(text.contains(expected), "{:?} did not render {:?}", screen, expected);
        }
    }

    #[test]
    fn test_routes_map_to_screens() {
        let mut app = app();
        app.navigate(Route::DoctorPatients);
        assert_eq!(app.current_screen, Screen::DoctorPatients);
        assert_eq!(Screen::Emergency.route(), Route::PatientPortal);
        assert_eq!(Screen::from(Route::PatientPortal), Screen::Landing);
    }

    #[tokio::test]
    async fn test_back_returns_to_previous_screen() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e')).await;
        assert_eq!(app.current_screen, Screen::Emergency);
        press(&mut app, KeyCode::Esc).await;
        assert_eq!(app.current_screen, Screen::Landing);
    }

    #[tokio::test]
    async fn test_help_popup_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::F(1)).await;
        assert!(app.show_help_popup);
        press(&mut app, KeyCode::Char('e')).await;
        assert_eq!(app.current_screen, Screen::Landing);
        press(&mut app, KeyCode::Esc).await;
        assert!(!app.show_help_popup);
    }

    #[tokio::test]
    async fn test_login_flow_reaches_dashboard_and_logout_returns() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d')).await;
        assert_eq!(app.current_screen, Screen::DoctorLogin);

        type_text(&mut app, DEMO_EMAIL).await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, DEMO_PASSWORD).await;
        press(&mut app, KeyCode::Enter).await;
        assert!(rendered_text(&mut app).contains("Signing In..."));

        tokio::time::sleep(Duration::from_millis(50)).await;
        app.on_tick();
        assert_eq!(app.current_screen, Screen::DoctorDashboard);
        assert_eq!(app.status.get_current().unwrap().title, "Login Successful");

        press(&mut app, KeyCode::Char('l')).await;
        assert_eq!(app.current_screen, Screen::DoctorLogin);
        assert_eq!(app.status.get_current().unwrap().title, "Logged Out");
    }

    #[tokio::test]
    async fn test_logout_leaves_an_empty_login_form() {
        let mut app = app();
        app.navigate(Route::DoctorLogin);
        type_text(&mut app, DEMO_EMAIL).await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, DEMO_PASSWORD).await;
        press(&mut app, KeyCode::Enter).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.on_tick();
        assert_eq!(app.current_screen, Screen::DoctorDashboard);

        press(&mut app, KeyCode::Char('l')).await;
        assert_eq!(app.current_screen, Screen::DoctorLogin);
        assert_eq!(app.login.form.value(EMAIL_FIELD), "");
        assert_eq!(app.login.form.value(PASSWORD_FIELD), "");

        // Enter on the emptied form is rejected instead of signing back in
        press(&mut app, KeyCode::Enter).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.on_tick();
        assert_eq!(app.current_screen, Screen::DoctorLogin);
        assert_eq!(app.status.get_current().unwrap().title, MISSING_INFORMATION);
    }

    #[tokio::test]
    async fn test_ctrl_q_quits_from_a_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('b')).await;
        type_text(&mut app, "q").await;
        assert!(!app.should_quit);
        app.handle_key_event(KeyEvent::new(KeyCode::Char('q'), crossterm::event::KeyModifiers::CONTROL))
            .await
            .unwrap();
        assert!(app.should_quit);
    }
}
