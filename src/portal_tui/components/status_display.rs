//! Status display component: the TUI's notification surface

use std::time::Duration;

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::notification::{Notification, Notifier};
use crate::portal_tui::ui::Styles;

/// Types of status messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

impl StatusType {
    fn style(self) -> Style {
        match self {
            StatusType::Info => Styles::info(),
            StatusType::Success => Styles::success(),
            StatusType::Warning | StatusType::Loading => Styles::warning(),
            StatusType::Error => Styles::error(),
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            StatusType::Info => "ℹ",
            StatusType::Success => "✓",
            StatusType::Warning => "⚠",
            StatusType::Error => "✗",
            StatusType::Loading => "⟳",
        }
    }
}

/// Status message with type and content
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub title: String,
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: DateTime<Local>,
}

impl StatusMessage {
    pub fn new(title: impl Into<String>, message: impl Into<String>, status_type: StatusType) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            status_type,
            timestamp: Local::now(),
        }
    }
}

impl From<Notification> for StatusMessage {
    fn from(notification: Notification) -> Self {
        let status_type = if notification.destructive {
            StatusType::Error
        } else {
            StatusType::Success
        };
        Self::new(notification.title, notification.description, status_type)
    }
}

/// Status display component
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub message_history: Vec<StatusMessage>,
    pub max_history: usize,
    pub auto_clear_timeout: Option<Duration>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 50,
            auto_clear_timeout: None,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_clear(mut self, timeout: Duration) -> Self {
        self.auto_clear_timeout = Some(timeout);
        self
    }

    /// Set current status message
    pub fn set_message(&mut self, message: StatusMessage) {
        self.archive_current();
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, title: &str, message: impl Into<String>) {
        self.set_message(StatusMessage::new(title, message, StatusType::Info));
    }

    pub fn set_warning(&mut self, title: &str, message: impl Into<String>) {
        self.set_message(StatusMessage::new(title, message, StatusType::Warning));
    }

    pub fn set_loading(&mut self, title: &str, message: impl Into<String>) {
        self.set_message(StatusMessage::new(title, message, StatusType::Loading));
    }

    /// Clear current message
    pub fn clear(&mut self) {
        self.archive_current();
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    /// Every message shown so far, oldest first, current last
    pub fn history(&self) -> impl Iterator<Item = &StatusMessage> {
        self.message_history.iter().chain(self.current_message.iter())
    }

    /// Check if we should auto-clear the current message
    pub fn should_auto_clear(&self) -> bool {
        match (self.auto_clear_timeout, &self.current_message) {
            (Some(timeout), Some(message)) => {
                let elapsed = Local::now().signed_duration_since(message.timestamp);
                elapsed.to_std().unwrap_or_default() > timeout
            }
            _ => false,
        }
    }

    /// Render the status display
    pub fn render(&self, f: &mut Frame, area: Rect, fallback: &str) {
        let (line, style) = match &self.current_message {
            Some(message) => (
                Line::from(vec![
                    Span::styled(
                        format!("{} {}", message.status_type.prefix(), message.title),
                        message.status_type.style(),
                    ),
                    Span::raw("  "),
                    Span::raw(message.message.clone()),
                ]),
                message.status_type.style(),
            ),
            None => (Line::from(fallback.to_string()), Styles::inactive()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let paragraph = Paragraph::new(line)
            .style(style)
            .wrap(Wrap { trim: true })
            .block(block);

        f.render_widget(paragraph, area);
    }
}

impl Notifier for StatusDisplay {
    fn notify(&mut self, notification: Notification) {
        tracing::debug!(destructive = notification.destructive, "notification: {}", notification);
        self.set_message(notification.into());
    }
}
