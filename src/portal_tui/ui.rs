//! Common UI styles and layout helpers for the portal TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::AppointmentStatus;

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default()
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn emergency() -> Style {
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Color::Green)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(Color::Yellow)
    }

    pub fn info() -> Style {
        Style::default()
            .fg(Color::Cyan)
    }

    pub fn inactive() -> Style {
        Style::default()
            .fg(Color::Gray)
    }

    pub fn active_border() -> Style {
        Style::default()
            .fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default()
            .fg(Color::Gray)
    }

    /// Badge colour for an appointment status
    pub fn appointment_status(status: AppointmentStatus) -> Style {
        match status {
            AppointmentStatus::Completed => Self::success(),
            AppointmentStatus::InProgress => Style::default().fg(Color::LightRed),
            AppointmentStatus::Upcoming => Self::info(),
            AppointmentStatus::Cancelled => Self::inactive(),
        }
    }
}

/// Bordered screen header with a subtitle line
pub fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let lines = vec![
        Line::from(Span::styled(title.to_string(), Styles::title())),
        Line::from(Span::styled(subtitle.to_string(), Styles::inactive())),
    ];
    let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

/// Bordered block of key hints
pub fn render_instructions(f: &mut Frame, area: Rect, lines: &[&str]) {
    let text: Vec<Line> = lines.iter().map(|l| Line::from(l.to_string())).collect();
    let widget = Paragraph::new(text)
        .style(Styles::info())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Keys")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
    f.render_widget(widget, area);
}

/// Centered message used when a filtered list is empty
pub fn render_empty_state(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let widget = Paragraph::new(message.to_string())
        .style(Styles::inactive())
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Styles::active_border()),
        );
    f.render_widget(widget, area);
}

/// Center a rectangle within another rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate to a display width, adding an ellipsis when shortened
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Pad to a display width so table columns line up
pub fn pad(text: &str, width: usize) -> String {
    let truncated = truncate(text, width);
    let fill = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate("Mike Davis", 20), "Mike Davis");
        assert_eq!(truncate("Upper Respiratory Infection", 10), "Upper Res…");
        assert_eq!(truncate("Upper Respiratory Infection", 10).width(), 10);
    }

    #[test]
    fn test_pad_fills_to_width() {
        assert_eq!(pad("APT001", 8), "APT001  ");
        assert_eq!(pad("Skin condition check", 8).width(), 8);
    }
}
