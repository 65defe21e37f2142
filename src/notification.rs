//! Notifications emitted by portal actions
//!
//! The core only decides whether a notification is emitted and what it says.
//! Rendering belongs to whichever [`Notifier`] the caller hands in.

use serde::Serialize;

/// A user-visible message with a title, a description and a severity flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: false,
        }
    }

    /// Mark the notification as destructive (errors, rejections)
    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Collaborator that surfaces notifications to the user
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_title_and_description() {
        let n = Notification::new("Note Added", "Note added to patient P001 record.");
        assert_eq!(n.to_string(), "Note Added: Note added to patient P001 record.");
        assert!(!n.destructive);
        assert!(n.destructive().destructive);
    }
}
