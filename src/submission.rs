//! Guarded form submission
//!
//! A submission validates a [`FormDraft`] against the required fields of its
//! [`FormDefinition`] before the downstream action may run. Rejected drafts
//! produce exactly one "Missing Information" notification and never reach the
//! action. Accepted drafts run the action once; the action either settles
//! immediately or hands back a [`PendingAction`] that settles after a
//! simulated round trip.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::PortalError;
use crate::notification::{Notification, Notifier};
use crate::routes::Route;

pub const MISSING_INFORMATION: &str = "Missing Information";

/// Static description of a form: its name, required fields and the text shown
/// when a required field is left empty
#[derive(Debug, PartialEq, Eq)]
pub struct FormDefinition {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub instruction: &'static str,
}

/// Current values of a form, rebuilt by the caller after every edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    definition: &'static FormDefinition,
    values: BTreeMap<String, String>,
}

impl FormDraft {
    pub fn new(definition: &'static FormDefinition) -> Self {
        Self {
            definition,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, field: &str, value: impl Into<String>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self
    }

    pub fn definition(&self) -> &'static FormDefinition {
        self.definition
    }

    /// Value of `field`, empty when never set
    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Required fields whose trimmed value is empty, in definition order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.definition
            .required
            .iter()
            .copied()
            .filter(|field| self.value(field).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Check every required field, without side effects
pub fn validate(draft: &FormDraft) -> Result<(), PortalError> {
    let missing = draft.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PortalError::MissingFields {
            fields: missing.into_iter().map(str::to_string).collect(),
        })
    }
}

/// What a settled action reports back: a notification and, optionally, a
/// navigation target for the router
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub notification: Notification,
    pub navigate_to: Option<Route>,
}

impl Completion {
    pub fn notify(notification: Notification) -> Self {
        Self {
            notification,
            navigate_to: None,
        }
    }

    pub fn and_navigate(mut self, route: Route) -> Self {
        self.navigate_to = Some(route);
        self
    }
}

/// Result of running the downstream action
#[derive(Debug)]
pub enum Outcome {
    /// The action finished synchronously and already notified
    Immediate,
    /// The action completes later through a simulated round trip
    Pending(PendingAction),
}

/// A simulated asynchronous action and the channel its result arrives on
#[derive(Debug)]
pub struct PendingAction {
    id: Uuid,
    label: &'static str,
    receiver: oneshot::Receiver<Completion>,
    handle: JoinHandle<()>,
}

impl PendingAction {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Non-blocking check for the result
    pub fn try_settle(&mut self) -> Option<Completion> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the result
    pub async fn settle(self) -> Result<Completion, PortalError> {
        let completion = self
            .receiver
            .await
            .map_err(|_| PortalError::ActionDropped(self.label.to_string()))?;
        // The task has already sent; joining only reaps it
        let _ = self.handle.await;
        Ok(completion)
    }
}

/// Spawn a task that waits `delay` and then reports `complete()`.
///
/// Must be called from within a tokio runtime. The simulated call always
/// succeeds; there is no timeout or cancellation.
pub fn simulate_round_trip<F>(label: &'static str, delay: Duration, complete: F) -> PendingAction
where
    F: FnOnce() -> Completion + Send + 'static,
{
    let id = Uuid::new_v4();
    let (sender, receiver) = oneshot::channel();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let completion = complete();
        info!(%id, action = label, "simulated action settled: {}", completion.notification.title);
        let _ = sender.send(completion);
    });
    info!(%id, action = label, delay_ms = delay.as_millis() as u64, "simulated action started");

    PendingAction {
        id,
        label,
        receiver,
        handle,
    }
}

/// Validate `draft` and, only if every required field is filled, run `action` once.
///
/// On rejection a single destructive "Missing Information" notification is
/// emitted and the missing fields are returned as an error.
pub fn submit<N, A>(draft: &FormDraft, notifier: &mut N, action: A) -> Result<Outcome, PortalError>
where
    N: Notifier + ?Sized,
    A: FnOnce(&FormDraft, &mut N) -> Outcome,
{
    let definition = draft.definition();
    if let Err(err) = validate(draft) {
        warn!(form = definition.name, "submission rejected: {}", err);
        notifier.notify(Notification::new(MISSING_INFORMATION, definition.instruction).destructive());
        return Err(err);
    }

    info!(form = definition.name, "submission accepted");
    Ok(action(draft, notifier))
}

/// Lifecycle of one submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Rejected,
    Pending,
    Settled,
}

/// Per-form submission state owned by a screen
#[derive(Debug)]
pub struct SubmissionTracker {
    state: SubmissionState,
    pending: Option<PendingAction>,
}

impl Default for SubmissionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SubmissionState::Pending
    }

    /// Run a guarded submission and track where it ends up.
    ///
    /// A second submission while one is pending is refused.
    pub fn submit<N, A>(&mut self, draft: &FormDraft, notifier: &mut N, action: A) -> Result<(), PortalError>
    where
        N: Notifier + ?Sized,
        A: FnOnce(&FormDraft, &mut N) -> Outcome,
    {
        if self.is_pending() {
            return Err(PortalError::SubmissionPending(draft.definition().name.to_string()));
        }

        self.state = SubmissionState::Validating;
        match submit(draft, notifier, action) {
            Ok(Outcome::Immediate) => {
                self.state = SubmissionState::Settled;
                Ok(())
            }
            Ok(Outcome::Pending(pending)) => {
                self.pending = Some(pending);
                self.state = SubmissionState::Pending;
                Ok(())
            }
            Err(err) => {
                self.state = SubmissionState::Rejected;
                Err(err)
            }
        }
    }

    /// Deliver the pending result, if it has arrived, and return its navigation target
    pub fn poll<N: Notifier + ?Sized>(&mut self, notifier: &mut N) -> Option<Route> {
        let completion = self.pending.as_mut()?.try_settle()?;
        self.pending = None;
        self.state = SubmissionState::Settled;
        notifier.notify(completion.notification);
        completion.navigate_to
    }

    /// Forget a finished attempt so the form reads as idle again
    pub fn reset(&mut self) {
        if !self.is_pending() {
            self.state = SubmissionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CONTACT_FORM: FormDefinition = FormDefinition {
        name: "contact",
        required: &["name", "phone"],
        instruction: "Please fill in all required fields.",
    };

    fn filled() -> FormDraft {
        FormDraft::new(&CONTACT_FORM)
            .with_value("name", "Emily Wilson")
            .with_value("phone", "+1-555-0126")
    }

    #[test]
    fn test_whitespace_only_required_field_is_missing() {
        let draft = filled().with_value("phone", "   \t");
        assert_eq!(draft.missing_fields(), vec!["phone"]);
        assert!(!draft.is_complete());
    }

    #[test]
    fn test_optional_fields_are_not_validated() {
        let draft = filled().with_value("details", "");
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_rejected_submission_never_runs_action() {
        let mut notes: Vec<Notification> = Vec::new();
        let mut calls = 0;
        let draft = FormDraft::new(&CONTACT_FORM).with_value("name", "Emily Wilson");

        let result = submit(&draft, &mut notes, |_, _| {
            calls += 1;
            Outcome::Immediate
        });

        assert!(matches!(result, Err(PortalError::MissingFields { ref fields }) if fields == &["phone"]));
        assert_eq!(calls, 0);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, MISSING_INFORMATION);
        assert_eq!(notes[0].description, "Please fill in all required fields.");
        assert!(notes[0].destructive);
    }

    #[test]
    fn test_accepted_submission_runs_action_once() {
        let mut notes: Vec<Notification> = Vec::new();
        let mut calls = 0;

        let result = submit(&filled(), &mut notes, |draft, notifier| {
            calls += 1;
            notifier.notify(Notification::new("Saved", draft.value("name")));
            Outcome::Immediate
        });

        assert!(matches!(result, Ok(Outcome::Immediate)));
        assert_eq!(calls, 1);
        assert_eq!(notes, vec![Notification::new("Saved", "Emily Wilson")]);
    }

    #[test]
    fn test_with_value_leaves_original_draft_untouched() {
        let before = FormDraft::new(&CONTACT_FORM);
        let after = before.clone().with_value("name", "Mike Davis");
        assert_eq!(before.value("name"), "");
        assert_eq!(after.value("name"), "Mike Davis");
    }

    #[tokio::test]
    async fn test_simulated_round_trip_settles_after_delay() {
        let pending = simulate_round_trip("ping", Duration::from_millis(5), || {
            Completion::notify(Notification::new("Pong", "done")).and_navigate(Route::DoctorDashboard)
        });
        assert_eq!(pending.label(), "ping");

        let completion = pending.settle().await.unwrap();
        assert_eq!(completion.notification.title, "Pong");
        assert_eq!(completion.navigate_to, Some(Route::DoctorDashboard));
    }

    #[tokio::test]
    async fn test_tracker_moves_through_pending_to_settled() {
        let mut notes: Vec<Notification> = Vec::new();
        let mut tracker = SubmissionTracker::new();
        assert_eq!(tracker.state(), SubmissionState::Idle);

        tracker
            .submit(&filled(), &mut notes, |_, _| {
                Outcome::Pending(simulate_round_trip("contact", Duration::from_millis(5), || {
                    Completion::notify(Notification::new("Sent", "ok"))
                }))
            })
            .unwrap();
        assert_eq!(tracker.state(), SubmissionState::Pending);

        let again = tracker.submit(&filled(), &mut notes, |_, _| Outcome::Immediate);
        assert!(matches!(again, Err(PortalError::SubmissionPending(_))));

        let mut navigated = None;
        for _ in 0..200 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            navigated = tracker.poll(&mut notes);
            if tracker.state() == SubmissionState::Settled {
                break;
            }
        }

        assert_eq!(tracker.state(), SubmissionState::Settled);
        assert_eq!(navigated, None);
        assert_eq!(notes, vec![Notification::new("Sent", "ok")]);
    }

    #[test]
    fn test_tracker_records_rejection_and_allows_retry() {
        let mut notes: Vec<Notification> = Vec::new();
        let mut tracker = SubmissionTracker::new();

        let empty = FormDraft::new(&CONTACT_FORM);
        assert!(tracker.submit(&empty, &mut notes, |_, _| Outcome::Immediate).is_err());
        assert_eq!(tracker.state(), SubmissionState::Rejected);

        tracker.submit(&filled(), &mut notes, |_, _| Outcome::Immediate).unwrap();
        assert_eq!(tracker.state(), SubmissionState::Settled);

        tracker.reset();
        assert_eq!(tracker.state(), SubmissionState::Idle);
    }
}
