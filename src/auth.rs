//! Doctor portal login
//!
//! Login is a guarded submission whose downstream action is a simulated round
//! trip comparing the submitted pair against the demo credentials.

use std::time::Duration;

use tracing::{info, warn};

use crate::errors::PortalError;
use crate::notification::{Notification, Notifier};
use crate::routes::Route;
use crate::submission::{self, simulate_round_trip, Completion, FormDefinition, FormDraft, Outcome};

pub const DEMO_EMAIL: &str = "doctor@healthcare.com";
pub const DEMO_PASSWORD: &str = "doctor123";

pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_FIELD: &str = "password";

pub static LOGIN_FORM: FormDefinition = FormDefinition {
    name: "doctor-login",
    required: &[EMAIL_FIELD, PASSWORD_FIELD],
    instruction: "Please fill in all fields.",
};

/// Case-sensitive exact comparison against the demo pair
pub fn check_credentials(email: &str, password: &str) -> Result<(), PortalError> {
    if email == DEMO_EMAIL && password == DEMO_PASSWORD {
        Ok(())
    } else {
        Err(PortalError::InvalidCredentials {
            email: email.to_string(),
        })
    }
}

/// Notification and navigation produced once the credentials have been checked
pub fn login_completion(email: &str, password: &str) -> Completion {
    match check_credentials(email, password) {
        Ok(()) => {
            info!("doctor login succeeded");
            Completion::notify(Notification::new("Login Successful", "Welcome back, Doctor!"))
                .and_navigate(Route::DoctorDashboard)
        }
        Err(err) => {
            warn!("doctor login failed: {}", err);
            Completion::notify(
                Notification::new("Invalid Credentials", "Please check your email and password.")
                    .destructive(),
            )
        }
    }
}

/// Submit the login form; the credential check settles after `delay`
pub fn login<N>(draft: &FormDraft, notifier: &mut N, delay: Duration) -> Result<Outcome, PortalError>
where
    N: Notifier + ?Sized,
{
    submission::submit(draft, notifier, |draft, _| login_action(draft, delay))
}

/// Downstream action of the login form, for callers that track submissions themselves
pub fn login_action(draft: &FormDraft, delay: Duration) -> Outcome {
    let email = draft.value(EMAIL_FIELD).to_string();
    let password = draft.value(PASSWORD_FIELD).to_string();
    Outcome::Pending(simulate_round_trip("login", delay, move || {
        login_completion(&email, &password)
    }))
}

/// Build a login draft from raw field values
pub fn login_draft(email: &str, password: &str) -> FormDraft {
    FormDraft::new(&LOGIN_FORM)
        .with_value(EMAIL_FIELD, email)
        .with_value(PASSWORD_FIELD, password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::MISSING_INFORMATION;

    const FAST: Duration = Duration::from_millis(1);

    async fn run_login(email: &str, password: &str) -> (Vec<Notification>, Option<Completion>) {
        let mut notes = Vec::new();
        let completion = match login(&login_draft(email, password), &mut notes, FAST) {
            Ok(Outcome::Pending(pending)) => Some(pending.settle().await.unwrap()),
            Ok(Outcome::Immediate) => panic!("login always settles asynchronously"),
            Err(_) => None,
        };
        (notes, completion)
    }

    #[tokio::test]
    async fn test_demo_credentials_navigate_to_dashboard() {
        let (notes, completion) = run_login(DEMO_EMAIL, DEMO_PASSWORD).await;
        let completion = completion.unwrap();
        assert!(notes.is_empty());
        assert_eq!(completion.notification.title, "Login Successful");
        assert_eq!(completion.notification.description, "Welcome back, Doctor!");
        assert_eq!(completion.navigate_to, Some(Route::DoctorDashboard));
    }

    #[tokio::test]
    async fn test_other_pairs_fail_without_navigation() {
        for (email, password) in [
            ("Doctor@healthcare.com", DEMO_PASSWORD),
            (DEMO_EMAIL, "Doctor123"),
            (DEMO_EMAIL, "doctor123 "),
            ("nurse@healthcare.com", "nurse"),
        ] {
            let (_, completion) = run_login(email, password).await;
            let completion = completion.unwrap();
            assert_eq!(completion.notification.title, "Invalid Credentials");
            assert!(completion.notification.destructive);
            assert_eq!(completion.navigate_to, None);
        }
    }

    #[tokio::test]
    async fn test_blank_field_is_rejected_before_the_round_trip() {
        let (notes, completion) = run_login(DEMO_EMAIL, "  ").await;
        assert!(completion.is_none());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, MISSING_INFORMATION);
        assert_eq!(notes[0].description, "Please fill in all fields.");
    }

    #[test]
    fn test_check_credentials_is_exact() {
        assert!(check_credentials(DEMO_EMAIL, DEMO_PASSWORD).is_ok());
        assert!(matches!(
            check_credentials("DOCTOR@HEALTHCARE.COM", DEMO_PASSWORD),
            Err(PortalError::InvalidCredentials { .. })
        ));
    }
}
