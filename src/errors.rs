//! Portal error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Invalid credentials for '{email}'")]
    InvalidCredentials { email: String },

    #[error("Unknown status '{value}'. Expected one of: {expected}")]
    UnknownStatus { value: String, expected: String },

    #[error("A '{0}' submission is already pending")]
    SubmissionPending(String),

    #[error("Simulated action '{0}' ended without a result")]
    ActionDropped(String),

    #[error("Unknown route '{0}'")]
    UnknownRoute(String),

    #[error("Failed to parse fixture document: {0}")]
    Fixtures(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_every_field() {
        let err = PortalError::MissingFields {
            fields: vec!["email".to_string(), "password".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required fields: email, password");
    }
}
