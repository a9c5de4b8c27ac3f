//! Error types for identity webhook processing.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while handling identity-provider webhooks.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// A required webhook header is absent.
    #[error("Missing header: {0}")]
    MissingHeader(&'static str),

    /// Failed to parse the webhook payload or a header value.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Event payload is missing a required field.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl IdentityError {
    /// Maps the error to the HTTP status the identity provider sees.
    pub fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::InvalidSignature
            | IdentityError::TimestampOutOfRange
            | IdentityError::MissingHeader(_)
            | IdentityError::ParseError(_)
            | IdentityError::MissingField(_) => StatusCode::BAD_REQUEST,
            IdentityError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::domain::foundation::DomainError> for IdentityError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        IdentityError::Database(err.to_string())
    }
}
