//! Webhook error taxonomy for payment event processing.
//!
//! Status codes drive the provider's retry behavior: 400 tells it the
//! delivery will never succeed, anything acknowledged with 200 is final.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during payment webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required metadata field missing from the webhook event.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Referenced purchase could not be found.
    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),

    /// Referenced user could not be found.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Referenced course could not be found.
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    /// Attempted to move a purchase between terminal states.
    #[error("Invalid transition for purchase {purchase_id}: {from} -> {to}")]
    InvalidTransition {
        purchase_id: String,
        from: &'static str,
        to: &'static str,
    },

    /// Outbound call to the payment provider failed.
    #[error("Provider call failed: {0}")]
    ProviderCall(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Maps the error to the HTTP status the provider sees.
    ///
    /// - 400: definitive rejection, the provider's own retry schedule applies
    /// - 404: a referenced entity is absent in the direct-lookup path
    /// - 500: unexpected internal failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::MissingMetadata(_) => StatusCode::BAD_REQUEST,

            WebhookError::PurchaseNotFound(_)
            | WebhookError::UserNotFound(_)
            | WebhookError::CourseNotFound(_) => StatusCode::NOT_FOUND,

            WebhookError::InvalidTransition { .. }
            | WebhookError::ProviderCall(_)
            | WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if the error means the request never passed
    /// authentication and no event data may be processed.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
                | WebhookError::InvalidTimestamp
        )
    }
}

impl From<crate::domain::foundation::DomainError> for WebhookError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}
