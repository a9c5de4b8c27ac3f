//! HTTP DTOs for the webhook endpoints.
//!
//! Response shapes match what the providers expect: payment webhooks are
//! acknowledged with `{"received": true}`, identity webhooks with an empty
//! object, and every error carries `{"success": false, "message": ...}`.

use serde::Serialize;

/// Acknowledgment returned to the payment provider.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    /// Always true on acknowledged deliveries.
    pub received: bool,
}

impl WebhookAck {
    pub fn new() -> Self {
        Self { received: true }
    }
}

impl Default for WebhookAck {
    fn default() -> Self {
        Self::new()
    }
}

/// Acknowledgment returned to the identity provider.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IdentityAck {}

/// Error body for rejected or failed deliveries.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,

    /// Diagnostic message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_serializes_to_received_true() {
        let json = serde_json::to_string(&WebhookAck::new()).unwrap();
        assert_eq!(json, r#"{"received":true}"#);
    }

    #[test]
    fn identity_ack_serializes_to_empty_object() {
        let json = serde_json::to_string(&IdentityAck::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn error_response_serializes_with_message() {
        let json = serde_json::to_string(&ErrorResponse::new("Purchase not found")).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Purchase not found"}"#);
    }
}
