//! Stripe webhook event types.
//!
//! Only the fields the reconciliation flow reads are captured; the rest of
//! Stripe's event schema is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_str(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}

/// Stripe event types the reconciliation flow recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripeEventType {
    /// Checkout session completed successfully.
    CheckoutSessionCompleted,
    /// Payment intent failed.
    PaymentIntentFailed,
    /// Unknown or unhandled event type.
    Unknown(String),
}

impl StripeEventType {
    /// Parse event type from the wire string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "payment_intent.payment_failed" => Self::PaymentIntentFailed,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Checkout session object as it arrives in a completion event, and as
/// returned from the session-listing API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutSessionPayload {
    /// Session identifier (cs_...).
    pub id: String,

    /// Payment intent backing this session, if any.
    #[serde(default)]
    pub payment_intent: Option<String>,

    /// Custom metadata attached at checkout initiation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSessionPayload {
    /// The purchase reference attached at checkout initiation, if present.
    pub fn purchase_id(&self) -> Option<&str> {
        self.metadata.get("purchaseId").map(String::as_str)
    }
}

/// Payment intent object as it arrives in a failure event.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentIntentPayload {
    /// Intent identifier (pi_...).
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": {
                "object": {}
            },
            "livemode": false,
            "api_version": "2023-10-16"
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.created, 1704067200);
        assert!(!event.livemode);
    }

    #[test]
    fn event_without_optional_fields_parses() {
        let json = r#"{
            "id": "evt_min",
            "type": "payment_intent.payment_failed",
            "created": 1704067200,
            "data": { "object": {"id": "pi_1"} }
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert!(event.api_version.is_none());
        assert_eq!(event.parsed_type(), StripeEventType::PaymentIntentFailed);
    }

    #[test]
    fn parsed_type_recognizes_completion() {
        assert_eq!(
            StripeEventType::from_str("checkout.session.completed"),
            StripeEventType::CheckoutSessionCompleted
        );
    }

    #[test]
    fn parsed_type_recognizes_failure() {
        assert_eq!(
            StripeEventType::from_str("payment_intent.payment_failed"),
            StripeEventType::PaymentIntentFailed
        );
    }

    #[test]
    fn parsed_type_preserves_unknown_string() {
        assert_eq!(
            StripeEventType::from_str("invoice.paid"),
            StripeEventType::Unknown("invoice.paid".to_string())
        );
    }

    #[test]
    fn checkout_session_exposes_purchase_id() {
        let session: CheckoutSessionPayload = serde_json::from_value(json!({
            "id": "cs_test_abc",
            "payment_intent": "pi_123",
            "metadata": { "purchaseId": "p1" }
        }))
        .unwrap();

        assert_eq!(session.purchase_id(), Some("p1"));
    }

    #[test]
    fn checkout_session_without_metadata_has_no_purchase_id() {
        let session: CheckoutSessionPayload =
            serde_json::from_value(json!({ "id": "cs_test_abc" })).unwrap();

        assert!(session.purchase_id().is_none());
        assert!(session.payment_intent.is_none());
    }

    #[test]
    fn deserialize_object_to_payment_intent() {
        let event = StripeEvent {
            id: "evt_fail".to_string(),
            event_type: "payment_intent.payment_failed".to_string(),
            created: 1704067200,
            data: StripeEventData {
                object: json!({"id": "pi_789", "amount": 4999}),
            },
            livemode: false,
            api_version: None,
        };

        let intent: PaymentIntentPayload = event.deserialize_object().unwrap();
        assert_eq!(intent.id, "pi_789");
    }
}
