//! Mock payment provider for testing.
//!
//! Configurable implementation of `PaymentProvider` for unit and integration
//! tests: pre-configured events and session listings, error injection, call
//! tracking.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::enrollment::{CheckoutSessionPayload, StripeEvent};
use crate::ports::{PaymentError, PaymentProvider};

/// Mock payment provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.set_event(event);                       // next verify_webhook result
/// mock.set_sessions("pi_1", vec![session]);    // session-listing fixture
/// mock.fail_verification(PaymentError::invalid_webhook("nope"));
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    /// Event returned by the next `verify_webhook` call.
    next_event: Option<StripeEvent>,

    /// Error returned by `verify_webhook` instead of an event.
    verify_error: Option<PaymentError>,

    /// Session listings keyed by payment intent id.
    sessions_by_intent: HashMap<String, Vec<CheckoutSessionPayload>>,

    /// Error returned by `list_checkout_sessions`.
    list_error: Option<PaymentError>,

    /// Recorded method calls for assertions.
    call_log: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the event the next verification returns.
    pub fn set_event(&self, event: StripeEvent) {
        let mut state = self.inner.lock().unwrap();
        state.next_event = Some(event);
        state.verify_error = None;
    }

    /// Make verification fail with the given error.
    pub fn fail_verification(&self, error: PaymentError) {
        self.inner.lock().unwrap().verify_error = Some(error);
    }

    /// Configure the sessions returned for a payment intent.
    pub fn set_sessions(&self, payment_intent_id: &str, sessions: Vec<CheckoutSessionPayload>) {
        self.inner
            .lock()
            .unwrap()
            .sessions_by_intent
            .insert(payment_intent_id.to_string(), sessions);
    }

    /// Make session listing fail with the given error.
    pub fn fail_session_listing(&self, error: PaymentError) {
        self.inner.lock().unwrap().list_error = Some(error);
    }

    /// Recorded method calls, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().call_log.clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn verify_webhook(
        &self,
        _payload: &[u8],
        _signature: &str,
    ) -> Result<StripeEvent, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push("verify_webhook".to_string());

        if let Some(error) = state.verify_error.clone() {
            return Err(error);
        }

        state
            .next_event
            .clone()
            .ok_or_else(|| PaymentError::invalid_webhook("no event configured"))
    }

    async fn list_checkout_sessions(
        &self,
        payment_intent_id: &str,
    ) -> Result<Vec<CheckoutSessionPayload>, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state
            .call_log
            .push(format!("list_checkout_sessions:{}", payment_intent_id));

        if let Some(error) = state.list_error.clone() {
            return Err(error);
        }

        Ok(state
            .sessions_by_intent
            .get(payment_intent_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrollment::StripeEventData;
    use serde_json::json;

    fn event() -> StripeEvent {
        StripeEvent {
            id: "evt_mock".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: 1704067200,
            data: StripeEventData { object: json!({}) },
            livemode: false,
            api_version: None,
        }
    }

    #[tokio::test]
    async fn returns_configured_event() {
        let mock = MockPaymentProvider::new();
        mock.set_event(event());

        let verified = mock.verify_webhook(b"{}", "sig").await.unwrap();

        assert_eq!(verified.id, "evt_mock");
        assert_eq!(mock.calls(), vec!["verify_webhook"]);
    }

    #[tokio::test]
    async fn verification_error_wins_over_event() {
        let mock = MockPaymentProvider::new();
        mock.set_event(event());
        mock.fail_verification(PaymentError::invalid_webhook("forced"));

        let result = mock.verify_webhook(b"{}", "sig").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unconfigured_intent_returns_empty_list() {
        let mock = MockPaymentProvider::new();

        let sessions = mock.list_checkout_sessions("pi_unknown").await.unwrap();

        assert!(sessions.is_empty());
        assert_eq!(mock.calls(), vec!["list_checkout_sessions:pi_unknown"]);
    }
}
