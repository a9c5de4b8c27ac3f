//! Payment provider port.
//!
//! Contract for the payment gateway integration (Stripe in production). The
//! reconciliation core only needs two capabilities: authenticate an inbound
//! webhook delivery, and look up checkout sessions by payment intent when a
//! failure event arrives without a direct purchase reference.
//!
//! Injected as `Arc<dyn PaymentProvider>` so tests can substitute a fake
//! client; nothing in the system holds a global provider instance.

use async_trait::async_trait;

use crate::domain::enrollment::{CheckoutSessionPayload, StripeEvent};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Verify a webhook signature against the raw body bytes and parse the
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` with code `InvalidWebhook` when the signature,
    /// timestamp, or payload cannot be trusted. No event data may be used
    /// after a failure.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<StripeEvent, PaymentError>;

    /// List checkout sessions associated with a payment intent, in the
    /// provider's own ordering.
    async fn list_checkout_sessions(
        &self,
        payment_intent_id: &str,
    ) -> Result<Vec<CheckoutSessionPayload>, PaymentError>;
}

/// Errors from payment provider operations.
#[derive(Debug, Clone)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    /// Create a provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
