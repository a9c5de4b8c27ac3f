//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe API. Webhook
//! verification is delegated to the domain verifier; the session-listing
//! call goes over HTTP with the secret API key as basic auth.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::enrollment::{CheckoutSessionPayload, StripeEvent, StripeWebhookVerifier};
use crate::ports::{PaymentError, PaymentProvider};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    verifier: StripeWebhookVerifier,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        let verifier = StripeWebhookVerifier::new(config.webhook_secret.expose_secret().clone());
        Self {
            config,
            verifier,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Paginated list envelope returned by Stripe list endpoints.
#[derive(Debug, Deserialize)]
struct StripeSessionList {
    #[serde(default)]
    data: Vec<CheckoutSessionPayload>,
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<StripeEvent, PaymentError> {
        self.verifier
            .verify_and_parse(payload, signature)
            .map_err(|e| PaymentError::invalid_webhook(e.to_string()))
    }

    async fn list_checkout_sessions(
        &self,
        payment_intent_id: &str,
    ) -> Result<Vec<CheckoutSessionPayload>, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .query(&[("payment_intent", payment_intent_id)])
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PaymentError::provider(format!(
                "Stripe API error ({}): {}",
                status, error_text
            )));
        }

        let list: StripeSessionList = response
            .json()
            .await
            .map_err(|e| PaymentError::provider(format!("failed to parse Stripe response: {}", e)))?;

        Ok(list.data)
    }
}
