//! HTTP handlers for the webhook endpoints.
//!
//! These handlers connect axum routes to the application layer. Bodies are
//! taken as raw bytes: signature verification must see exactly what the
//! provider signed.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::enrollment::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
};
use crate::application::handlers::identity::{
    HandleIdentityWebhookCommand, HandleIdentityWebhookHandler,
};
use crate::domain::enrollment::WebhookError;
use crate::domain::identity::{IdentityError, IdentityWebhookHeaders, IdentityWebhookVerifier};
use crate::ports::{
    CourseRepository, EnrollmentUnitOfWork, PaymentProvider, PurchaseRepository, UserRepository,
};

use super::dto::{ErrorResponse, IdentityAck, WebhookAck};

/// Shared application state for the webhook endpoints.
///
/// Cloned per request; all dependencies are Arc-wrapped ports so tests can
/// substitute fakes.
#[derive(Clone)]
pub struct WebhookAppState {
    pub purchases: Arc<dyn PurchaseRepository>,
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub enrollment_uow: Arc<dyn EnrollmentUnitOfWork>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub identity_verifier: Arc<IdentityWebhookVerifier>,
}

impl WebhookAppState {
    /// Create handlers on demand from the shared state.
    pub fn payment_webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.purchases.clone(),
            self.users.clone(),
            self.courses.clone(),
            self.enrollment_uow.clone(),
            self.payment_provider.clone(),
        )
    }

    pub fn identity_webhook_handler(&self) -> HandleIdentityWebhookHandler {
        HandleIdentityWebhookHandler::new(self.users.clone(), self.identity_verifier.clone())
    }
}

/// POST /api/webhooks/stripe - Handle payment provider webhooks.
///
/// Whatever branch the event takes, the provider gets `{"received": true}`
/// unless verification failed or the completion path hit a fatal error.
pub async fn handle_stripe_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PaymentWebhookApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            PaymentWebhookApiError(WebhookError::ParseError(
                "missing Stripe-Signature header".to_string(),
            ))
        })?;

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    state.payment_webhook_handler().handle(cmd).await?;

    Ok((StatusCode::OK, Json(WebhookAck::new())))
}

/// POST /api/webhooks/identity - Handle identity provider webhooks.
pub async fn handle_identity_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, IdentityWebhookApiError> {
    let cmd = HandleIdentityWebhookCommand {
        payload: body.to_vec(),
        headers: identity_headers(&headers)?,
    };

    state.identity_webhook_handler().handle(cmd).await?;

    Ok((StatusCode::OK, Json(IdentityAck::default())))
}

/// Pull the svix headers out of the request.
fn identity_headers(headers: &HeaderMap) -> Result<IdentityWebhookHeaders, IdentityError> {
    let header = |name: &'static str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .ok_or(IdentityError::MissingHeader(name))
    };

    let timestamp = header("svix-timestamp")?
        .parse::<i64>()
        .map_err(|_| IdentityError::ParseError("invalid svix-timestamp".to_string()))?;

    Ok(IdentityWebhookHeaders {
        message_id: header("svix-id")?.to_string(),
        timestamp,
        signatures: header("svix-signature")?.to_string(),
    })
}

/// API error wrapper converting payment webhook errors to HTTP responses.
pub struct PaymentWebhookApiError(pub WebhookError);

impl From<WebhookError> for PaymentWebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentWebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if self.0.is_verification_failure() {
            tracing::warn!(error = %self.0, "rejected unverified webhook delivery");
        } else if status.is_server_error() {
            tracing::error!(error = %self.0, "payment webhook processing failed");
        }
        let body = ErrorResponse::new(self.0.to_string());
        (status, Json(body)).into_response()
    }
}

/// API error wrapper converting identity webhook errors to HTTP responses.
pub struct IdentityWebhookApiError(pub IdentityError);

impl From<IdentityError> for IdentityWebhookApiError {
    fn from(err: IdentityError) -> Self {
        Self(err)
    }
}

impl IntoResponse for IdentityWebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "identity webhook processing failed");
        }
        let body = ErrorResponse::new(self.0.to_string());
        (status, Json(body)).into_response()
    }
}
