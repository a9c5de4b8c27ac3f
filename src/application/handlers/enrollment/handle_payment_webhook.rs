//! HandlePaymentWebhookHandler - Command handler for payment provider webhooks.
//!
//! The single canonical entry point for payment events. Verification happens
//! first against the raw body; afterwards the event type selects one of two
//! reconciliation paths:
//!
//! - completion: direct purchase lookup, strict (missing references are fatal
//!   for the event and surface at the dispatch boundary)
//! - failure: indirect lookup via the provider's session-listing API,
//!   tolerant (every fault is logged and the event acknowledged, leaving
//!   redelivery to the provider)

use std::sync::Arc;

use crate::domain::enrollment::{
    link_enrollment, CheckoutSessionPayload, PaymentIntentPayload, PurchaseStatus, StripeEvent,
    StripeEventType, TransitionOutcome, WebhookError,
};
use crate::domain::foundation::PurchaseId;
use crate::ports::{
    CourseRepository, EnrollmentUnitOfWork, PaymentProvider, PurchaseRepository, UserRepository,
};

/// Command to handle a payment webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// Webhook signature header.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Checkout completed, enrollment granted.
    EnrollmentCompleted {
        purchase_id: String,
        user_id: String,
        course_id: String,
    },
    /// Payment failed, purchase marked failed.
    PurchaseFailed { purchase_id: String },
    /// Event acknowledged without any state change.
    Acknowledged,
    /// Event type not recognized; acknowledged without processing.
    Ignored,
}

/// Handler for processing payment provider webhooks.
pub struct HandlePaymentWebhookHandler {
    purchases: Arc<dyn PurchaseRepository>,
    users: Arc<dyn UserRepository>,
    courses: Arc<dyn CourseRepository>,
    enrollment_uow: Arc<dyn EnrollmentUnitOfWork>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        purchases: Arc<dyn PurchaseRepository>,
        users: Arc<dyn UserRepository>,
        courses: Arc<dyn CourseRepository>,
        enrollment_uow: Arc<dyn EnrollmentUnitOfWork>,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            purchases,
            users,
            courses,
            enrollment_uow,
            payment_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Verify signature against the raw bytes and parse the event
        let event = self
            .payment_provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "webhook signature verification failed");
                WebhookError::InvalidSignature
            })?;

        // 2. Dispatch on event type
        match event.parsed_type() {
            StripeEventType::CheckoutSessionCompleted => {
                self.handle_checkout_completed(&event).await
            }
            StripeEventType::PaymentIntentFailed => {
                // The failure path is tolerant: faults are visible in logs
                // only, never to the provider.
                match self.handle_payment_failed(&event).await {
                    Ok(result) => Ok(result),
                    Err(e) => {
                        tracing::error!(event_id = %event.id, error = %e, "error handling failed payment");
                        Ok(HandlePaymentWebhookResult::Acknowledged)
                    }
                }
            }
            StripeEventType::Unknown(event_type) => {
                tracing::info!(event_id = %event.id, %event_type, "ignoring unhandled webhook event");
                Ok(HandlePaymentWebhookResult::Ignored)
            }
        }
    }

    async fn handle_checkout_completed(
        &self,
        event: &StripeEvent,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let session: CheckoutSessionPayload = event
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(format!("invalid checkout session: {}", e)))?;

        let purchase_id = session
            .purchase_id()
            .ok_or(WebhookError::MissingMetadata("purchaseId"))?;
        let purchase_id = PurchaseId::new(purchase_id)
            .map_err(|_| WebhookError::MissingMetadata("purchaseId"))?;

        let mut purchase = self
            .purchases
            .find_by_id(&purchase_id)
            .await?
            .ok_or_else(|| WebhookError::PurchaseNotFound(purchase_id.to_string()))?;

        if purchase.status == PurchaseStatus::Completed {
            // Duplicate delivery; the enrollment was already granted.
            tracing::debug!(purchase_id = %purchase.id, "purchase already completed");
            return Ok(HandlePaymentWebhookResult::Acknowledged);
        }

        let mut user = self
            .users
            .find_by_id(&purchase.user_id)
            .await?
            .ok_or_else(|| WebhookError::UserNotFound(purchase.user_id.to_string()))?;

        let mut course = self
            .courses
            .find_by_id(&purchase.course_id)
            .await?
            .ok_or_else(|| WebhookError::CourseNotFound(purchase.course_id.to_string()))?;

        link_enrollment(&mut user, &mut course);
        purchase.complete()?;

        self.enrollment_uow
            .commit_completion(&purchase, &user, &course)
            .await?;

        tracing::info!(
            purchase_id = %purchase.id,
            user_id = %user.id,
            course_id = %course.id,
            "enrollment completed"
        );

        Ok(HandlePaymentWebhookResult::EnrollmentCompleted {
            purchase_id: purchase.id.to_string(),
            user_id: user.id.to_string(),
            course_id: course.id.to_string(),
        })
    }

    async fn handle_payment_failed(
        &self,
        event: &StripeEvent,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let intent: PaymentIntentPayload = event
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(format!("invalid payment intent: {}", e)))?;

        let sessions = self
            .payment_provider
            .list_checkout_sessions(&intent.id)
            .await
            .map_err(|e| WebhookError::ProviderCall(e.to_string()))?;

        // Only the first session returned for the intent is honored.
        let Some(session) = sessions.first() else {
            tracing::warn!(payment_intent = %intent.id, "no checkout session for failed intent");
            return Ok(HandlePaymentWebhookResult::Acknowledged);
        };

        let Some(purchase_id) = session.purchase_id() else {
            // Sessions created outside the purchase flow carry no reference.
            tracing::debug!(session_id = %session.id, "failed session has no purchase reference");
            return Ok(HandlePaymentWebhookResult::Acknowledged);
        };

        let Ok(purchase_id) = PurchaseId::new(purchase_id) else {
            return Ok(HandlePaymentWebhookResult::Acknowledged);
        };

        let Some(mut purchase) = self.purchases.find_by_id(&purchase_id).await? else {
            tracing::warn!(purchase_id = %purchase_id, "failed payment references unknown purchase");
            return Ok(HandlePaymentWebhookResult::Acknowledged);
        };

        if purchase.fail()? == TransitionOutcome::Applied {
            self.purchases.update(&purchase).await?;
            tracing::info!(purchase_id = %purchase.id, "purchase marked failed");
        }

        Ok(HandlePaymentWebhookResult::PurchaseFailed {
            purchase_id: purchase.id.to_string(),
        })
    }
}
