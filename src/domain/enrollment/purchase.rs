//! Purchase aggregate entity.
//!
//! A Purchase links a user, a course, and a payment outcome. It is created at
//! checkout initiation (outside this core) in `Pending` status; webhook
//! reconciliation only ever reads it and moves it to a terminal state.
//!
//! # Invariants
//!
//! - Status transitions only `Pending -> Completed` or `Pending -> Failed`
//! - Re-applying the terminal state already held is a no-op (webhooks are
//!   delivered at-least-once)
//! - A terminal state is never overwritten by the other terminal state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, PurchaseId, UserId};

use super::WebhookError;

/// Payment outcome of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// Checkout initiated, awaiting the provider's verdict.
    Pending,

    /// Payment settled; enrollment has been granted.
    Completed,

    /// Payment failed; no enrollment.
    Failed,
}

impl PurchaseStatus {
    /// Returns true if this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PurchaseStatus::Completed | PurchaseStatus::Failed)
    }

    /// Returns the wire representation used in the database and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
        }
    }
}

/// Outcome of applying a state transition to a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The status changed.
    Applied,

    /// The purchase was already in the requested state (duplicate delivery).
    AlreadyInState,
}

/// Purchase aggregate - one checkout attempt for one user/course pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Unique identifier, referenced from checkout session metadata.
    pub id: PurchaseId,

    /// User who initiated the checkout.
    pub user_id: UserId,

    /// Course being purchased.
    pub course_id: CourseId,

    /// Amount in minor currency units (cents).
    pub amount: i64,

    /// Current position in the payment lifecycle.
    pub status: PurchaseStatus,

    /// When the purchase was created.
    pub created_at: DateTime<Utc>,

    /// When the purchase was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// Mark the purchase as completed after a successful checkout.
    ///
    /// Duplicate completion events are tolerated as no-ops.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidTransition` if the purchase already
    /// failed: a completion arriving for a failed purchase is reconciliation
    /// drift, not a duplicate.
    pub fn complete(&mut self) -> Result<TransitionOutcome, WebhookError> {
        match self.status {
            PurchaseStatus::Pending => {
                self.status = PurchaseStatus::Completed;
                self.updated_at = Utc::now();
                Ok(TransitionOutcome::Applied)
            }
            PurchaseStatus::Completed => Ok(TransitionOutcome::AlreadyInState),
            PurchaseStatus::Failed => Err(WebhookError::InvalidTransition {
                purchase_id: self.id.to_string(),
                from: "failed",
                to: "completed",
            }),
        }
    }

    /// Mark the purchase as failed after the provider reported a declined
    /// payment intent.
    ///
    /// Duplicate failure events are tolerated as no-ops.
    pub fn fail(&mut self) -> Result<TransitionOutcome, WebhookError> {
        match self.status {
            PurchaseStatus::Pending => {
                self.status = PurchaseStatus::Failed;
                self.updated_at = Utc::now();
                Ok(TransitionOutcome::Applied)
            }
            PurchaseStatus::Failed => Ok(TransitionOutcome::AlreadyInState),
            PurchaseStatus::Completed => Err(WebhookError::InvalidTransition {
                purchase_id: self.id.to_string(),
                from: "completed",
                to: "failed",
            }),
        }
    }
}

#[cfg(test)]
pub fn test_purchase(id: &str, user_id: &str, course_id: &str) -> Purchase {
    Purchase {
        id: PurchaseId::new(id).unwrap(),
        user_id: UserId::new(user_id).unwrap(),
        course_id: CourseId::new(course_id).unwrap(),
        amount: 4999,
        status: PurchaseStatus::Pending,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
