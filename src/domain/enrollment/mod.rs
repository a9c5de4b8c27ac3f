//! Enrollment domain - purchases, users, courses, and the payment webhook
//! machinery that reconciles them.

mod course;
mod enrollment;
mod purchase;
mod stripe_event;
mod user;
mod webhook_errors;
mod webhook_verifier;

pub use course::Course;
pub use enrollment::link_enrollment;
pub use purchase::{Purchase, PurchaseStatus, TransitionOutcome};
pub use stripe_event::{
    CheckoutSessionPayload, PaymentIntentPayload, StripeEvent, StripeEventData, StripeEventType,
};
pub use user::User;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use course::test_course;
#[cfg(test)]
pub use purchase::test_purchase;
#[cfg(test)]
pub use user::test_user;
#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
