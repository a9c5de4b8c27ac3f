//! Identity domain - identity-provider webhook events and verification.
//!
//! User and course lifecycle belongs to this sync flow; the enrollment core
//! assumes the records already exist when a completion event arrives.

mod errors;
mod identity_event;
mod webhook_verifier;

pub use errors::IdentityError;
pub use identity_event::{
    IdentityDeletedData, IdentityEmailAddress, IdentityEvent, IdentityEventType, IdentityUserData,
};
pub use webhook_verifier::{IdentityWebhookHeaders, IdentityWebhookVerifier};

#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
