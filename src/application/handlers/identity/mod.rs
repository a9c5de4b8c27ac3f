//! Identity sync command handlers.

mod handle_identity_webhook;

pub use handle_identity_webhook::{
    HandleIdentityWebhookCommand, HandleIdentityWebhookHandler, HandleIdentityWebhookResult,
};
