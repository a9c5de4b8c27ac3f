//! HTTP adapter for the inbound webhook endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, IdentityAck, WebhookAck};
pub use handlers::{
    handle_identity_webhook, handle_stripe_webhook, IdentityWebhookApiError,
    PaymentWebhookApiError, WebhookAppState,
};
pub use routes::{webhook_router, webhook_routes};
