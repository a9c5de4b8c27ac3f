//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe: webhook signature
//! verification (HMAC-SHA256, constant-time comparison, replay window) and
//! checkout-session lookup by payment intent.
//!
//! Required environment variables (via `AppConfig`):
//! - `COURSECRAFT__PAYMENT__STRIPE_API_KEY`
//! - `COURSECRAFT__PAYMENT__STRIPE_WEBHOOK_SECRET`

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
