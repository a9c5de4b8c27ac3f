//! Adapters - Implementations of port interfaces.
//!
//! - `http` - inbound webhook endpoints (axum)
//! - `postgres` - repository implementations (sqlx)
//! - `stripe` - payment provider client (reqwest) and its test mock

pub mod http;
pub mod postgres;
pub mod stripe;
