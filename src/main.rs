//! Coursecraft server binary.
//!
//! Loads configuration, wires the adapters to the webhook routes, and serves.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use coursecraft::adapters::http::webhooks::{webhook_router, WebhookAppState};
use coursecraft::adapters::postgres::{
    PostgresCourseRepository, PostgresEnrollmentUnitOfWork, PostgresPurchaseRepository,
    PostgresUserRepository,
};
use coursecraft::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use coursecraft::config::AppConfig;
use coursecraft::domain::identity::IdentityWebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let stripe = StripePaymentAdapter::new(StripeConfig::new(
        config.payment.stripe_api_key.clone(),
        config.payment.stripe_webhook_secret.clone(),
    ));

    let state = WebhookAppState {
        purchases: Arc::new(PostgresPurchaseRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        courses: Arc::new(PostgresCourseRepository::new(pool.clone())),
        enrollment_uow: Arc::new(PostgresEnrollmentUnitOfWork::new(pool.clone())),
        payment_provider: Arc::new(stripe),
        identity_verifier: Arc::new(IdentityWebhookVerifier::new(
            config.identity.webhook_secret.clone(),
        )),
    };

    let app = Router::new()
        .nest("/api", webhook_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "coursecraft listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.server.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
