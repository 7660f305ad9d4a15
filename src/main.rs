//! Memberline server binary
//!
//! Loads configuration, connects PostgreSQL, wires the billing provider and
//! stores into the application handlers, and serves the subscription and
//! webhook routes until shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memberline::adapters::auth::{JwtConfig, JwtTokenAuthority};
use memberline::adapters::http::{api_router, SubscriptionAppState, SubscriptionHandlers};
use memberline::adapters::paystack::{PaystackClient, PaystackConfig};
use memberline::adapters::postgres::{
    PostgresAccountStore, PostgresPlanStore, PostgresSubscriptionStore,
};
use memberline::application::AuthorizationGate;
use memberline::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(environment = ?config.server.environment, "Starting memberline");
    if config.billing.is_test_mode() {
        tracing::warn!("Billing provider is using a test key");
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.connect_timeout())
        .connect(config.database.url.expose_secret())
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let accounts = Arc::new(PostgresAccountStore::new(pool.clone()));
    let plans = Arc::new(PostgresPlanStore::new(pool.clone()));
    let subscriptions = Arc::new(PostgresSubscriptionStore::new(pool));

    let provider = Arc::new(PaystackClient::new(
        PaystackConfig::new(config.billing.secret_key.expose_secret().as_str())
            .with_base_url(config.billing.base_url.clone())
            .with_timeout_secs(config.billing.timeout_secs),
    ));

    let tokens = Arc::new(JwtTokenAuthority::new(
        JwtConfig::new(config.auth.token_secret.clone()).with_ttl_secs(config.auth.token_ttl_secs),
    ));
    let gate = Arc::new(AuthorizationGate::new(tokens, accounts.clone()));

    let handlers = SubscriptionHandlers::new(provider, accounts, plans, subscriptions);
    let state = SubscriptionAppState {
        handlers: Arc::new(handlers),
    };

    let mut router = api_router(state, gate)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));
    if let Some(cors) = cors_layer(&config) {
        router = router.layer(cors);
    }

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing from `RUST_LOG`, falling back to the configured filter
///
/// Production gets JSON output for log aggregation; development keeps the
/// human-readable format.
fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Build a CORS layer from the configured origins, if any
///
/// Cookie auth needs credentialed requests, which cannot be combined with a
/// wildcard origin, so only an explicit origin list enables the layer.
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
