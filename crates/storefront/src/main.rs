//! Clementine Storefront - headless storefront engine.
//!
//! This binary serves the storefront JSON facade on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework exposing cart, wishlist, catalog, checkout, theme,
//!   and notification endpoints as JSON
//! - Shopper state (cart, wishlist, theme) persisted to a file-backed
//!   key-value store, one JSON document per key
//! - Product catalog loaded from a bundled JSON file or a remote catalog
//!   service (fetched in the background after startup)
//! - Commerce backend (auth, profiles, orders) consumed over REST

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use sentry::integrations::tracing as sentry_tracing;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clementine_storefront::catalog::Catalog;
use clementine_storefront::config::{CatalogSource, StorefrontConfig};
use clementine_storefront::routes;
use clementine_storefront::state::AppState;
use clementine_storefront::storage::{FileStore, KeyValueStore, keys};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clementine_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Open the persisted shopper state directory
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::open(&config.state_dir).expect("Failed to open state directory"));
    tracing::info!(dir = %config.state_dir.display(), "State store opened");

    // Load the catalog; the remote variant starts empty and fills in the
    // background
    let catalog = match &config.catalog {
        CatalogSource::File(path) => {
            Catalog::from_file(path).expect("Failed to load catalog file")
        }
        CatalogSource::Remote(url) => Catalog::remote(url.clone()),
    };

    // Build application state
    let state = AppState::new(config.clone(), storage, catalog);

    // Kick off the background catalog fetch; dropping the handle aborts it,
    // so keep it alive for the life of the server
    let _catalog_refresh = match &config.catalog {
        CatalogSource::Remote(_) => {
            tracing::info!("Catalog fetch started (async)");
            Some(state.catalog().spawn_refresh())
        }
        CatalogSource::File(_) => None,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the state store is readable and the catalog has finished its
/// initial load. Returns 503 Service Unavailable otherwise.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.storage().get(keys::CART).is_err() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    if !state.catalog().is_loaded() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::OK
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
