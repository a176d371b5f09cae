//! smishguard - message risk analysis API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Analyze, inbox, saved analyses, share target             │
//! │  - Metrics endpoint                                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Remote classification with heuristic fallback            │
//! │  - Cursor pagination                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx)                                            │
//! │  - In-memory share bridge                                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers
//! - `service`: Business logic layer
//! - `data`: Database and share bridge
//! - `config`: Configuration management
//! - `error`: Error types
//! - `metrics`: Prometheus instruments

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod service;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the database pool and the orchestrator.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Analysis orchestrator (remote model + heuristic fallback)
    pub analysis: Arc<service::AnalysisService>,

    /// Share target hand-off store (volatile)
    pub share_bridge: Arc<dyn data::ShareBridge>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database
    /// 2. Seed the demo inbox (if enabled)
    /// 3. Build the remote classifier (if configured)
    /// 4. Create the share bridge
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Connect to SQLite database
        let db = data::Database::connect(&config.database.path).await?;
        tracing::info!("Database connected");

        // 2. Seed demo inbox
        if config.database.seed_demo_messages {
            db.seed_demo_messages().await?;
        }

        // 3. Remote classifier
        let remote = match config.model.endpoint() {
            Some(endpoint) => {
                let http_client = reqwest::Client::builder()
                    .user_agent(concat!("smishguard/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|e| error::AppError::Internal(e.into()))?;

                tracing::info!(
                    endpoint = %endpoint,
                    timeout_seconds = config.model.timeout_seconds,
                    "Remote classifier enabled"
                );
                Some(service::RemoteClassifier::new(
                    Arc::new(http_client),
                    endpoint.to_string(),
                    config.model.timeout(),
                ))
            }
            None => {
                tracing::info!("Remote classifier disabled; using heuristic scorer only");
                None
            }
        };
        let analysis = service::AnalysisService::new(remote);

        // 4. Share bridge
        let share_bridge =
            data::InMemoryShareBridge::new(config.share.ttl(), config.share.max_entries);

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            analysis: Arc::new(analysis),
            share_bridge: Arc::new(share_bridge),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::{Router, extract::DefaultBodyLimit};
    use tower_http::{
        compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
    };

    let cors_layer = build_cors_layer(&state.config.server);

    let api_routes = api::api_router()
        .layer(RequestBodyLimitLayer::new(state.config.server.max_body_bytes));
    // Shares may carry files, which are skipped but must still be received
    let share_routes = api::share_router()
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.share.max_body_bytes));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api_routes)
        .merge(share_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
        .merge(api::metrics_router())
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

    let origins: Vec<HeaderValue> = server
        .allowed_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::error!(%error, %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("No CORS origins configured; denying cross-origin requests");
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn health_check() -> &'static str {
    "OK"
}
