//! smishguard binary entry point

use smishguard::{AppState, config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired share payloads are swept
const SHARE_PRUNE_INTERVAL_SECS: u64 = 60;

/// Application entry point
///
/// # Setup
/// 1. Load configuration from file and environment
/// 2. Initialize tracing/logging from the `logging` section
/// 3. Initialize metrics
/// 4. Initialize AppState
/// 5. Build Axum router
/// 6. Start background tasks (share bridge pruning)
/// 7. Start HTTP server
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration
    let config = config::AppConfig::load()?;

    // 2. Initialize tracing/logging (RUST_LOG overrides the configured level)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.default_filter().into());

    if config.logging.is_json() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!("Starting smishguard...");
    tracing::info!(
        database = %config.database.path.display(),
        remote_model = config.model.endpoint().is_some(),
        "Configuration loaded"
    );
    if config.model.endpoint().is_none() {
        tracing::warn!("model.url is empty; every analysis uses the local heuristic scorer");
    }

    // 3. Initialize metrics
    smishguard::metrics::init_metrics();

    // 4. Initialize application state
    let state = AppState::new(config.clone()).await?;

    // 5. Build Axum router
    let app = smishguard::build_router(state.clone());

    // 6. Start background tasks
    spawn_share_prune_task(state.clone());

    // 7. Start HTTP server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Spawn background task dropping expired share payloads
fn spawn_share_prune_task(state: AppState) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(SHARE_PRUNE_INTERVAL_SECS));

        // Consume the immediate first tick; nothing can have expired yet.
        interval.tick().await;

        loop {
            interval.tick().await;
            state.share_bridge.prune_expired().await;
        }
    });

    tracing::info!("Share bridge prune task spawned");
}
