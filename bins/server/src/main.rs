//! Soundledger API Server
//!
//! Main entry point for the Soundledger backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundledger_api::{AppState, create_router};
use soundledger_core::storage::{StorageBackend, StorageService};
use soundledger_db::connect;
use soundledger_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        token_expires_secs: config.jwt.token_expiry_secs as i64,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create storage service for archived statement files
    let backend = if config.storage.backend == "s3" {
        StorageBackend::s3(
            config.storage.endpoint.clone(),
            config.storage.root.clone(),
            config.storage.region.clone(),
        )
    } else {
        StorageBackend::local_fs(config.storage.root.clone())
    };
    let storage = match StorageService::from_backend(backend) {
        Ok(service) => {
            info!(backend = service.backend_name(), "Storage service configured");
            Some(Arc::new(service))
        }
        Err(e) => {
            warn!(error = %e, "Storage unavailable, statement cleanup disabled");
            None
        }
    };

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
