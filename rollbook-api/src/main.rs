//! Rollbook API Server Entry Point
//!
//! Bootstraps configuration and telemetry, seeds the in-memory record store,
//! and starts the Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use rollbook_api::telemetry::{init_tracing, TelemetryConfig};
use rollbook_api::{create_api_router, ApiConfig, ApiError, ApiResult};
use rollbook_storage::{InMemoryStore, RecordStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config);

    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::new());

    let api_config = ApiConfig::from_env();
    let app: Router = create_api_router(store, &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "Starting Rollbook API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
