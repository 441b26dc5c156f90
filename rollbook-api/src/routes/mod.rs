//! API Route Modules
//!
//! Assembles the complete Axum router: document filtering routes under
//! `/api/filter_details`, task routes under `/api/task`, public health
//! checks under `/health`, and the OpenAPI document when the `openapi`
//! feature is enabled.

pub mod filter;
pub mod health;
pub mod task;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use rollbook_storage::RecordStore;

// Re-export route creation functions for convenience
pub use filter::create_router as filter_router;
pub use health::create_router as health_router;
pub use task::create_router as task_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Create the complete API router.
///
/// - Document filtering routes under `/api/filter_details/*`
/// - Task routes under `/api/task/*`
/// - Health checks at `/health/*` (public)
/// - OpenAPI spec at `/openapi.json` (with the `openapi` feature)
pub fn create_api_router(store: Arc<dyn RecordStore>, config: &ApiConfig) -> Router {
    let router = Router::new()
        .nest("/api/filter_details", filter_router(store.clone()))
        .nest("/api/task", task_router(store.clone()))
        .nest("/health", health_router(store));

    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", axum::routing::get(openapi_json));

    router
        .layer(build_cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_storage::InMemoryStore;

    #[test]
    fn test_router_assembles_in_dev_mode() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::new());
        let _router = create_api_router(store, &ApiConfig::default());
    }

    #[test]
    fn test_router_assembles_with_strict_cors() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::new());
        let config = ApiConfig {
            cors_origins: vec!["https://rollbook.example.org".to_string()],
            cors_allow_credentials: true,
            ..ApiConfig::default()
        };
        let _router = create_api_router(store, &config);
    }
}
