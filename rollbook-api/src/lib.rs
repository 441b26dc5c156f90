//! Rollbook API - REST API Layer
//!
//! This crate provides the HTTP surface for the Rollbook voter-roll backend.
//! It exposes Axum REST endpoints for document filtering, review patching
//! with duplicate guarding, district rollups, task lookups, and CSV export,
//! all over the `RecordStore` abstraction from rollbook-storage.

pub mod config;
pub mod error;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use telemetry::{init_tracing, TelemetryConfig};
pub use types::*;
