//! Service Layer
//!
//! Business logic between the route handlers and the record store. Routes
//! stay thin: they parse transport concerns and delegate here.

pub mod dedup_service;
pub mod export_service;
pub mod filter_service;
pub mod rollup_service;
