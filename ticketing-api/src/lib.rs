//! Ticketing API - REST layer for violation tickets
//!
//! Exposes the ticket collection and item endpoints over Axum, backed by any
//! `TicketStore`: PostgreSQL through a deadpool pool in production, or the
//! in-memory store in tests and local runs.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, LogFormat, StoreKind};
pub use db::{DbConfig, PgTicketStore};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::{AppState, SharedStore};
pub use types::*;
