//! Ticketing API Server Entry Point
//!
//! Loads configuration, connects the configured ticket store and starts the
//! Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use ticketing_api::telemetry::init_tracing;
use ticketing_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, DbConfig, PgTicketStore,
    SharedStore, StoreKind,
};
use ticketing_storage::InMemoryTicketStore;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let api_config = ApiConfig::from_env()?;
    init_tracing(api_config.log_format)?;

    let store = connect_store(api_config.store).await?;
    let app: Router = create_api_router(AppState::new(store), &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, store = ?api_config.store, "Starting ticketing API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn connect_store(kind: StoreKind) -> ApiResult<SharedStore> {
    match kind {
        StoreKind::Postgres => {
            let db_config = DbConfig::from_env();
            let store = PgTicketStore::from_config(&db_config)?;
            store.ensure_schema().await?;
            tracing::info!(pool_size = store.pool_size(), "Connected to PostgreSQL");
            Ok(Arc::new(store))
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory ticket store; tickets are lost on restart");
            Ok(Arc::new(InMemoryTicketStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
