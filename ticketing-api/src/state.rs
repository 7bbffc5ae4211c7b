//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use ticketing_storage::TicketStore;

/// Shared handle to whichever store backs the API.
pub type SharedStore = Arc<dyn TicketStore>;

/// Application-wide state shared across all routes.
///
/// The store is injected here rather than held in a global, so tests can
/// run the real router over an in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(SharedStore, store);
crate::impl_from_ref!(Instant, start_time);
