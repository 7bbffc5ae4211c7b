//! Ticketing Storage - Store Trait and In-Memory Implementation
//!
//! Defines the persistence contract for ticket records. The PostgreSQL
//! implementation lives in ticketing-api next to its connection pool.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use ticketing_core::{
    NewTicket, StorageError, StorageResult, Ticket, TicketId, TicketUpdate,
};

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Async persistence contract for the `tickets` table.
///
/// Each method is a single store operation with no surrounding transaction.
/// A missing row is reported through `Option`/`bool`, never as an error.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// All tickets, ordered by id.
    async fn list(&self) -> StorageResult<Vec<Ticket>>;

    /// Get a ticket by id.
    async fn get(&self, id: TicketId) -> StorageResult<Option<Ticket>>;

    /// Insert a ticket, assigning its id and applying column defaults.
    async fn insert(&self, ticket: &NewTicket) -> StorageResult<Ticket>;

    /// Overwrite every writable field of a ticket.
    ///
    /// Returns `None` when no ticket has the given id.
    async fn update(&self, id: TicketId, update: &TicketUpdate) -> StorageResult<Option<Ticket>>;

    /// Delete a ticket. Returns whether a row was removed.
    async fn delete(&self, id: TicketId) -> StorageResult<bool>;

    /// Check that the store can serve requests.
    async fn ping(&self) -> StorageResult<()>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<TicketId, Ticket>,
    last_id: i32,
}

/// In-memory ticket store.
///
/// Ids come from a counter that only moves forward, so ids of deleted
/// tickets are never handed out again. Column constraints are enforced the
/// same way the database enforces them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tickets.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.read()?.rows.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.read()?.rows.is_empty())
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Table>> {
        self.table.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Table>> {
        self.table.write().map_err(|_| StorageError::LockPoisoned)
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn list(&self) -> StorageResult<Vec<Ticket>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    async fn get(&self, id: TicketId) -> StorageResult<Option<Ticket>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn insert(&self, ticket: &NewTicket) -> StorageResult<Ticket> {
        ticket.check_constraints()?;

        let mut table = self.write()?;
        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| StorageError::query("id sequence exhausted"))?;
        table.last_id = next;

        let id = TicketId::new(next);
        let stored = Ticket::from_new(id, ticket.clone(), Utc::now());
        table.rows.insert(id, stored.clone());
        tracing::debug!(ticket_id = %id, "Inserted ticket into memory store");
        Ok(stored)
    }

    async fn update(&self, id: TicketId, update: &TicketUpdate) -> StorageResult<Option<Ticket>> {
        update.check_constraints()?;

        let mut table = self.write()?;
        match table.rows.get_mut(&id) {
            Some(ticket) => {
                ticket.apply(update.clone());
                Ok(Some(ticket.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: TicketId) -> StorageResult<bool> {
        Ok(self.write()?.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> StorageResult<()> {
        self.read().map(|_| ())
    }
}
