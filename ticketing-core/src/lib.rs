//! Ticketing Core - Schema, Entity Types and Validation
//!
//! Pure data structures plus the checks that guard them. Every other crate
//! in the workspace depends on this one; nothing here performs I/O.
//!
//! - [`schema`] declares the `tickets` table and its column constraints
//! - [`ticket`] holds the `Ticket` entity and its write payloads
//! - [`validation`] turns raw request payloads into checked write payloads
//! - [`error`] defines the validation and storage error taxonomy

pub mod error;
pub mod schema;
pub mod ticket;
pub mod validation;

pub use error::{StorageError, StorageResult, ValidationError};
pub use schema::{ColumnDef, ColumnType, TICKETS_TABLE};
pub use ticket::{NewTicket, Ticket, TicketId, TicketUpdate, Timestamp};
pub use validation::TicketPayload;
