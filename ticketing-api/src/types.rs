//! Request and response types for the REST API.
//!
//! Ticket bodies come straight from `ticketing-core`; this module only adds
//! the shapes that exist purely at the HTTP layer.

use serde::{Deserialize, Serialize};

pub use ticketing_core::{Ticket, TicketId, TicketPayload};

/// Response body for DELETE /tickets/{id}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteTicketResponse {
    pub success: bool,
}
