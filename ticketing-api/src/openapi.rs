//! OpenAPI Specification for the Ticketing API
//!
//! Generated by utoipa from the route annotations and the schema derives on
//! the core ticket types.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::{health, ticket};
use crate::types::*;

/// OpenAPI document for the Ticketing API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ticketing API",
        version = "0.1.0",
        description = "CRUD service for traffic and parking violation tickets",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Tickets", description = "Violation ticket records"),
        (name = "Health", description = "Liveness and readiness checks")
    ),
    paths(
        // === Ticket Routes ===
        ticket::list_tickets,
        ticket::create_ticket,
        ticket::get_ticket,
        ticket::update_ticket,
        ticket::delete_ticket,

        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            // === Error Types ===
            ApiError, ErrorCode,

            // === Ticket Types ===
            Ticket, TicketId, TicketPayload, DeleteTicketResponse,

            // === Health Types ===
            HealthResponse, HealthStatus, HealthDetails, ComponentHealth,
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Render the document as YAML.
    pub fn to_yaml() -> Result<String, String> {
        let openapi = Self::openapi();
        serde_yaml::to_string(&openapi).map_err(|e| e.to_string())
    }
}
