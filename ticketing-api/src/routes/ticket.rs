//! Ticket REST API Routes
//!
//! Collection endpoint (`/tickets`): list and create.
//! Item endpoint (`/tickets/{id}`): fetch, full update and delete.
//!
//! Each handler performs exactly one store call. Store failures are logged
//! with their detail and answered with the operation's fixed message.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use ticketing_core::{Ticket, TicketId, TicketPayload};

use crate::{
    error::{ApiError, ApiResult},
    extractors::{ApiJson, PathId},
    state::{AppState, SharedStore},
    types::DeleteTicketResponse,
};

// ============================================================================
// FAILURE MESSAGES
// ============================================================================

pub const LIST_FAILED: &str = "Unable to fetch tickets";
pub const CREATE_FAILED: &str = "Failed to create ticket";
pub const FETCH_FAILED: &str = "Failed to fetch ticket";
pub const UPDATE_FAILED: &str = "Failed to update ticket";
pub const DELETE_FAILED: &str = "Failed to delete ticket";

// ============================================================================
// COLLECTION ENDPOINT
// ============================================================================

/// GET /tickets - List all tickets
#[utoipa::path(
    get,
    path = "/tickets",
    tag = "Tickets",
    responses(
        (status = 200, description = "All tickets ordered by id", body = Vec<Ticket>),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn list_tickets(State(store): State<SharedStore>) -> ApiResult<impl IntoResponse> {
    let tickets = store
        .list()
        .await
        .map_err(|e| ApiError::store_failure("list_tickets", LIST_FAILED, None, &e))?;
    Ok(Json(tickets))
}

/// POST /tickets - Create a ticket
#[utoipa::path(
    post,
    path = "/tickets",
    tag = "Tickets",
    request_body = TicketPayload,
    responses(
        (status = 201, description = "Ticket created", body = Ticket),
        (status = 400, description = "Invalid ticket payload", body = ApiError),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn create_ticket(
    State(store): State<SharedStore>,
    ApiJson(payload): ApiJson<TicketPayload>,
) -> ApiResult<impl IntoResponse> {
    let new_ticket = payload
        .into_new_ticket()
        .map_err(|errors| ApiError::validation_failed(&errors))?;

    let ticket = store
        .insert(&new_ticket)
        .await
        .map_err(|e| ApiError::store_failure("create_ticket", CREATE_FAILED, None, &e))?;

    tracing::info!(ticket_id = %ticket.id, "Created ticket");
    Ok((StatusCode::CREATED, Json(ticket)))
}

// ============================================================================
// ITEM ENDPOINT
// ============================================================================

/// GET /tickets/{id} - Get ticket by ID
#[utoipa::path(
    get,
    path = "/tickets/{id}",
    tag = "Tickets",
    params(
        ("id" = i32, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket details", body = Ticket),
        (status = 400, description = "Malformed ticket ID", body = ApiError),
        (status = 404, description = "Ticket not found", body = ApiError),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn get_ticket(
    State(store): State<SharedStore>,
    PathId(id): PathId<TicketId>,
) -> ApiResult<impl IntoResponse> {
    let ticket = store
        .get(id)
        .await
        .map_err(|e| ApiError::store_failure("get_ticket", FETCH_FAILED, Some(id), &e))?
        .ok_or_else(ApiError::ticket_not_found)?;
    Ok(Json(ticket))
}

/// PUT /tickets/{id} - Replace every writable field of a ticket
#[utoipa::path(
    put,
    path = "/tickets/{id}",
    tag = "Tickets",
    params(
        ("id" = i32, Path, description = "Ticket ID")
    ),
    request_body = TicketPayload,
    responses(
        (status = 200, description = "Ticket updated", body = Ticket),
        (status = 400, description = "Invalid ticket payload or ID", body = ApiError),
        (status = 404, description = "Ticket not found", body = ApiError),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn update_ticket(
    State(store): State<SharedStore>,
    PathId(id): PathId<TicketId>,
    ApiJson(payload): ApiJson<TicketPayload>,
) -> ApiResult<impl IntoResponse> {
    let update = payload
        .into_update()
        .map_err(|errors| ApiError::validation_failed(&errors))?;

    let ticket = store
        .update(id, &update)
        .await
        .map_err(|e| ApiError::store_failure("update_ticket", UPDATE_FAILED, Some(id), &e))?
        .ok_or_else(ApiError::ticket_not_found)?;

    tracing::info!(ticket_id = %id, "Updated ticket");
    Ok(Json(ticket))
}

/// DELETE /tickets/{id} - Delete a ticket
///
/// Succeeds whether or not the ticket existed.
#[utoipa::path(
    delete,
    path = "/tickets/{id}",
    tag = "Tickets",
    params(
        ("id" = i32, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket deleted or already absent", body = DeleteTicketResponse),
        (status = 400, description = "Malformed ticket ID", body = ApiError),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn delete_ticket(
    State(store): State<SharedStore>,
    PathId(id): PathId<TicketId>,
) -> ApiResult<impl IntoResponse> {
    let removed = store
        .delete(id)
        .await
        .map_err(|e| ApiError::store_failure("delete_ticket", DELETE_FAILED, Some(id), &e))?;

    tracing::info!(ticket_id = %id, removed, "Deleted ticket");
    Ok(Json(DeleteTicketResponse { success: true }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the ticket routes router.
pub fn create_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", axum::routing::get(list_tickets).post(create_ticket))
        .route(
            "/:id",
            axum::routing::get(get_ticket)
                .put(update_ticket)
                .delete(delete_ticket),
        )
}
