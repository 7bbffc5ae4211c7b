//! Custom path extractor for typed entity IDs.
//!
//! Provides `PathId<T>`, which parses the single path parameter into a
//! typed id and answers malformed ids with a structured 400.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::str::FromStr;
use ticketing_core::TicketId;

use crate::error::ApiError;

/// An id type that can be parsed from a path segment.
pub trait PathParam: FromStr + Send {
    /// Entity name used in error messages.
    const ENTITY_NAME: &'static str;
}

impl PathParam for TicketId {
    const ENTITY_NAME: &'static str = "ticket";
}

/// Extractor for type-safe entity IDs from path parameters.
///
/// Unlike `Path<i32>`, a rejection is rendered with the same JSON error
/// body as every other API failure.
///
/// # Example
///
/// ```rust,ignore
/// async fn get_ticket(PathId(id): PathId<TicketId>) -> ApiResult<impl IntoResponse> {
///     // id is TicketId, already checked to be a positive integer
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathId<T: PathParam>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: PathParam,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ApiError::invalid_input(format!(
                    "Failed to extract {} id from path: {}",
                    T::ENTITY_NAME,
                    e.body_text()
                ))
            })?;

        raw.parse::<T>().map(PathId).map_err(|_| {
            ApiError::invalid_format("id", &format!("positive integer {} id, got '{}'", T::ENTITY_NAME, raw))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        Router::new().route(
            "/tickets/:id",
            get(|PathId(id): PathId<TicketId>| async move { id.to_string() }),
        )
    }

    #[tokio::test]
    async fn test_valid_id_extracted() -> Result<(), String> {
        let request = Request::builder()
            .uri("/tickets/42")
            .body(Body::empty())
            .map_err(|e| e.to_string())?;

        let response = test_app()
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| e.to_string())?;
        assert_eq!(&body[..], b"42");
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_id_rejected() -> Result<(), String> {
        for uri in ["/tickets/abc", "/tickets/0", "/tickets/-1", "/tickets/1.5"] {
            let request = Request::builder()
                .uri(uri)
                .body(Body::empty())
                .map_err(|e| e.to_string())?;

            let response = test_app()
                .oneshot(request)
                .await
                .map_err(|e| format!("Request failed: {:?}", e))?;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .map_err(|e| e.to_string())?;
            let error: ApiError = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
            assert_eq!(error.code, crate::error::ErrorCode::InvalidFormat);
        }
        Ok(())
    }
}
