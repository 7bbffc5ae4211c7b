//! JSON body extractor with structured rejections.

use axum::{extract::rejection::JsonRejection, extract::FromRequest, http::StatusCode};

use crate::error::{ApiError, ErrorCode};

/// `axum::Json` whose rejection is an `ApiError`.
///
/// Malformed JSON, a wrong content type or a body of the wrong shape all
/// become a 400 with the standard error body; an oversized body is a 413.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::from_code(ErrorCode::PayloadTooLarge);
        }
        ApiError::invalid_input(rejection.body_text())
    }
}
