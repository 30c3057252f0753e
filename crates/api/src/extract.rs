//! Request extractors whose rejections use the API's error body.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use g1000_core::error::CoreError;

use crate::error::AppError;

/// `axum::Json` with rejections reported as `{ "error", "code" }`.
///
/// Malformed JSON, a missing content type, and fields of the wrong type all
/// become `INVALID_INPUT`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::InvalidInput(rejection.body_text()))
    }
}
