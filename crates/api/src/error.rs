use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use g1000_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error": message, "code": kind }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal error with a human-readable message. Never shown to clients.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// The request exceeded the server's request timeout.
    #[error("Request timed out")]
    Timeout,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";
const TRANSIENT_MESSAGE: &str = "The service is temporarily unavailable, please retry";
const TIMEOUT_MESSAGE: &str = "The request took too long to complete";
const DUPLICATE_MESSAGE: &str = "A record with these values already exists";

/// HTTP status for each domain error kind.
pub fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::InvalidInput(_)
        | CoreError::WeakPassword(_)
        | CoreError::InvalidOrExpiredCode => StatusCode::BAD_REQUEST,
        CoreError::InvalidCredentials | CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CoreError::NotEligible(_) | CoreError::PendingApproval(_) | CoreError::Forbidden(_) => {
            StatusCode::FORBIDDEN
        }
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::DuplicateApplication
        | CoreError::AlreadyReviewed
        | CoreError::Conflict(_)
        | CoreError::InvalidState(_) => StatusCode::CONFLICT,
        CoreError::WindowClosed | CoreError::TooLate(_) | CoreError::ReviewRequired => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CoreError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing message for a domain error.
fn core_message(err: &CoreError) -> String {
    match err {
        CoreError::InvalidInput(msg)
        | CoreError::WeakPassword(msg)
        | CoreError::NotEligible(msg)
        | CoreError::PendingApproval(msg)
        | CoreError::Unauthorized(msg)
        | CoreError::Forbidden(msg)
        | CoreError::TooLate(msg)
        | CoreError::InvalidState(msg)
        | CoreError::Conflict(msg) => msg.clone(),
        CoreError::NotFound { entity, id } => format!("{entity} with id {id} not found"),
        CoreError::Transient(msg) => {
            tracing::warn!(error = %msg, "Transient failure");
            TRANSIENT_MESSAGE.to_string()
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            INTERNAL_MESSAGE.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => (core_status(core), core.kind(), core_message(core)),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }

            AppError::Timeout => {
                tracing::warn!("Request timed out");
                (
                    StatusCode::REQUEST_TIMEOUT,
                    "TIMEOUT",
                    TIMEOUT_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Postgres error codes that indicate a retryable condition:
/// statement timeout, serialization failure, deadlock.
const TRANSIENT_PG_CODES: [&str; 3] = ["57014", "40001", "40P01"];

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to
///   409 with a fixed message; the constraint name only goes to the log.
/// - Pool exhaustion, I/O failures, and the codes in [`TRANSIENT_PG_CODES`] map to 503.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!(error = %err, "Database unavailable");
            transient()
        }
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            if code.as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    tracing::warn!(constraint, "Unique constraint violation");
                    return duplicate();
                }
            }
            if code
                .as_deref()
                .is_some_and(|c| TRANSIENT_PG_CODES.contains(&c))
            {
                tracing::warn!(error = %db_err, "Transient database error");
                return transient();
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

fn duplicate() -> (StatusCode, &'static str, String) {
    (
        StatusCode::CONFLICT,
        "CONFLICT",
        DUPLICATE_MESSAGE.to_string(),
    )
}

fn transient() -> (StatusCode, &'static str, String) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        "TRANSIENT",
        TRANSIENT_MESSAGE.to_string(),
    )
}
