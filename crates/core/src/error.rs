use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// Each variant maps to one stable machine-readable kind (see
/// [`CoreError::kind`]); the HTTP layer turns that into a status code and a
/// JSON body. Messages never contain store internals.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Not eligible: {0}")]
    NotEligible(String),

    #[error("Pending approval: {0}")]
    PendingApproval(String),

    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    /// Covers unknown email, missing password, and wrong password alike.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("You have already applied to this project")]
    DuplicateApplication,

    #[error("The application window for this project is closed")]
    WindowClosed,

    #[error("Too late: {0}")]
    TooLate(String),

    #[error("A review has already been submitted for this engagement")]
    AlreadyReviewed,

    #[error("The engagement must be reviewed before a reflection can be submitted")]
    ReviewRequired,

    /// The entity exists but its current status does not allow the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Retryable infrastructure failure (timeout, dropped connection).
    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable error code.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "INVALID_INPUT",
            CoreError::WeakPassword(_) => "WEAK_PASSWORD",
            CoreError::NotEligible(_) => "NOT_ELIGIBLE",
            CoreError::PendingApproval(_) => "PENDING_APPROVAL",
            CoreError::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            CoreError::InvalidCredentials => "INVALID_CREDENTIALS",
            CoreError::Unauthorized(_) => "UNAUTHORIZED",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::DuplicateApplication => "DUPLICATE_APPLICATION",
            CoreError::WindowClosed => "WINDOW_CLOSED",
            CoreError::TooLate(_) => "TOO_LATE",
            CoreError::AlreadyReviewed => "ALREADY_REVIEWED",
            CoreError::ReviewRequired => "REVIEW_REQUIRED",
            CoreError::InvalidState(_) => "INVALID_STATE",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::Transient(_) => "TRANSIENT",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether a caller may retry the same request with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Transient(_))
    }
}
