//! Verification challenge row.

use g1000_core::types::Timestamp;
use sqlx::FromRow;

/// The single live one-time code for an email, stored as a digest.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationChallenge {
    pub email: String,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
