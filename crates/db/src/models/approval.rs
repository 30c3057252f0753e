//! Business approval allow-list entries.

use g1000_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalEntry {
    pub id: DbId,
    pub email: String,
    pub company_name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding (or re-activating) an allow-list entry.
#[derive(Debug, Deserialize)]
pub struct CreateApprovalEntry {
    pub email: String,
    pub company_name: Option<String>,
}
