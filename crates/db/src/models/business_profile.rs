//! Business profile model and DTOs.

use g1000_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `business_profiles` table, keyed by the owner identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BusinessProfile {
    pub user_id: DbId,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub website_url: Option<String>,
    pub industry_tags: Vec<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_approved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the profile created at business registration.
#[derive(Debug)]
pub struct CreateBusinessProfile {
    pub user_id: DbId,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub website_url: Option<String>,
    pub industry_tags: Vec<String>,
}

/// DTO for owner-side profile edits. All fields are optional, except that
/// `company_name` is required when no profile exists yet.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBusinessProfile {
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub website_url: Option<String>,
    pub industry_tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}
