//! Student profile model and DTOs.

use g1000_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `student_profiles` table, keyed by the student identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentProfile {
    pub user_id: DbId,
    pub bio: Option<String>,
    pub major: Option<String>,
    pub year: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub personal_website_url: Option<String>,
    pub skills: Vec<String>,
    pub proof_of_work_urls: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the student's profile form. Replaces every editable field;
/// omitted fields are cleared.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertStudentProfile {
    pub bio: Option<String>,
    pub major: Option<String>,
    pub year: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub personal_website_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub proof_of_work_urls: Vec<String>,
}
