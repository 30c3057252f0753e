//! Engagement sub-ledger rows: overview, updates, comments, review, reflection.

use chrono::NaiveDate;
use g1000_core::engagement::Link;
use g1000_core::error::CoreError;
use g1000_core::lifecycle::EngagementStatus;
use g1000_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectOverview {
    pub id: DbId,
    pub application_id: DbId,
    pub scope: Option<String>,
    pub deliverables: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    pub meeting_link: Option<String>,
    pub owner_contact_name: Option<String>,
    pub owner_contact_email: Option<String>,
    pub useful_links: Json<Vec<Link>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full replacement of the overview document.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertOverview {
    pub scope: Option<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    pub meeting_link: Option<String>,
    pub owner_contact_name: Option<String>,
    pub owner_contact_email: Option<String>,
    #[serde(default)]
    pub useful_links: Vec<Link>,
}

// ---------------------------------------------------------------------------
// Updates and comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectUpdate {
    pub id: DbId,
    pub application_id: DbId,
    pub student_id: DbId,
    pub worked_on: String,
    pub progress_pct: i32,
    pub blockers: Option<String>,
    pub next_steps: Vec<String>,
    pub links: Json<Vec<Link>>,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectUpdate {
    pub worked_on: String,
    pub progress_pct: i32,
    pub blockers: Option<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectComment {
    pub id: DbId,
    pub update_id: DbId,
    pub author_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Review and reflection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectReview {
    pub id: DbId,
    pub application_id: DbId,
    pub reliability_rating: i16,
    pub communication_rating: i16,
    pub initiative_rating: i16,
    pub quality_rating: i16,
    pub impact_rating: i16,
    pub review_note: String,
    pub deliverables_completed: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectReview {
    pub reliability_rating: i16,
    pub communication_rating: i16,
    pub initiative_rating: i16,
    pub quality_rating: i16,
    pub impact_rating: i16,
    pub review_note: String,
    #[serde(default)]
    pub deliverables_completed: bool,
}

impl CreateProjectReview {
    pub fn ratings(&self) -> [i16; 5] {
        [
            self.reliability_rating,
            self.communication_rating,
            self.initiative_rating,
            self.quality_rating,
            self.impact_rating,
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectReflection {
    pub id: DbId,
    pub application_id: DbId,
    pub student_id: DbId,
    pub reflection_points: Vec<String>,
    pub reflection_links: Json<Vec<Link>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct UpsertReflection {
    pub reflection_points: Vec<String>,
    #[serde(default)]
    pub reflection_links: Vec<Link>,
}

/// One row of an engagement list: an accepted application with its
/// project, both parties, the overview's dates, and the latest update.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EngagementSummary {
    pub id: DbId,
    pub project_id: DbId,
    pub project_title: String,
    pub company_name: Option<String>,
    pub student_id: DbId,
    pub student_name: String,
    pub student_email: String,
    pub engagement_status: String,
    pub submitted_at: Timestamp,
    pub invited_at: Option<Timestamp>,
    pub accepted_at: Option<Timestamp>,
    pub last_update_at: Option<Timestamp>,
    pub scope: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    /// The overview's meeting link, else the interview link.
    pub meeting_link: Option<String>,
}

impl EngagementSummary {
    pub fn engagement_status(&self) -> Result<EngagementStatus, CoreError> {
        self.engagement_status.parse()
    }
}
