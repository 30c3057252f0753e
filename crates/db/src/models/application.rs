//! Application model, list views, and DTOs.

use g1000_core::error::CoreError;
use g1000_core::lifecycle::{ApplicationStatus, EngagementStatus};
use g1000_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub project_id: DbId,
    pub student_id: DbId,
    pub cover_note: String,
    pub proof_of_work_url: String,
    pub status: String,
    pub engagement_status: String,
    /// Reason recorded by the owner on rejection; cleared on undo.
    pub owner_note: Option<String>,
    pub submitted_at: Timestamp,
    pub invited_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub accepted_at: Option<Timestamp>,
    pub meeting_date_time: Option<Timestamp>,
    pub meeting_link: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Application {
    pub fn status(&self) -> Result<ApplicationStatus, CoreError> {
        self.status.parse()
    }

    pub fn engagement_status(&self) -> Result<EngagementStatus, CoreError> {
        self.engagement_status.parse()
    }
}

/// An application together with the owner of the project it targets.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationParties {
    #[sqlx(flatten)]
    pub application: Application,
    pub owner_id: DbId,
}

/// Student-side list row: the application plus the opportunity it targets.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentApplicationView {
    pub id: DbId,
    pub project_id: DbId,
    pub project_title: String,
    pub company_name: Option<String>,
    pub status: String,
    pub engagement_status: String,
    pub owner_note: Option<String>,
    pub submitted_at: Timestamp,
    pub meeting_date_time: Option<Timestamp>,
    pub meeting_link: Option<String>,
}

/// Owner-side list row: the application plus the applicant's identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicantView {
    pub id: DbId,
    pub student_id: DbId,
    pub student_name: String,
    pub student_email: String,
    pub cover_note: String,
    pub proof_of_work_url: String,
    pub status: String,
    pub engagement_status: String,
    pub owner_note: Option<String>,
    pub submitted_at: Timestamp,
    pub meeting_date_time: Option<Timestamp>,
    pub meeting_link: Option<String>,
}

/// Application counts for one student.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct StudentStats {
    pub applications_submitted: i64,
    pub interviews_scheduled: i64,
    pub projects_accepted: i64,
    pub projects_completed: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateApplication {
    pub project_id: DbId,
    pub student_id: DbId,
    pub cover_note: String,
    pub proof_of_work_url: String,
    pub submitted_at: Timestamp,
}
