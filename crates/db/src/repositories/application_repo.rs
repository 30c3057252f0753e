//! Repository for the `applications` table.
//!
//! Every status change is a compare-and-swap on the status the caller
//! observed: a concurrent change makes the update match zero rows and the
//! method returns `None`.

use g1000_core::lifecycle::{ApplicationStatus, EngagementStatus, AUTO_REJECT_NOTE};
use g1000_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::application::{
    ApplicantView, Application, ApplicationParties, CreateApplication, StudentApplicationView,
    StudentStats,
};
use crate::models::engagement::EngagementSummary;

const COLUMNS: &str = "id, project_id, student_id, cover_note, proof_of_work_url, status, \
                       engagement_status, owner_note, submitted_at, invited_at, rejected_at, \
                       accepted_at, meeting_date_time, meeting_link, created_at, updated_at";

/// Same columns qualified with the `a` alias for joins.
const A_COLUMNS: &str = "a.id, a.project_id, a.student_id, a.cover_note, a.proof_of_work_url, \
                         a.status, a.engagement_status, a.owner_note, a.submitted_at, \
                         a.invited_at, a.rejected_at, a.accepted_at, a.meeting_date_time, \
                         a.meeting_link, a.created_at, a.updated_at";

/// Engagement list rows; callers append the party filter.
const ENGAGEMENT_SUMMARY: &str =
    "SELECT a.id, a.project_id, p.title AS project_title, bp.company_name,
            a.student_id, i.display_name AS student_name, i.email AS student_email,
            a.engagement_status, a.submitted_at, a.invited_at, a.accepted_at,
            (SELECT MAX(u.created_at) FROM project_updates u
             WHERE u.application_id = a.id) AS last_update_at,
            o.scope, o.start_date, o.target_end_date,
            COALESCE(o.meeting_link, a.meeting_link) AS meeting_link
     FROM applications a
     JOIN projects p ON p.id = a.project_id
     JOIN identities i ON i.id = a.student_id
     LEFT JOIN business_profiles bp ON bp.user_id = p.owner_id
     LEFT JOIN project_overviews o ON o.application_id = a.id
     WHERE a.status = $1";

/// Result of a successful accept.
#[derive(Debug)]
pub struct AcceptOutcome {
    pub accepted: Application,
    /// Other pending applications on the same project, now rejected.
    pub auto_rejected: Vec<Application>,
}

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a `submitted` application.
    ///
    /// Returns `None` when the student already applied to the project; the
    /// unique constraint decides, so concurrent duplicates yield one row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications
                (project_id, student_id, cover_note, proof_of_work_url, status, submitted_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT ON CONSTRAINT uq_applications_project_student DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(input.project_id)
            .bind(input.student_id)
            .bind(&input.cover_note)
            .bind(&input.proof_of_work_url)
            .bind(ApplicationStatus::Submitted.as_str())
            .bind(input.submitted_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an application on `project_id` only if `owner_id` owns that project.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {A_COLUMNS} FROM applications a
             JOIN projects p ON p.id = a.project_id
             WHERE a.id = $1 AND a.project_id = $2 AND p.owner_id = $3"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(project_id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Load an application with its project owner, visible only to that owner.
    pub async fn find_parties_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<ApplicationParties>, sqlx::Error> {
        let query = format!(
            "SELECT {A_COLUMNS}, p.owner_id FROM applications a
             JOIN projects p ON p.id = a.project_id
             WHERE a.id = $1 AND p.owner_id = $2"
        );
        sqlx::query_as::<_, ApplicationParties>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Load an application with its project owner, visible only to the applicant.
    pub async fn find_parties_for_student(
        pool: &PgPool,
        id: DbId,
        student_id: DbId,
    ) -> Result<Option<ApplicationParties>, sqlx::Error> {
        let query = format!(
            "SELECT {A_COLUMNS}, p.owner_id FROM applications a
             JOIN projects p ON p.id = a.project_id
             WHERE a.id = $1 AND a.student_id = $2"
        );
        sqlx::query_as::<_, ApplicationParties>(&query)
            .bind(id)
            .bind(student_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<StudentApplicationView>, sqlx::Error> {
        sqlx::query_as::<_, StudentApplicationView>(
            "SELECT a.id, a.project_id, p.title AS project_title, bp.company_name,
                    a.status, a.engagement_status, a.owner_note, a.submitted_at,
                    a.meeting_date_time, a.meeting_link
             FROM applications a
             JOIN projects p ON p.id = a.project_id
             LEFT JOIN business_profiles bp ON bp.user_id = p.owner_id
             WHERE a.student_id = $1
             ORDER BY a.submitted_at DESC, a.id DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }

    /// The student's own application to a project, if any.
    pub async fn find_for_student_on_project(
        pool: &PgPool,
        project_id: DbId,
        student_id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications WHERE project_id = $1 AND student_id = $2"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(project_id)
            .bind(student_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `student_id` has applied to any project owned by `owner_id`.
    pub async fn has_applied_to_owner(
        pool: &PgPool,
        student_id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM applications a
                JOIN projects p ON p.id = a.project_id
                WHERE a.student_id = $1 AND p.owner_id = $2
             )",
        )
        .bind(student_id)
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    pub async fn stats_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<StudentStats, sqlx::Error> {
        sqlx::query_as::<_, StudentStats>(
            "SELECT COUNT(*) AS applications_submitted,
                    COUNT(*) FILTER (WHERE status = $2) AS interviews_scheduled,
                    COUNT(*) FILTER (WHERE status = $3) AS projects_accepted,
                    COUNT(*) FILTER (WHERE status = $3 AND engagement_status = $4)
                        AS projects_completed
             FROM applications
             WHERE student_id = $1",
        )
        .bind(student_id)
        .bind(ApplicationStatus::InterviewScheduled.as_str())
        .bind(ApplicationStatus::Accepted.as_str())
        .bind(EngagementStatus::Completed.as_str())
        .fetch_one(pool)
        .await
    }

    /// Accepted applications on the owner's projects, newest first.
    pub async fn list_engagements_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<EngagementSummary>, sqlx::Error> {
        let query = format!(
            "{ENGAGEMENT_SUMMARY} AND p.owner_id = $2
             ORDER BY a.accepted_at DESC NULLS LAST, a.id DESC"
        );
        sqlx::query_as::<_, EngagementSummary>(&query)
            .bind(ApplicationStatus::Accepted.as_str())
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// The student's accepted applications, newest first.
    pub async fn list_engagements_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<EngagementSummary>, sqlx::Error> {
        let query = format!(
            "{ENGAGEMENT_SUMMARY} AND a.student_id = $2
             ORDER BY a.accepted_at DESC NULLS LAST, a.id DESC"
        );
        sqlx::query_as::<_, EngagementSummary>(&query)
            .bind(ApplicationStatus::Accepted.as_str())
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Applicants for a project. The caller must already have checked ownership.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ApplicantView>, sqlx::Error> {
        sqlx::query_as::<_, ApplicantView>(
            "SELECT a.id, a.student_id, i.display_name AS student_name, i.email AS student_email,
                    a.cover_note, a.proof_of_work_url, a.status, a.engagement_status,
                    a.owner_note, a.submitted_at, a.meeting_date_time, a.meeting_link
             FROM applications a
             JOIN identities i ON i.id = a.student_id
             WHERE a.project_id = $1
             ORDER BY a.submitted_at ASC, a.id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Plain status change with no side columns (mark under review, withdraw).
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move to `interviewScheduled`, stamping `invited_at`. Also used to
    /// reschedule; a `None` link keeps the current one.
    pub async fn schedule_interview(
        pool: &PgPool,
        id: DbId,
        from: ApplicationStatus,
        meeting_date_time: Timestamp,
        meeting_link: Option<&str>,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET
                status = $3,
                meeting_date_time = $4,
                meeting_link = COALESCE($5, meeting_link),
                invited_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(ApplicationStatus::InterviewScheduled.as_str())
            .bind(meeting_date_time)
            .bind(meeting_link)
            .fetch_optional(pool)
            .await
    }

    /// Set the meeting link while the interview is scheduled.
    pub async fn set_meeting_link(
        pool: &PgPool,
        id: DbId,
        meeting_link: &str,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET meeting_link = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::InterviewScheduled.as_str())
            .bind(meeting_link)
            .fetch_optional(pool)
            .await
    }

    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        from: ApplicationStatus,
        owner_note: Option<&str>,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status = $3, rejected_at = NOW(), owner_note = $4
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(ApplicationStatus::Rejected.as_str())
            .bind(owner_note)
            .fetch_optional(pool)
            .await
    }

    /// Back from `rejected` to `underReview`, clearing the rejection stamp and note.
    pub async fn undo_reject(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status = $3, rejected_at = NULL, owner_note = NULL
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::Rejected.as_str())
            .bind(ApplicationStatus::UnderReview.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Accept an application in one transaction: the application becomes
    /// `accepted`, its project is closed, and every other pending
    /// application on the project is rejected with [`AUTO_REJECT_NOTE`].
    ///
    /// Returns `None` (and changes nothing) if the status moved away from
    /// `from` in the meantime.
    pub async fn accept(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        from: ApplicationStatus,
    ) -> Result<Option<AcceptOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE applications SET status = $3, accepted_at = NOW(), engagement_status = $4
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        let accepted = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(ApplicationStatus::Accepted.as_str())
            .bind(EngagementStatus::Active.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(accepted) = accepted else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE projects SET status = 'closed' WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        let pending: Vec<&str> = ApplicationStatus::PENDING
            .iter()
            .map(|s| s.as_str())
            .collect();
        let query = format!(
            "UPDATE applications SET status = $3, rejected_at = NOW(), owner_note = $4
             WHERE project_id = $1 AND id <> $2 AND status = ANY($5)
             RETURNING {COLUMNS}"
        );
        let auto_rejected = sqlx::query_as::<_, Application>(&query)
            .bind(project_id)
            .bind(id)
            .bind(ApplicationStatus::Rejected.as_str())
            .bind(AUTO_REJECT_NOTE)
            .bind(&pending)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(AcceptOutcome {
            accepted,
            auto_rejected,
        }))
    }
}
