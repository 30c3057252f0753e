//! Repository for the append-only `project_updates` table.

use g1000_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::engagement::{CreateProjectUpdate, ProjectUpdate};

const COLUMNS: &str = "id, application_id, student_id, worked_on, progress_pct, blockers, \
                       next_steps, links, created_at";

pub struct UpdateRepo;

impl UpdateRepo {
    pub async fn create(
        pool: &PgPool,
        application_id: DbId,
        student_id: DbId,
        input: &CreateProjectUpdate,
    ) -> Result<ProjectUpdate, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_updates
                (application_id, student_id, worked_on, progress_pct, blockers, next_steps, links)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectUpdate>(&query)
            .bind(application_id)
            .bind(student_id)
            .bind(&input.worked_on)
            .bind(input.progress_pct)
            .bind(&input.blockers)
            .bind(&input.next_steps)
            .bind(Json(&input.links))
            .fetch_one(pool)
            .await
    }

    /// Find an update only if it belongs to `application_id`.
    pub async fn find_in_application(
        pool: &PgPool,
        id: DbId,
        application_id: DbId,
    ) -> Result<Option<ProjectUpdate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_updates WHERE id = $1 AND application_id = $2"
        );
        sqlx::query_as::<_, ProjectUpdate>(&query)
            .bind(id)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }

    /// Oldest first.
    pub async fn list_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<ProjectUpdate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_updates
             WHERE application_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ProjectUpdate>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }
}
