//! Repository for the `projects` table.

use g1000_core::project::ProjectStatus;
use g1000_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

const COLUMNS: &str = "id, owner_id, title, description, compensation, required_skills, \
                       apply_window_start, apply_window_end, status, created_at, updated_at";

pub struct ProjectRepo;

impl ProjectRepo {
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (owner_id, title, description, compensation, required_skills,
                 apply_window_start, apply_window_end)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.compensation)
            .bind(&input.required_skills)
            .bind(input.apply_window_start)
            .bind(input.apply_window_end)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project only if `owner_id` owns it; a foreign project is
    /// indistinguishable from a missing one.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Open projects whose application window contains `now`.
    pub async fn list_accepting(pool: &PgPool, now: Timestamp) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE status = 'open' AND apply_window_start <= $1 AND apply_window_end >= $1
             ORDER BY apply_window_end ASC, id ASC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Patch an owned project. Returns `None` for a missing or foreign project.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                compensation = COALESCE($5, compensation),
                required_skills = COALESCE($6, required_skills),
                apply_window_start = COALESCE($7, apply_window_start),
                apply_window_end = COALESCE($8, apply_window_end)
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.compensation)
            .bind(&input.required_skills)
            .bind(input.apply_window_start)
            .bind(input.apply_window_end)
            .fetch_optional(pool)
            .await
    }

    /// Open or close an owned project.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        status: ProjectStatus,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $3 WHERE id = $1 AND owner_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
