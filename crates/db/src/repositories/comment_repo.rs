//! Repository for the `project_comments` table.

use g1000_core::types::DbId;
use sqlx::PgPool;

use crate::models::engagement::ProjectComment;

const COLUMNS: &str = "id, update_id, author_id, body, created_at";
const C_COLUMNS: &str = "c.id, c.update_id, c.author_id, c.body, c.created_at";

pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &PgPool,
        update_id: DbId,
        author_id: DbId,
        body: &str,
    ) -> Result<ProjectComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_comments (update_id, author_id, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(update_id)
            .bind(author_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Find a comment only if it hangs off an update of `application_id`.
    pub async fn find_in_application(
        pool: &PgPool,
        id: DbId,
        application_id: DbId,
    ) -> Result<Option<ProjectComment>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS} FROM project_comments c
             JOIN project_updates u ON u.id = c.update_id
             WHERE c.id = $1 AND u.application_id = $2"
        );
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(id)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }

    /// All comments on all updates of an application, oldest first.
    pub async fn list_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<ProjectComment>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS} FROM project_comments c
             JOIN project_updates u ON u.id = c.update_id
             WHERE u.application_id = $1
             ORDER BY c.created_at ASC, c.id ASC"
        );
        sqlx::query_as::<_, ProjectComment>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
