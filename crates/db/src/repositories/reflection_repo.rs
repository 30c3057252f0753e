//! Repository for the `project_reflections` table.

use g1000_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::engagement::{ProjectReflection, UpsertReflection};

const COLUMNS: &str = "id, application_id, student_id, reflection_points, reflection_links, \
                       created_at, updated_at";

pub struct ReflectionRepo;

impl ReflectionRepo {
    /// Create the reflection, or replace its points and links.
    pub async fn upsert(
        pool: &PgPool,
        application_id: DbId,
        student_id: DbId,
        input: &UpsertReflection,
    ) -> Result<ProjectReflection, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_reflections
                (application_id, student_id, reflection_points, reflection_links)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (application_id) DO UPDATE SET
                reflection_points = EXCLUDED.reflection_points,
                reflection_links = EXCLUDED.reflection_links
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectReflection>(&query)
            .bind(application_id)
            .bind(student_id)
            .bind(&input.reflection_points)
            .bind(Json(&input.reflection_links))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Option<ProjectReflection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_reflections WHERE application_id = $1");
        sqlx::query_as::<_, ProjectReflection>(&query)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }
}
