//! Repository for the `project_reviews` table.

use g1000_core::lifecycle::EngagementStatus;
use g1000_core::types::DbId;
use sqlx::PgPool;

use crate::models::engagement::{CreateProjectReview, ProjectReview};

const COLUMNS: &str = "id, application_id, reliability_rating, communication_rating, \
                       initiative_rating, quality_rating, impact_rating, review_note, \
                       deliverables_completed, created_at";

pub struct ReviewRepo;

impl ReviewRepo {
    pub async fn find_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Option<ProjectReview>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_reviews WHERE application_id = $1");
        sqlx::query_as::<_, ProjectReview>(&query)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, application_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM project_reviews WHERE application_id = $1)",
        )
        .bind(application_id)
        .fetch_one(pool)
        .await
    }

    /// Insert the review and mark the engagement completed in one transaction.
    ///
    /// Returns `None` if a review already exists; of two concurrent calls
    /// exactly one inserts.
    pub async fn create_and_complete(
        pool: &PgPool,
        application_id: DbId,
        input: &CreateProjectReview,
    ) -> Result<Option<ProjectReview>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO project_reviews
                (application_id, reliability_rating, communication_rating, initiative_rating,
                 quality_rating, impact_rating, review_note, deliverables_completed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT ON CONSTRAINT uq_project_reviews_application DO NOTHING
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, ProjectReview>(&query)
            .bind(application_id)
            .bind(input.reliability_rating)
            .bind(input.communication_rating)
            .bind(input.initiative_rating)
            .bind(input.quality_rating)
            .bind(input.impact_rating)
            .bind(&input.review_note)
            .bind(input.deliverables_completed)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(review) = review else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE applications SET engagement_status = $2 WHERE id = $1")
            .bind(application_id)
            .bind(EngagementStatus::Completed.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(review))
    }
}
