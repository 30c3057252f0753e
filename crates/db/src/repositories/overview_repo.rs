//! Repository for the `project_overviews` table.

use g1000_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::engagement::{ProjectOverview, UpsertOverview};

const COLUMNS: &str = "id, application_id, scope, deliverables, start_date, target_end_date, \
                       meeting_link, owner_contact_name, owner_contact_email, useful_links, \
                       created_at, updated_at";

pub struct OverviewRepo;

impl OverviewRepo {
    /// Create or replace the single overview of an application.
    pub async fn upsert(
        pool: &PgPool,
        application_id: DbId,
        input: &UpsertOverview,
    ) -> Result<ProjectOverview, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_overviews
                (application_id, scope, deliverables, start_date, target_end_date,
                 meeting_link, owner_contact_name, owner_contact_email, useful_links)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (application_id) DO UPDATE SET
                scope = EXCLUDED.scope,
                deliverables = EXCLUDED.deliverables,
                start_date = EXCLUDED.start_date,
                target_end_date = EXCLUDED.target_end_date,
                meeting_link = EXCLUDED.meeting_link,
                owner_contact_name = EXCLUDED.owner_contact_name,
                owner_contact_email = EXCLUDED.owner_contact_email,
                useful_links = EXCLUDED.useful_links
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectOverview>(&query)
            .bind(application_id)
            .bind(&input.scope)
            .bind(&input.deliverables)
            .bind(input.start_date)
            .bind(input.target_end_date)
            .bind(&input.meeting_link)
            .bind(&input.owner_contact_name)
            .bind(&input.owner_contact_email)
            .bind(Json(&input.useful_links))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Option<ProjectOverview>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_overviews WHERE application_id = $1");
        sqlx::query_as::<_, ProjectOverview>(&query)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }
}
