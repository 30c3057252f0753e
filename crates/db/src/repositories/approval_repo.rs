//! Repository for the `approval_entries` allow-list.

use g1000_core::types::DbId;
use sqlx::PgPool;

use crate::models::approval::{ApprovalEntry, CreateApprovalEntry};

const COLUMNS: &str = "id, email, company_name, is_active, created_at, updated_at";

pub struct ApprovalRepo;

impl ApprovalRepo {
    /// Add an email to the allow-list, re-activating it if it was revoked.
    pub async fn upsert(
        pool: &PgPool,
        input: &CreateApprovalEntry,
    ) -> Result<ApprovalEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO approval_entries (email, company_name)
             VALUES ($1, $2)
             ON CONFLICT (email) DO UPDATE SET
                is_active = true,
                company_name = COALESCE(EXCLUDED.company_name, approval_entries.company_name)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(&input.email)
            .bind(&input.company_name)
            .fetch_one(pool)
            .await
    }

    /// Find the active entry for an email, if any.
    pub async fn find_active_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<ApprovalEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM approval_entries WHERE email = $1 AND is_active = true");
        sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ApprovalEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM approval_entries ORDER BY created_at DESC");
        sqlx::query_as::<_, ApprovalEntry>(&query)
            .fetch_all(pool)
            .await
    }

    /// Returns `None` if no entry with the given `id` exists.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<ApprovalEntry>, sqlx::Error> {
        let query =
            format!("UPDATE approval_entries SET is_active = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ApprovalEntry>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }
}
