//! Repository for the `identities` table.

use g1000_core::types::DbId;
use sqlx::PgPool;

use crate::models::identity::{CreateIdentity, Identity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, display_name, role, password_hash, has_password, \
                       created_at, updated_at";

/// Provides lookup and credential operations for identities.
pub struct IdentityRepo;

impl IdentityRepo {
    /// Insert a new identity.
    ///
    /// Returns `None` when the email is already taken, so concurrent
    /// first-time verifications resolve to a single row without surfacing
    /// a unique violation.
    pub async fn create(
        pool: &PgPool,
        input: &CreateIdentity,
    ) -> Result<Option<Identity>, sqlx::Error> {
        let query = format!(
            "INSERT INTO identities (email, display_name, role, password_hash, has_password)
             VALUES ($1, $2, $3, $4, $4 IS NOT NULL)
             ON CONFLICT (email) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Identity>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(input.role.as_str())
            .bind(&input.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Create the identity if missing, otherwise return the existing row.
    pub async fn find_or_create(
        pool: &PgPool,
        input: &CreateIdentity,
    ) -> Result<Identity, sqlx::Error> {
        if let Some(created) = Self::create(pool, input).await? {
            return Ok(created);
        }
        Self::find_by_email(pool, &input.email)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Identity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM identities WHERE id = $1");
        sqlx::query_as::<_, Identity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an identity by normalized email.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Identity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM identities WHERE email = $1");
        sqlx::query_as::<_, Identity>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Store a new password hash. Returns `true` if the row was updated.
    pub async fn set_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE identities SET password_hash = $2, has_password = true WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete an identity. Used to roll back a half-finished registration.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
