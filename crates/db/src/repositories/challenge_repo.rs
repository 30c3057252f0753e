//! Repository for the `verification_challenges` table.

use g1000_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::challenge::VerificationChallenge;

const COLUMNS: &str = "email, code_hash, expires_at, created_at";

/// One live challenge per email; issuing again replaces the previous one.
pub struct ChallengeRepo;

impl ChallengeRepo {
    /// Store a fresh challenge for `email`, overwriting any earlier one.
    pub async fn issue(
        pool: &PgPool,
        email: &str,
        code_hash: &str,
        expires_at: Timestamp,
    ) -> Result<VerificationChallenge, sqlx::Error> {
        let query = format!(
            "INSERT INTO verification_challenges (email, code_hash, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO UPDATE SET
                code_hash = EXCLUDED.code_hash,
                expires_at = EXCLUDED.expires_at,
                created_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationChallenge>(&query)
            .bind(email)
            .bind(code_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Atomically consume a matching, unexpired challenge.
    ///
    /// Returns `true` for exactly one caller when several race on the same
    /// code. On a miss, any expired challenge for the email is removed.
    pub async fn consume(pool: &PgPool, email: &str, code_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM verification_challenges
             WHERE email = $1 AND code_hash = $2 AND expires_at > NOW()",
        )
        .bind(email)
        .bind(code_hash)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        sqlx::query("DELETE FROM verification_challenges WHERE email = $1 AND expires_at <= NOW()")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(false)
    }

    /// Whether an unexpired challenge exists for `email`.
    pub async fn has_active(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM verification_challenges WHERE email = $1 AND expires_at > NOW()
             )",
        )
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// Delete every expired challenge. Returns the number of rows removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_challenges WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
