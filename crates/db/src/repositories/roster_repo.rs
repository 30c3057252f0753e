//! Repository for the `roster_participants` table.

use sqlx::PgPool;

use crate::models::roster::{RosterParticipant, UpsertRosterParticipant};

const COLUMNS: &str = "email, name, program, cohort_year, created_at";

pub struct RosterRepo;

impl RosterRepo {
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<RosterParticipant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roster_participants WHERE email = $1");
        sqlx::query_as::<_, RosterParticipant>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Insert or refresh a roster row. `input.email` must already be normalized.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertRosterParticipant,
    ) -> Result<RosterParticipant, sqlx::Error> {
        let query = format!(
            "INSERT INTO roster_participants (email, name, program, cohort_year)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                program = EXCLUDED.program,
                cohort_year = EXCLUDED.cohort_year
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RosterParticipant>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.program)
            .bind(input.cohort_year)
            .fetch_one(pool)
            .await
    }
}
