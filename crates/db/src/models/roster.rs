//! Institutional roster participants.

use g1000_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RosterParticipant {
    pub email: String,
    pub name: String,
    pub program: Option<String>,
    pub cohort_year: Option<i32>,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct UpsertRosterParticipant {
    pub email: String,
    pub name: String,
    pub program: Option<String>,
    pub cohort_year: Option<i32>,
}
