//! Project (opportunity) model and DTOs.

use g1000_core::error::CoreError;
use g1000_core::project::ProjectStatus;
use g1000_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub compensation: Option<String>,
    pub required_skills: Vec<String>,
    pub apply_window_start: Timestamp,
    pub apply_window_end: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn status(&self) -> Result<ProjectStatus, CoreError> {
        self.status
            .parse::<ProjectStatus>()
            .map_err(|_| CoreError::Internal(format!("Unknown project status '{}'", self.status)))
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status(), Ok(ProjectStatus::Open))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
    pub compensation: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub apply_window_start: Timestamp,
    pub apply_window_end: Timestamp,
}

/// DTO for editing a project. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub compensation: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub apply_window_start: Option<Timestamp>,
    pub apply_window_end: Option<Timestamp>,
}
