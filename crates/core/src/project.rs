//! Project status values and field validation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum project title length.
pub const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Open,
    Closed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Open => "open",
            ProjectStatus::Closed => "closed",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(ProjectStatus::Open),
            "closed" => Ok(ProjectStatus::Closed),
            other => Err(CoreError::InvalidInput(format!(
                "Invalid project status '{other}'. Must be one of: open, closed"
            ))),
        }
    }
}

/// Validate a new project's title and application window.
pub fn validate_new_project(
    title: &str,
    apply_window_start: Timestamp,
    apply_window_end: Timestamp,
) -> Result<(), CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::InvalidInput("Title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::InvalidInput(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if apply_window_start >= apply_window_end {
        return Err(CoreError::InvalidInput(
            "Application window start must be before end date".into(),
        ));
    }
    Ok(())
}
