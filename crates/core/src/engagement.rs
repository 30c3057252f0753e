//! Engagement ledger rules: input limits, review ratings, and who may do
//! what on an accepted application.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lifecycle::EngagementStatus;
use crate::types::{DbId, Timestamp};

/// Maximum length of free-text fields (work log, blockers, notes, comments).
pub const MAX_TEXT_LEN: usize = 2000;

/// Maximum number of next steps or links on an update.
pub const MAX_LIST_ITEMS: usize = 3;

/// Maximum number of reflection points.
pub const MAX_REFLECTION_POINTS: usize = 3;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Students post a progress update at least this often.
pub const UPDATE_CADENCE_DAYS: i64 = 7;

/// A titled hyperlink attached to updates, overviews, and reflections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub title: String,
    pub url: String,
}

/// The two parties of an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    /// The business identity that owns the project.
    Owner,
    /// The student who applied.
    Student,
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

fn validate_required_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(format!("{field} is required")));
    }
    validate_optional_text(field, value)
}

fn validate_optional_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::InvalidInput(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_list_len<T>(field: &str, items: &[T], max: usize) -> Result<(), CoreError> {
    if items.len() > max {
        return Err(CoreError::InvalidInput(format!(
            "{field} may contain at most {max} items"
        )));
    }
    Ok(())
}

/// Validate a student progress update.
pub fn validate_update(
    worked_on: &str,
    progress_pct: i32,
    blockers: Option<&str>,
    next_steps: &[String],
    links: &[Link],
) -> Result<(), CoreError> {
    validate_required_text("Work description", worked_on)?;
    if !(0..=100).contains(&progress_pct) {
        return Err(CoreError::InvalidInput(
            "Progress percentage must be between 0 and 100".into(),
        ));
    }
    if let Some(blockers) = blockers {
        validate_optional_text("Blockers", blockers)?;
    }
    validate_list_len("Next steps", next_steps, MAX_LIST_ITEMS)?;
    validate_list_len("Links", links, MAX_LIST_ITEMS)?;
    Ok(())
}

/// Validate comment text.
pub fn validate_comment(text: &str) -> Result<(), CoreError> {
    validate_required_text("Comment", text)
}

/// Validate the five review ratings and the review note.
pub fn validate_review(ratings: [i16; 5], note: &str) -> Result<(), CoreError> {
    if ratings
        .iter()
        .any(|r| !(MIN_RATING..=MAX_RATING).contains(r))
    {
        return Err(CoreError::InvalidInput(format!(
            "All ratings must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    validate_required_text("Review note", note)
}

/// Validate a closing reflection: one to three points, at most three links.
pub fn validate_reflection(points: &[String], links: &[Link]) -> Result<(), CoreError> {
    if points.iter().all(|p| p.trim().is_empty()) {
        return Err(CoreError::InvalidInput(
            "At least one reflection point is required".into(),
        ));
    }
    validate_list_len("Reflection points", points, MAX_REFLECTION_POINTS)?;
    for point in points {
        validate_optional_text("Reflection point", point)?;
    }
    validate_list_len("Links", links, MAX_LIST_ITEMS)?;
    Ok(())
}

/// Validate the free-text parts of a project overview.
pub fn validate_overview(scope: Option<&str>) -> Result<(), CoreError> {
    if let Some(scope) = scope {
        validate_optional_text("Scope", scope)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// A comment may be deleted by its author or by the project's owner.
pub fn can_delete_comment(party: Party, requester_id: DbId, author_id: DbId) -> bool {
    requester_id == author_id || party == Party::Owner
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// When the next progress update is due, or `None` once completed.
///
/// Counts from the latest update; before the first one, from the interview
/// invite, falling back to submission.
pub fn next_update_due(
    status: EngagementStatus,
    last_update_at: Option<Timestamp>,
    invited_at: Option<Timestamp>,
    submitted_at: Timestamp,
) -> Option<Timestamp> {
    if status == EngagementStatus::Completed {
        return None;
    }
    let anchor = last_update_at.or(invited_at).unwrap_or(submitted_at);
    Some(anchor + chrono::Duration::days(UPDATE_CADENCE_DAYS))
}
