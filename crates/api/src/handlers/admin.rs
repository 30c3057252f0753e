//! Admin curation handlers under `/admin`: the business approval list,
//! business profile approval, and the student roster.
//!
//! All endpoints require the `admin` role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use g1000_core::error::CoreError;
use g1000_core::identity::{normalize_email, validate_email_format};
use g1000_core::types::DbId;
use g1000_db::models::approval::{ApprovalEntry, CreateApprovalEntry};
use g1000_db::models::business_profile::BusinessProfile;
use g1000_db::models::roster::{RosterParticipant, UpsertRosterParticipant};
use g1000_db::repositories::{ApprovalRepo, BusinessProfileRepo, RosterRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Approval entries
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/approval-entries
pub async fn list_approval_entries(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ApprovalEntry>>>> {
    let entries = ApprovalRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/admin/approval-entries
///
/// Adds the email, or re-activates a previously removed entry.
pub async fn add_approval_entry(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateApprovalEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<ApprovalEntry>>)> {
    input.email = normalize_email(&input.email);
    validate_email_format(&input.email)?;

    let entry = ApprovalRepo::upsert(&state.pool, &input).await?;
    tracing::info!(entry_id = entry.id, admin_id = admin.user_id, "Approval entry added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// DELETE /api/v1/admin/approval-entries/{id}
///
/// Deactivates the entry; the row is kept.
pub async fn deactivate_approval_entry(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ApprovalRepo::set_active(&state.pool, id, false)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ApprovalEntry",
            id,
        }))?;
    tracing::info!(entry_id = id, admin_id = admin.user_id, "Approval entry deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Business profiles
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/business-profiles
pub async fn list_business_profiles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<BusinessProfile>>>> {
    let profiles = BusinessProfileRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: profiles }))
}

async fn set_profile_approval(
    state: &AppState,
    admin_id: DbId,
    user_id: DbId,
    is_approved: bool,
) -> AppResult<BusinessProfile> {
    let profile = BusinessProfileRepo::set_approved(&state.pool, user_id, is_approved)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BusinessProfile",
            id: user_id,
        }))?;
    tracing::info!(user_id, admin_id, is_approved, "Business profile approval changed");
    Ok(profile)
}

/// POST /api/v1/admin/business-profiles/{user_id}/approve
pub async fn approve_business(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BusinessProfile>>> {
    let profile = set_profile_approval(&state, admin.user_id, user_id, true).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// POST /api/v1/admin/business-profiles/{user_id}/revoke
pub async fn revoke_business(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BusinessProfile>>> {
    let profile = set_profile_approval(&state, admin.user_id, user_id, false).await?;
    Ok(Json(DataResponse { data: profile }))
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/roster
pub async fn upsert_roster(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<UpsertRosterParticipant>,
) -> AppResult<Json<DataResponse<RosterParticipant>>> {
    input.email = normalize_email(&input.email);
    validate_email_format(&input.email)?;
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(CoreError::InvalidInput("Name is required".into()).into());
    }

    let participant = RosterRepo::upsert(&state.pool, &input).await?;
    Ok(Json(DataResponse { data: participant }))
}
