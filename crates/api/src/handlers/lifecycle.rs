//! Owner-side application lifecycle under
//! `/business/projects/{project_id}/applications`.
//!
//! Each action loads the application through the owner's project, computes
//! the target status with [`next_status`], and applies it as a
//! compare-and-swap on the status it read. A lost race surfaces as 409.
//! Notifications go out after the change commits.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use g1000_core::error::CoreError;
use g1000_core::lifecycle::{next_status, LifecycleAction, AUTO_REJECT_NOTE};
use g1000_core::types::DbId;
use g1000_db::models::application::{ApplicantView, Application};
use g1000_db::models::project::Project;
use g1000_db::repositories::{ApplicationRepo, ProjectRepo};
use g1000_events::messages;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireApprovedOwner;
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub meeting_date_time: Option<DateTime<Utc>>,
    pub meeting_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MeetingLinkRequest {
    pub meeting_link: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub owner_note: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the owner's project and one of its applications.
async fn load(
    state: &AppState,
    owner_id: DbId,
    project_id: DbId,
    application_id: DbId,
) -> AppResult<(Project, Application)> {
    let project = ProjectRepo::find_for_owner(&state.pool, project_id, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    let application =
        ApplicationRepo::find_for_owner(&state.pool, application_id, project_id, owner_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Application",
                id: application_id,
            }))?;
    Ok((project, application))
}

fn concurrent_change() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Application status changed concurrently; reload and retry".into(),
    ))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/business/projects/{project_id}/applications
pub async fn list_applicants(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ApplicantView>>>> {
    ProjectRepo::find_for_owner(&state.pool, project_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    let applicants = ApplicationRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: applicants }))
}

/// POST .../applications/{application_id}/mark-under-review
pub async fn mark_under_review(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((project_id, application_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Application>>> {
    let (_, application) = load(&state, user.user_id, project_id, application_id).await?;
    let from = application.status()?;
    let to = next_status(from, LifecycleAction::MarkUnderReview)?;

    let updated = ApplicationRepo::transition(&state.pool, application_id, from, to)
        .await?
        .ok_or_else(concurrent_change)?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST .../applications/{application_id}/invite
pub async fn invite(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((project_id, application_id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<InviteRequest>,
) -> AppResult<Json<DataResponse<Application>>> {
    let meeting_date_time = input.meeting_date_time.ok_or_else(|| {
        CoreError::InvalidInput("Meeting date and time is required".into())
    })?;
    let (project, application) = load(&state, user.user_id, project_id, application_id).await?;
    let from = application.status()?;
    next_status(from, LifecycleAction::ScheduleInterview)?;

    let meeting_link = non_blank(input.meeting_link.as_deref());
    let updated = ApplicationRepo::schedule_interview(
        &state.pool,
        application_id,
        from,
        meeting_date_time,
        meeting_link,
    )
    .await?
    .ok_or_else(concurrent_change)?;

    tracing::info!(application_id, project_id, "Interview scheduled");
    let link = updated.meeting_link.clone();
    notify::send_to_identity(&state, updated.student_id, |to| {
        messages::interview_invite(to, &project.title, meeting_date_time, link.as_deref())
    })
    .await;
    Ok(Json(DataResponse { data: updated }))
}

/// POST .../applications/{application_id}/reschedule
pub async fn reschedule(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((project_id, application_id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<InviteRequest>,
) -> AppResult<Json<DataResponse<Application>>> {
    let meeting_date_time = input.meeting_date_time.ok_or_else(|| {
        CoreError::InvalidInput("Meeting date and time is required".into())
    })?;
    let (project, application) = load(&state, user.user_id, project_id, application_id).await?;
    let from = application.status()?;
    next_status(from, LifecycleAction::Reschedule)?;

    let meeting_link = non_blank(input.meeting_link.as_deref());
    let updated = ApplicationRepo::schedule_interview(
        &state.pool,
        application_id,
        from,
        meeting_date_time,
        meeting_link,
    )
    .await?
    .ok_or_else(concurrent_change)?;

    let link = updated.meeting_link.clone();
    notify::send_to_identity(&state, updated.student_id, |to| {
        messages::interview_rescheduled(to, &project.title, meeting_date_time, link.as_deref())
    })
    .await;
    Ok(Json(DataResponse { data: updated }))
}

/// PUT .../applications/{application_id}/meeting-link
pub async fn set_meeting_link(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((project_id, application_id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<MeetingLinkRequest>,
) -> AppResult<Json<DataResponse<Application>>> {
    let meeting_link = input.meeting_link.trim();
    if meeting_link.is_empty() {
        return Err(CoreError::InvalidInput("Meeting link is required".into()).into());
    }
    load(&state, user.user_id, project_id, application_id).await?;

    let updated = ApplicationRepo::set_meeting_link(&state.pool, application_id, meeting_link)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "A meeting link can only be set while an interview is scheduled".into(),
            ))
        })?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST .../applications/{application_id}/reject
pub async fn reject(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((project_id, application_id)): Path<(DbId, DbId)>,
    input: Result<Option<Json<RejectRequest>>, JsonRejection>,
) -> AppResult<Json<DataResponse<Application>>> {
    // The body is optional; a malformed one is still rejected.
    let owner_note = input?.and_then(|Json(body)| body.owner_note);
    let (project, application) = load(&state, user.user_id, project_id, application_id).await?;
    let from = application.status()?;
    next_status(from, LifecycleAction::Reject)?;

    let owner_note = non_blank(owner_note.as_deref());
    let updated = ApplicationRepo::reject(&state.pool, application_id, from, owner_note)
        .await?
        .ok_or_else(concurrent_change)?;

    tracing::info!(application_id, project_id, "Application rejected");
    let note = updated.owner_note.clone();
    notify::send_to_identity(&state, updated.student_id, |to| {
        messages::rejection(to, &project.title, note.as_deref())
    })
    .await;
    Ok(Json(DataResponse { data: updated }))
}

/// POST .../applications/{application_id}/undo-reject
pub async fn undo_reject(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((project_id, application_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Application>>> {
    let (project, application) = load(&state, user.user_id, project_id, application_id).await?;
    next_status(application.status()?, LifecycleAction::UndoReject)?;

    let updated = ApplicationRepo::undo_reject(&state.pool, application_id)
        .await?
        .ok_or_else(concurrent_change)?;

    notify::send_to_identity(&state, updated.student_id, |to| {
        messages::rejection_reversed(to, &project.title)
    })
    .await;
    Ok(Json(DataResponse { data: updated }))
}

/// POST .../applications/{application_id}/accept
///
/// Accepts one applicant, closes the project, and rejects every other
/// pending applicant in the same transaction.
pub async fn accept(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((project_id, application_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Application>>> {
    let (project, application) = load(&state, user.user_id, project_id, application_id).await?;
    let from = application.status()?;
    next_status(from, LifecycleAction::Accept)?;

    let outcome = ApplicationRepo::accept(&state.pool, application_id, project_id, from)
        .await?
        .ok_or_else(concurrent_change)?;

    tracing::info!(
        application_id,
        project_id,
        auto_rejected = outcome.auto_rejected.len(),
        "Application accepted",
    );

    notify::send_to_identity(&state, outcome.accepted.student_id, |to| {
        messages::acceptance(to, &project.title)
    })
    .await;
    for other in &outcome.auto_rejected {
        notify::send_to_identity(&state, other.student_id, |to| {
            messages::rejection(to, &project.title, Some(AUTO_REJECT_NOTE))
        })
        .await;
    }

    Ok(Json(DataResponse {
        data: outcome.accepted,
    }))
}
