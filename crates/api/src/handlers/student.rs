//! Student-side application handlers under `/student`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use g1000_core::error::CoreError;
use g1000_core::lifecycle::{check_apply_window, next_status, LifecycleAction};
use g1000_core::types::DbId;
use g1000_db::models::application::{
    Application, CreateApplication, StudentApplicationView, StudentStats,
};
use g1000_db::repositories::{ApplicationRepo, IdentityRepo, ProjectRepo};
use g1000_events::messages;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireStudent;
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub cover_note: String,
    pub proof_of_work_url: String,
}

/// POST /api/v1/student/opportunities/{id}/apply
///
/// Submit an application. The window check uses the server clock; the
/// unique constraint settles concurrent duplicates.
pub async fn apply(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<ApplyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Application>>)> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let now = Utc::now();
    check_apply_window(
        project.is_open(),
        project.apply_window_start,
        project.apply_window_end,
        now,
    )?;

    let cover_note = input.cover_note.trim();
    let proof_of_work_url = input.proof_of_work_url.trim();
    if cover_note.is_empty() {
        return Err(CoreError::InvalidInput("Cover note is required".into()).into());
    }
    if proof_of_work_url.is_empty() {
        return Err(CoreError::InvalidInput("Proof-of-work link is required".into()).into());
    }

    let application = ApplicationRepo::create(
        &state.pool,
        &CreateApplication {
            project_id: project.id,
            student_id: user.user_id,
            cover_note: cover_note.to_string(),
            proof_of_work_url: proof_of_work_url.to_string(),
            submitted_at: now,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::DuplicateApplication))?;

    tracing::info!(
        application_id = application.id,
        project_id = project.id,
        student_id = user.user_id,
        "Application submitted",
    );

    let student_name = match IdentityRepo::find_by_id(&state.pool, user.user_id).await {
        Ok(Some(identity)) => identity.display_name,
        _ => user.email.clone(),
    };
    notify::send_to_identity(&state, project.owner_id, |to| {
        messages::new_application(to, &project.title, &student_name)
    })
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/student/applications
pub async fn list_applications(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<StudentApplicationView>>>> {
    let applications = ApplicationRepo::list_for_student(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: applications }))
}

/// GET /api/v1/student/stats
pub async fn stats(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<StudentStats>>> {
    let stats = ApplicationRepo::stats_for_student(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/student/applications/{id}/withdraw
pub async fn withdraw(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Application>>> {
    let application = ApplicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Application",
            id,
        }))?;
    if application.student_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only withdraw your own applications".into(),
        )));
    }

    let from = application.status()?;
    let to = next_status(from, LifecycleAction::Withdraw)?;
    let updated = ApplicationRepo::transition(&state.pool, id, from, to)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Application status changed concurrently; reload and retry".into(),
            ))
        })?;

    tracing::info!(application_id = id, "Application withdrawn");
    Ok(Json(DataResponse { data: updated }))
}
