//! Engagement sub-ledger handlers, mounted for both parties at
//! `/business/engagements/{id}` and `/student/engagements/{id}`.
//!
//! Every operation resolves the application with the caller as a party in
//! one query (a miss is `NotFound`), then requires `status == accepted`.
//! Once the review is in, the engagement is `completed`: the overview and
//! updates freeze, comments and the reflection stay open.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use g1000_core::engagement::{
    can_delete_comment, next_update_due, validate_comment, validate_overview,
    validate_reflection, validate_review, validate_update, Party,
};
use g1000_core::error::CoreError;
use g1000_core::lifecycle::{ApplicationStatus, EngagementStatus};
use g1000_core::types::{DbId, Timestamp};
use g1000_db::models::application::{Application, ApplicationParties};
use g1000_db::models::engagement::{
    CreateProjectReview, CreateProjectUpdate, EngagementSummary, ProjectComment, ProjectOverview,
    ProjectReflection, ProjectReview, ProjectUpdate, UpsertOverview, UpsertReflection,
};
use g1000_db::repositories::{
    ApplicationRepo, CommentRepo, OverviewRepo, ReflectionRepo, ReviewRepo, UpdateRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireApprovedOwner, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateWithComments {
    #[serde(flatten)]
    pub update: ProjectUpdate,
    pub comments: Vec<ProjectComment>,
}

/// An engagement list row with the next weekly update deadline.
#[derive(Debug, Serialize)]
pub struct EngagementListItem {
    #[serde(flatten)]
    pub summary: EngagementSummary,
    pub next_update_due: Option<Timestamp>,
}

fn with_due_dates(rows: Vec<EngagementSummary>) -> AppResult<Vec<EngagementListItem>> {
    rows.into_iter()
        .map(|summary| -> AppResult<EngagementListItem> {
            let next_update_due = next_update_due(
                summary.engagement_status()?,
                summary.last_update_at,
                summary.invited_at,
                summary.submitted_at,
            );
            Ok(EngagementListItem {
                summary,
                next_update_due,
            })
        })
        .collect()
}

/// Everything attached to one accepted application.
#[derive(Debug, Serialize)]
pub struct EngagementView {
    /// The caller's side of the engagement.
    pub party: Party,
    pub application: Application,
    pub overview: Option<ProjectOverview>,
    pub updates: Vec<UpdateWithComments>,
    pub review: Option<ProjectReview>,
    pub reflection: Option<ProjectReflection>,
}

// ---------------------------------------------------------------------------
// Party resolution
// ---------------------------------------------------------------------------

/// Load the application with `user` as `party` and apply the accepted gate.
async fn resolve(
    state: &AppState,
    party: Party,
    user: &AuthUser,
    application_id: DbId,
) -> AppResult<ApplicationParties> {
    let found = match party {
        Party::Owner => {
            ApplicationRepo::find_parties_for_owner(&state.pool, application_id, user.user_id)
                .await?
        }
        Party::Student => {
            ApplicationRepo::find_parties_for_student(&state.pool, application_id, user.user_id)
                .await?
        }
    };
    let parties = found.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Engagement",
        id: application_id,
    }))?;

    if parties.application.status()? != ApplicationStatus::Accepted {
        return Err(AppError::Core(CoreError::InvalidState(
            "The engagement is only available once the application is accepted".into(),
        )));
    }
    Ok(parties)
}

fn require_active(application: &Application) -> AppResult<()> {
    if application.engagement_status()? == EngagementStatus::Completed {
        return Err(AppError::Core(CoreError::InvalidState(
            "The engagement is completed".into(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared operations
// ---------------------------------------------------------------------------

async fn view(
    state: &AppState,
    party: Party,
    user: &AuthUser,
    application_id: DbId,
) -> AppResult<EngagementView> {
    let parties = resolve(state, party, user, application_id).await?;
    let id = parties.application.id;

    let overview = OverviewRepo::find_by_application(&state.pool, id).await?;
    let updates = UpdateRepo::list_by_application(&state.pool, id).await?;
    let comments = CommentRepo::list_by_application(&state.pool, id).await?;
    let review = ReviewRepo::find_by_application(&state.pool, id).await?;
    let reflection = ReflectionRepo::find_by_application(&state.pool, id).await?;

    let mut by_update: HashMap<DbId, Vec<ProjectComment>> = HashMap::new();
    for comment in comments {
        by_update.entry(comment.update_id).or_default().push(comment);
    }
    let updates = updates
        .into_iter()
        .map(|update| UpdateWithComments {
            comments: by_update.remove(&update.id).unwrap_or_default(),
            update,
        })
        .collect();

    Ok(EngagementView {
        party,
        application: parties.application,
        overview,
        updates,
        review,
        reflection,
    })
}

async fn post_comment(
    state: &AppState,
    party: Party,
    user: &AuthUser,
    application_id: DbId,
    update_id: DbId,
    input: CommentRequest,
) -> AppResult<ProjectComment> {
    let parties = resolve(state, party, user, application_id).await?;
    UpdateRepo::find_in_application(&state.pool, update_id, parties.application.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectUpdate",
            id: update_id,
        }))?;

    let body = input.body.trim();
    validate_comment(body)?;
    let comment = CommentRepo::create(&state.pool, update_id, user.user_id, body).await?;
    Ok(comment)
}

async fn delete_comment(
    state: &AppState,
    party: Party,
    user: &AuthUser,
    application_id: DbId,
    comment_id: DbId,
) -> AppResult<StatusCode> {
    let parties = resolve(state, party, user, application_id).await?;
    let comment = CommentRepo::find_in_application(&state.pool, comment_id, parties.application.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectComment",
            id: comment_id,
        }))?;

    if !can_delete_comment(party, user.user_id, comment.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or the project owner can delete this comment".into(),
        )));
    }

    // A concurrent delete already did the work.
    CommentRepo::delete(&state.pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Owner handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/business/engagements
pub async fn owner_list(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EngagementListItem>>>> {
    let rows = ApplicationRepo::list_engagements_for_owner(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: with_due_dates(rows)?,
    }))
}

/// GET /api/v1/business/engagements/{id}
pub async fn owner_view(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EngagementView>>> {
    let data = view(&state, Party::Owner, &user, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/business/engagements/{id}/overview
pub async fn upsert_overview(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpsertOverview>,
) -> AppResult<Json<DataResponse<ProjectOverview>>> {
    let parties = resolve(&state, Party::Owner, &user, id).await?;
    require_active(&parties.application)?;
    validate_overview(input.scope.as_deref())?;

    let overview = OverviewRepo::upsert(&state.pool, parties.application.id, &input).await?;
    Ok(Json(DataResponse { data: overview }))
}

/// POST /api/v1/business/engagements/{id}/review
///
/// Submits the single final review and completes the engagement.
pub async fn submit_review(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<CreateProjectReview>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectReview>>)> {
    let parties = resolve(&state, Party::Owner, &user, id).await?;
    let application_id = parties.application.id;

    if ReviewRepo::exists(&state.pool, application_id).await? {
        return Err(AppError::Core(CoreError::AlreadyReviewed));
    }
    validate_review(input.ratings(), &input.review_note)?;

    let review = ReviewRepo::create_and_complete(&state.pool, application_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::AlreadyReviewed))?;

    tracing::info!(application_id, "Engagement reviewed and completed");
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// POST /api/v1/business/engagements/{id}/updates/{update_id}/comments
pub async fn owner_comment(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((id, update_id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectComment>>)> {
    let comment = post_comment(&state, Party::Owner, &user, id, update_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// DELETE /api/v1/business/engagements/{id}/comments/{comment_id}
pub async fn owner_delete_comment(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    delete_comment(&state, Party::Owner, &user, id, comment_id).await
}

// ---------------------------------------------------------------------------
// Student handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/student/engagements
pub async fn student_list(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EngagementListItem>>>> {
    let rows = ApplicationRepo::list_engagements_for_student(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: with_due_dates(rows)?,
    }))
}

/// GET /api/v1/student/engagements/{id}
pub async fn student_view(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EngagementView>>> {
    let data = view(&state, Party::Student, &user, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/student/engagements/{id}/updates
pub async fn post_update(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<CreateProjectUpdate>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectUpdate>>)> {
    let parties = resolve(&state, Party::Student, &user, id).await?;
    require_active(&parties.application)?;

    input.worked_on = input.worked_on.trim().to_string();
    input.blockers = input
        .blockers
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty());
    validate_update(
        &input.worked_on,
        input.progress_pct,
        input.blockers.as_deref(),
        &input.next_steps,
        &input.links,
    )?;

    let update =
        UpdateRepo::create(&state.pool, parties.application.id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: update })))
}

/// POST /api/v1/student/engagements/{id}/updates/{update_id}/comments
pub async fn student_comment(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    Path((id, update_id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectComment>>)> {
    let comment = post_comment(&state, Party::Student, &user, id, update_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// DELETE /api/v1/student/engagements/{id}/comments/{comment_id}
pub async fn student_delete_comment(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    delete_comment(&state, Party::Student, &user, id, comment_id).await
}

/// POST /api/v1/student/engagements/{id}/reflection
///
/// Create or replace the student's closing reflection. Requires the review.
pub async fn submit_reflection(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<UpsertReflection>,
) -> AppResult<Json<DataResponse<ProjectReflection>>> {
    let parties = resolve(&state, Party::Student, &user, id).await?;
    let application_id = parties.application.id;

    if !ReviewRepo::exists(&state.pool, application_id).await? {
        return Err(AppError::Core(CoreError::ReviewRequired));
    }

    input.reflection_points = input
        .reflection_points
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    validate_reflection(&input.reflection_points, &input.reflection_links)?;

    let reflection =
        ReflectionRepo::upsert(&state.pool, application_id, user.user_id, &input).await?;
    Ok(Json(DataResponse { data: reflection }))
}
