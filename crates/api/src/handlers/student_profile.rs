//! Student profiles: the student's own form at `/student/profile` and the
//! read-only view owners get of their applicants.

use axum::extract::{Path, State};
use axum::Json;
use g1000_core::error::CoreError;
use g1000_core::profile::{clean_list, non_blank, validate_student_profile, ProfileFields};
use g1000_core::types::DbId;
use g1000_db::models::identity::IdentityResponse;
use g1000_db::models::student_profile::{StudentProfile, UpsertStudentProfile};
use g1000_db::repositories::{ApplicationRepo, IdentityRepo, StudentProfileRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::{RequireApprovedOwner, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

/// A student identity with its profile, `null` until first saved.
#[derive(Debug, Serialize)]
pub struct StudentProfileView {
    pub user: IdentityResponse,
    pub profile: Option<StudentProfile>,
}

fn profile_not_found(student_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "StudentProfile",
        id: student_id,
    })
}

async fn load_view(state: &AppState, student_id: DbId) -> AppResult<StudentProfileView> {
    let identity = IdentityRepo::find_by_id(&state.pool, student_id)
        .await?
        .ok_or_else(|| profile_not_found(student_id))?;
    let profile = StudentProfileRepo::find_by_user(&state.pool, student_id).await?;
    Ok(StudentProfileView {
        user: IdentityResponse::from(&identity),
        profile,
    })
}

/// GET /api/v1/student/profile
pub async fn get_own(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<StudentProfileView>>> {
    let data = load_view(&state, user.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/student/profile
///
/// Replaces every editable field. Blank strings are stored as `null`.
pub async fn upsert_own(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpsertStudentProfile>,
) -> AppResult<Json<DataResponse<StudentProfile>>> {
    let input = UpsertStudentProfile {
        bio: non_blank(input.bio),
        major: non_blank(input.major),
        year: non_blank(input.year),
        linkedin_url: non_blank(input.linkedin_url),
        github_url: non_blank(input.github_url),
        personal_website_url: non_blank(input.personal_website_url),
        skills: clean_list(input.skills),
        proof_of_work_urls: clean_list(input.proof_of_work_urls),
    };
    validate_student_profile(ProfileFields {
        bio: input.bio.as_deref(),
        linkedin_url: input.linkedin_url.as_deref(),
        github_url: input.github_url.as_deref(),
        personal_website_url: input.personal_website_url.as_deref(),
        skills: &input.skills,
        proof_of_work_urls: &input.proof_of_work_urls,
    })?;

    let profile = StudentProfileRepo::upsert(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = user.user_id, "Student profile saved");
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/business/students/{id}/profile
///
/// Owners only see students who applied to one of their projects; anyone
/// else is reported as not found.
pub async fn get_applicant(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
) -> AppResult<Json<DataResponse<StudentProfileView>>> {
    if !ApplicationRepo::has_applied_to_owner(&state.pool, student_id, user.user_id).await? {
        return Err(profile_not_found(student_id));
    }
    let data = load_view(&state, student_id).await?;
    Ok(Json(DataResponse { data }))
}
