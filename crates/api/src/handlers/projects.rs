//! Handlers for owner projects (`/business/projects`) and the student
//! opportunity feed (`/student/opportunities`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use g1000_core::error::CoreError;
use g1000_core::project::{validate_new_project, ProjectStatus};
use g1000_core::types::DbId;
use g1000_db::models::business_profile::BusinessProfile;
use g1000_db::models::project::{CreateProject, Project, UpdateProject};
use g1000_db::repositories::{ApplicationRepo, BusinessProfileRepo, ProjectRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::{RequireApprovedOwner, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetProjectStatusRequest {
    pub status: String,
}

/// Public face of the business behind an opportunity.
#[derive(Debug, Serialize)]
pub struct CompanySummary {
    pub user_id: DbId,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub website_url: Option<String>,
    pub industry_tags: Vec<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

impl From<BusinessProfile> for CompanySummary {
    fn from(profile: BusinessProfile) -> Self {
        Self {
            user_id: profile.user_id,
            company_name: profile.company_name,
            contact_name: profile.contact_name,
            website_url: profile.website_url,
            industry_tags: profile.industry_tags,
            description: profile.description,
            logo_url: profile.logo_url,
        }
    }
}

/// The caller's own application to an opportunity.
#[derive(Debug, Serialize)]
pub struct OwnApplication {
    pub id: DbId,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct OpportunityDetail {
    #[serde(flatten)]
    pub project: Project,
    pub company: Option<CompanySummary>,
    pub my_application: Option<OwnApplication>,
}

fn project_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// POST /api/v1/business/projects
pub async fn create(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_new_project(&input.title, input.apply_window_start, input.apply_window_end)?;
    input.title = input.title.trim().to_string();

    let project = ProjectRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(project_id = project.id, owner_id = user.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/business/projects
pub async fn list_own(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/business/projects/{id}
pub async fn get_own(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_for_owner(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/business/projects/{id}
///
/// Patch fields; the resulting title and window are validated as a whole.
pub async fn update(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let current = ProjectRepo::find_for_owner(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    input.title = input.title.map(|t| t.trim().to_string());
    validate_new_project(
        input.title.as_deref().unwrap_or(&current.title),
        input.apply_window_start.unwrap_or(current.apply_window_start),
        input.apply_window_end.unwrap_or(current.apply_window_end),
    )?;

    let project = ProjectRepo::update(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/business/projects/{id}/status
pub async fn set_status(
    RequireApprovedOwner(user): RequireApprovedOwner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SetProjectStatusRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let status: ProjectStatus = input.status.parse()?;
    let project = ProjectRepo::set_status(&state.pool, id, user.user_id, status)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    tracing::info!(project_id = id, status = status.as_str(), "Project status changed");
    Ok(Json(DataResponse { data: project }))
}

/// GET /api/v1/student/opportunities
///
/// Open projects currently accepting applications.
pub async fn list_opportunities(
    RequireStudent(_user): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list_accepting(&state.pool, Utc::now()).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/student/opportunities/{id}
///
/// Open projects are visible to every student. Once closed, a project stays
/// visible only to students who applied to it.
pub async fn get_opportunity(
    RequireStudent(user): RequireStudent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OpportunityDetail>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    let application =
        ApplicationRepo::find_for_student_on_project(&state.pool, id, user.user_id).await?;
    if !project.is_open() && application.is_none() {
        return Err(project_not_found(id));
    }

    let company = BusinessProfileRepo::find_by_user(&state.pool, project.owner_id)
        .await?
        .map(CompanySummary::from);
    let my_application = application.map(|a| OwnApplication {
        id: a.id,
        status: a.status,
    });

    Ok(Json(DataResponse {
        data: OpportunityDetail {
            project,
            company,
            my_application,
        },
    }))
}
