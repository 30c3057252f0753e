//! Handlers for `/business/profile`. Available to owners before approval.

use axum::extract::State;
use axum::Json;
use g1000_core::error::CoreError;
use g1000_db::models::business_profile::{BusinessProfile, UpdateBusinessProfile};
use g1000_db::repositories::BusinessProfileRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireOwner;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/business/profile
pub async fn get(
    RequireOwner(user): RequireOwner,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BusinessProfile>>> {
    let profile = BusinessProfileRepo::find_by_user(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BusinessProfile",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/business/profile
///
/// Creates the profile on first call (company name required) and patches it
/// afterwards. Approval state is left alone.
pub async fn upsert(
    RequireOwner(user): RequireOwner,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<UpdateBusinessProfile>,
) -> AppResult<Json<DataResponse<BusinessProfile>>> {
    input.company_name = input
        .company_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    if input.company_name.is_none()
        && BusinessProfileRepo::find_by_user(&state.pool, user.user_id)
            .await?
            .is_none()
    {
        return Err(CoreError::InvalidInput("Company name is required".into()).into());
    }

    let profile = BusinessProfileRepo::upsert(&state.pool, user.user_id, &input).await?;
    Ok(Json(DataResponse { data: profile }))
}
