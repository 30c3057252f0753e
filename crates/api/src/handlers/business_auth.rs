//! Handlers for `/auth/business/*`: the business-owner sign-in flow and
//! self-registration.
//!
//! Every entry point runs the business eligibility check (active approval
//! entry, approved profile once one exists).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use g1000_core::error::CoreError;
use g1000_core::identity::MIN_PASSWORD_LENGTH;
use g1000_core::roles::Role;
use g1000_db::models::business_profile::{BusinessProfile, CreateBusinessProfile};
use g1000_db::models::identity::{CreateIdentity, IdentityResponse};
use g1000_db::repositories::{ApprovalRepo, BusinessProfileRepo, IdentityRepo};
use serde::{Deserialize, Serialize};

use super::auth::{
    check_user_for, login_password_for, request_code_for, set_password_for, verify_code_for,
    Audience, CheckUserResponse, CodeSentResponse, EmailRequest, PasswordRequest,
    PasswordSetResponse, VerifyCodeRequest,
};
use crate::auth::password::{hash_password_blocking, validate_password_strength};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBusinessRequest {
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterBusinessResponse {
    pub user: IdentityResponse,
    pub profile: BusinessProfile,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/v1/auth/business/register
///
/// Creates the owner identity with a password, then an unapproved business
/// profile. The two writes are separate; if the profile insert fails the
/// identity is deleted again.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterBusinessRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RegisterBusinessResponse>>)> {
    let email = g1000_core::identity::normalize_email(&input.email);
    g1000_core::identity::validate_email_format(&email)?;

    let company_name = input.company_name.trim().to_string();
    if company_name.is_empty() {
        return Err(CoreError::InvalidInput("Company name is required".into()).into());
    }

    if ApprovalRepo::find_active_by_email(&state.pool, &email)
        .await?
        .is_none()
    {
        return Err(
            CoreError::NotEligible("This email is not approved for business access".into())
                .into(),
        );
    }

    if IdentityRepo::find_by_email(&state.pool, &email)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("An account with this email already exists".into()).into());
    }

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::WeakPassword)?;
    let password_hash = hash_password_blocking(input.password).await?;

    let contact_name = non_blank(input.contact_name);
    let identity = IdentityRepo::create(
        &state.pool,
        &CreateIdentity {
            email: email.clone(),
            display_name: contact_name.clone().unwrap_or_else(|| company_name.clone()),
            role: Role::Owner,
            password_hash: Some(password_hash),
        },
    )
    .await?
    .ok_or_else(|| CoreError::Conflict("An account with this email already exists".into()))?;

    let profile_input = CreateBusinessProfile {
        user_id: identity.id,
        company_name,
        contact_name,
        website_url: non_blank(input.website),
        industry_tags: non_blank(input.industry).into_iter().collect(),
    };

    let profile = match BusinessProfileRepo::create(&state.pool, &profile_input).await {
        Ok(profile) => profile,
        Err(e) => {
            if let Err(cleanup) = IdentityRepo::delete(&state.pool, identity.id).await {
                tracing::error!(
                    user_id = identity.id,
                    error = %cleanup,
                    "Failed to roll back identity after profile insert failure",
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(user_id = identity.id, "Business registered, awaiting approval");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegisterBusinessResponse {
                user: IdentityResponse::from(&identity),
                profile,
            },
        }),
    ))
}

/// POST /api/v1/auth/business/request-code
pub async fn request_code(
    State(state): State<AppState>,
    AppJson(input): AppJson<EmailRequest>,
) -> AppResult<Json<DataResponse<CodeSentResponse>>> {
    request_code_for(&state, Audience::Business, input).await
}

/// POST /api/v1/auth/business/verify-code
pub async fn verify_code(
    State(state): State<AppState>,
    AppJson(input): AppJson<VerifyCodeRequest>,
) -> AppResult<Response> {
    verify_code_for(&state, Audience::Business, input).await
}

/// POST /api/v1/auth/business/set-password
pub async fn set_password(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<PasswordRequest>,
) -> AppResult<Json<DataResponse<PasswordSetResponse>>> {
    set_password_for(&state, Audience::Business, user, input).await
}

/// POST /api/v1/auth/business/login-password
pub async fn login_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<PasswordRequest>,
) -> AppResult<Response> {
    login_password_for(&state, Role::Owner, input).await
}

/// POST /api/v1/auth/business/check-user
pub async fn check_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<EmailRequest>,
) -> AppResult<Json<DataResponse<CheckUserResponse>>> {
    check_user_for(&state, Audience::Business, input).await
}
