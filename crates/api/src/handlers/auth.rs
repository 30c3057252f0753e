//! Handlers for the `/auth` resource: code-first sign-in with password
//! fallback, for students (`/auth/*`), business owners (`/auth/business/*`),
//! and admins (`/auth/admin/login`).
//!
//! Student and business flows share one implementation parameterized by
//! [`Audience`]; only the eligibility rules differ.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use g1000_core::error::CoreError;
use g1000_core::identity::{
    display_name_from_email, generate_verification_code, hash_code, is_institutional_email,
    normalize_email, validate_code_format, validate_email_format, LoginState, LoginStep,
    CHALLENGE_TTL_MINS, MIN_PASSWORD_LENGTH,
};
use g1000_core::roles::Role;
use g1000_db::models::business_profile::BusinessProfile;
use g1000_db::models::identity::{CreateIdentity, Identity, IdentityResponse};
use g1000_db::repositories::{
    ApprovalRepo, BusinessProfileRepo, ChallengeRepo, IdentityRepo, RosterRepo,
};
use g1000_events::messages;
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_session_token;
use crate::auth::password::{
    hash_password_blocking, validate_password_strength, verify_password_blocking,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Body for `set-password` and `login-password`.
#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct CodeSentResponse {
    pub sent: bool,
    /// Minutes until the code expires.
    pub expires_in_mins: i64,
}

/// Issued on every successful sign-in. The token is also set as a cookie.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    /// Session lifetime in seconds.
    pub expires_in: i64,
    pub has_password: bool,
    pub user: IdentityResponse,
}

#[derive(Debug, Serialize)]
pub struct CheckUserResponse {
    pub exists: bool,
    pub has_password: bool,
    pub has_challenge: bool,
    pub next_step: LoginStep,
}

#[derive(Debug, Serialize)]
pub struct PasswordSetResponse {
    pub has_password: bool,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: IdentityResponse,
    pub business_profile: Option<BusinessProfile>,
}

// ---------------------------------------------------------------------------
// Audience and eligibility
// ---------------------------------------------------------------------------

/// Which sign-in portal a request came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Audience {
    Student,
    Business,
}

impl Audience {
    fn role(self) -> Role {
        match self {
            Audience::Student => Role::Student,
            Audience::Business => Role::Owner,
        }
    }
}

/// Outcome of a passed eligibility check.
struct Eligibility {
    /// Display name for an identity created from this email.
    display_name: String,
}

/// Enforce the per-audience preconditions on a normalized email.
///
/// - Students: institutional domain and a roster entry (`NotEligible`).
/// - Business: an active approval entry (`NotEligible`) and, once a business
///   profile exists, approval of that profile (`PendingApproval`).
async fn check_eligibility(
    state: &AppState,
    audience: Audience,
    email: &str,
) -> AppResult<Eligibility> {
    match audience {
        Audience::Student => {
            if !is_institutional_email(email, &state.config.institution_domains) {
                return Err(CoreError::NotEligible(
                    "Please use your institutional email address".into(),
                )
                .into());
            }
            let participant = RosterRepo::find_by_email(&state.pool, email)
                .await?
                .ok_or_else(|| {
                    CoreError::NotEligible(
                        "This email is not on the G1000 participant roster".into(),
                    )
                })?;
            Ok(Eligibility {
                display_name: participant.name,
            })
        }
        Audience::Business => {
            let entry = ApprovalRepo::find_active_by_email(&state.pool, email)
                .await?
                .ok_or_else(|| {
                    CoreError::NotEligible(
                        "This email is not approved for business access".into(),
                    )
                })?;

            if let Some(identity) = IdentityRepo::find_by_email(&state.pool, email).await? {
                if let Some(profile) =
                    BusinessProfileRepo::find_by_user(&state.pool, identity.id).await?
                {
                    if !profile.is_approved {
                        return Err(CoreError::PendingApproval(
                            "Your business account is awaiting approval".into(),
                        )
                        .into());
                    }
                }
            }

            Ok(Eligibility {
                display_name: entry
                    .company_name
                    .unwrap_or_else(|| display_name_from_email(email)),
            })
        }
    }
}

/// Normalize and format-check an email from a request body.
fn parse_email(raw: &str) -> AppResult<String> {
    let email = normalize_email(raw);
    validate_email_format(&email)?;
    Ok(email)
}

// ---------------------------------------------------------------------------
// Session issuance
// ---------------------------------------------------------------------------

/// Sign a session for `identity` and attach it as a cookie.
fn session_response(state: &AppState, identity: &Identity) -> AppResult<Response> {
    let jwt = &state.config.jwt;
    let token = generate_session_token(identity.id, &identity.email, &identity.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let cookie = session_cookie(&token, jwt.session_ttl_secs(), state.config.cookie_secure);
    let body = DataResponse {
        data: SessionResponse {
            token,
            expires_in: jwt.session_ttl_secs(),
            has_password: identity.has_password,
            user: IdentityResponse::from(identity),
        },
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

// ---------------------------------------------------------------------------
// Shared flows
// ---------------------------------------------------------------------------

pub(crate) async fn request_code_for(
    state: &AppState,
    audience: Audience,
    input: EmailRequest,
) -> AppResult<Json<DataResponse<CodeSentResponse>>> {
    let email = parse_email(&input.email)?;
    check_eligibility(state, audience, &email).await?;

    let code = generate_verification_code();
    let expires_at = Utc::now() + chrono::Duration::minutes(CHALLENGE_TTL_MINS);
    ChallengeRepo::issue(&state.pool, &email, &hash_code(&email, &code), expires_at).await?;

    notify::send(state, messages::verification_code(&email, &code));
    tracing::info!(?audience, "Verification code issued");

    Ok(Json(DataResponse {
        data: CodeSentResponse {
            sent: true,
            expires_in_mins: CHALLENGE_TTL_MINS,
        },
    }))
}

pub(crate) async fn verify_code_for(
    state: &AppState,
    audience: Audience,
    input: VerifyCodeRequest,
) -> AppResult<Response> {
    let email = parse_email(&input.email)?;
    let code = input.code.trim();
    validate_code_format(code)?;

    let eligibility = check_eligibility(state, audience, &email).await?;

    if !ChallengeRepo::consume(&state.pool, &email, &hash_code(&email, code)).await? {
        return Err(CoreError::InvalidOrExpiredCode.into());
    }

    let identity = IdentityRepo::find_or_create(
        &state.pool,
        &CreateIdentity {
            email,
            display_name: eligibility.display_name,
            role: audience.role(),
            password_hash: None,
        },
    )
    .await?;

    if identity.role()? != audience.role() {
        return Err(CoreError::Forbidden(
            "This email is registered for a different portal".into(),
        )
        .into());
    }

    tracing::info!(user_id = identity.id, role = %identity.role, "Signed in with verification code");
    session_response(state, &identity)
}

pub(crate) async fn set_password_for(
    state: &AppState,
    audience: Audience,
    user: AuthUser,
    input: PasswordRequest,
) -> AppResult<Json<DataResponse<PasswordSetResponse>>> {
    let email = normalize_email(&input.email);
    if user.email != email || user.role != audience.role() {
        return Err(CoreError::Unauthorized(
            "Session does not belong to this email".into(),
        )
        .into());
    }
    if audience == Audience::Business {
        check_eligibility(state, audience, &email).await?;
    }

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::WeakPassword)?;
    let hash = hash_password_blocking(input.password).await?;

    if !IdentityRepo::set_password(&state.pool, user.user_id, &hash).await? {
        return Err(CoreError::Unauthorized("Account no longer exists".into()).into());
    }

    tracing::info!(user_id = user.user_id, "Password set");
    Ok(Json(DataResponse {
        data: PasswordSetResponse { has_password: true },
    }))
}

/// Password sign-in for identities of `role`.
///
/// Unknown email, missing password, wrong password, and wrong role all
/// produce the same `InvalidCredentials` after a full hash verification.
pub(crate) async fn login_password_for(
    state: &AppState,
    role: Role,
    input: PasswordRequest,
) -> AppResult<Response> {
    let email = normalize_email(&input.email);
    if role == Role::Owner {
        check_eligibility(state, Audience::Business, &email).await?;
    }

    let identity = IdentityRepo::find_by_email(&state.pool, &email).await?;
    let hash = identity.as_ref().and_then(|i| i.password_hash.clone());
    let verified = verify_password_blocking(input.password, hash).await?;

    let identity = match identity {
        Some(identity) if verified && identity.role == role.as_str() => identity,
        _ => return Err(CoreError::InvalidCredentials.into()),
    };

    tracing::info!(user_id = identity.id, role = %identity.role, "Signed in with password");
    session_response(state, &identity)
}

pub(crate) async fn check_user_for(
    state: &AppState,
    audience: Audience,
    input: EmailRequest,
) -> AppResult<Json<DataResponse<CheckUserResponse>>> {
    let email = parse_email(&input.email)?;
    check_eligibility(state, audience, &email).await?;

    let identity = IdentityRepo::find_by_email(&state.pool, &email)
        .await?
        .filter(|i| i.role == audience.role().as_str());
    let has_password = identity.as_ref().is_some_and(|i| i.has_password);
    let has_challenge = ChallengeRepo::has_active(&state.pool, &email).await?;

    let next_step = LoginState {
        has_challenge,
        has_password,
    }
    .next_step();

    Ok(Json(DataResponse {
        data: CheckUserResponse {
            exists: identity.is_some(),
            has_password,
            has_challenge,
            next_step,
        },
    }))
}

// ---------------------------------------------------------------------------
// Student handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/request-code
pub async fn request_code(
    State(state): State<AppState>,
    AppJson(input): AppJson<EmailRequest>,
) -> AppResult<Json<DataResponse<CodeSentResponse>>> {
    request_code_for(&state, Audience::Student, input).await
}

/// POST /api/v1/auth/verify-code
pub async fn verify_code(
    State(state): State<AppState>,
    AppJson(input): AppJson<VerifyCodeRequest>,
) -> AppResult<Response> {
    verify_code_for(&state, Audience::Student, input).await
}

/// POST /api/v1/auth/set-password
pub async fn set_password(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<PasswordRequest>,
) -> AppResult<Json<DataResponse<PasswordSetResponse>>> {
    set_password_for(&state, Audience::Student, user, input).await
}

/// POST /api/v1/auth/login-password
pub async fn login_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<PasswordRequest>,
) -> AppResult<Response> {
    login_password_for(&state, Role::Student, input).await
}

/// POST /api/v1/auth/check-user
pub async fn check_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<EmailRequest>,
) -> AppResult<Json<DataResponse<CheckUserResponse>>> {
    check_user_for(&state, Audience::Student, input).await
}

/// POST /api/v1/auth/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(input): AppJson<PasswordRequest>,
) -> AppResult<Response> {
    login_password_for(&state, Role::Admin, input).await
}

// ---------------------------------------------------------------------------
// Session handlers (any role)
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/change-password
///
/// Requires the current password; identities without one must use
/// `set-password` after a code sign-in.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<DataResponse<PasswordSetResponse>>> {
    let identity = IdentityRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Account no longer exists".into()))?;

    let verified =
        verify_password_blocking(input.current_password, identity.password_hash.clone()).await?;
    if !verified {
        return Err(CoreError::InvalidCredentials.into());
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::WeakPassword)?;
    let hash = hash_password_blocking(input.new_password).await?;
    IdentityRepo::set_password(&state.pool, identity.id, &hash).await?;

    tracing::info!(user_id = identity.id, "Password changed");
    Ok(Json(DataResponse {
        data: PasswordSetResponse { has_password: true },
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let identity = IdentityRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Account no longer exists".into()))?;

    let business_profile = if user.role == Role::Owner {
        BusinessProfileRepo::find_by_user(&state.pool, identity.id).await?
    } else {
        None
    };

    Ok(Json(DataResponse {
        data: MeResponse {
            user: IdentityResponse::from(&identity),
            business_profile,
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Clears the session cookie. Sessions are stateless, so a Bearer token
/// stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
    )
}
