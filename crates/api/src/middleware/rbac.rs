//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! match. Owner routes beyond the business profile additionally require the
//! profile to be approved.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use g1000_core::error::CoreError;
use g1000_core::roles::Role;
use g1000_db::repositories::{ApprovalRepo, BusinessProfileRepo};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    role: Role,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.role != role {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "The {role} role is required"
        ))));
    }
    Ok(user)
}

/// Requires the `student` role. Rejects with 403 Forbidden otherwise.
pub struct RequireStudent(pub AuthUser);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Student)
            .await
            .map(RequireStudent)
    }
}

/// Requires the `owner` role. Used for profile read/write, which stays
/// available while the business awaits approval.
pub struct RequireOwner(pub AuthUser);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Owner)
            .await
            .map(RequireOwner)
    }
}

/// Requires the `owner` role, an approved business profile, and an active
/// approval-list entry for the owner's email.
///
/// Rejects with `PendingApproval` when the profile is missing or not yet
/// approved, or when an admin has since deactivated the entry.
pub struct RequireApprovedOwner(pub AuthUser);

impl FromRequestParts<AppState> for RequireApprovedOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require_role(parts, state, Role::Owner).await?;
        let approved = BusinessProfileRepo::find_by_user(&state.pool, user.user_id)
            .await?
            .is_some_and(|p| p.is_approved);
        if !approved {
            return Err(AppError::Core(CoreError::PendingApproval(
                "Your business account is awaiting approval".into(),
            )));
        }
        if ApprovalRepo::find_active_by_email(&state.pool, &user.email)
            .await?
            .is_none()
        {
            tracing::info!(user_id = user.user_id, "Owner no longer on the approval list");
            return Err(AppError::Core(CoreError::PendingApproval(
                "Your business is no longer on the approval list".into(),
            )));
        }
        Ok(RequireApprovedOwner(user))
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin)
            .await
            .map(RequireAdmin)
    }
}
