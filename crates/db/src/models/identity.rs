//! Identity entity model and DTOs.

use g1000_core::error::CoreError;
use g1000_core::roles::Role;
use g1000_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `identities` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`IdentityResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Identity {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub password_hash: Option<String>,
    pub has_password: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identity {
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role.parse().map_err(CoreError::Internal)
    }
}

/// Safe identity representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityResponse {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub has_password: bool,
    pub created_at: Timestamp,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            role: identity.role.clone(),
            has_password: identity.has_password,
            created_at: identity.created_at,
        }
    }
}

/// DTO for creating an identity. `email` must already be normalized.
#[derive(Debug)]
pub struct CreateIdentity {
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub password_hash: Option<String>,
}
