//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The caller's identity from a Bearer token or session cookie.
//! - [`rbac::RequireStudent`] -- Requires the `student` role.
//! - [`rbac::RequireOwner`] -- Requires the `owner` role (approval not checked).
//! - [`rbac::RequireApprovedOwner`] -- Requires an owner whose business profile is approved.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
