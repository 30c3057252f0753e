pub mod admin;
pub mod auth;
pub mod business;
pub mod health;
pub mod student;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/*                  sign-in flows, session (see routes::auth)
/// /auth/business/*         business sign-in and registration
/// /auth/admin/login        admin password login
///
/// /business/profile        owner profile (before approval too)
/// /business/projects/*     owner projects and applicant lifecycle
/// /business/students/*     applicant profiles
/// /business/engagements/*  owner side of the engagement ledger
///
/// /student/profile         student profile, stats
/// /student/opportunities/* open projects, apply
/// /student/applications/*  own applications, withdraw
/// /student/engagements/*   student side of the engagement ledger
///
/// /admin/*                 approval list, profile approval, roster
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/business", business::router())
        .nest("/student", student::router())
        .nest("/admin", admin::router())
}
