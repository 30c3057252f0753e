//! Request handlers, one submodule per resource.
//!
//! Handlers authorize through the RBAC extractors, delegate persistence to
//! `g1000_db` repositories and decisions to `g1000_core`, and map errors via
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod auth;
pub mod business_auth;
pub mod business_profile;
pub mod engagement;
pub mod lifecycle;
pub mod projects;
pub mod student;
pub mod student_profile;
