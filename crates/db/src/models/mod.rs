//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Create*` / `Update*` DTOs consumed by the matching repository

pub mod application;
pub mod approval;
pub mod business_profile;
pub mod challenge;
pub mod engagement;
pub mod identity;
pub mod project;
pub mod roster;
pub mod student_profile;
