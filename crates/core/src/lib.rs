//! Domain rules for the G1000 portal backend.
//!
//! Everything in this crate is pure: no database, no network. The `db` and
//! `api` crates build on these types and validators.

pub mod engagement;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod profile;
pub mod project;
pub mod roles;
pub mod types;
