//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification, and strength policy.
//! - [`jwt`] -- Session token generation and validation.
//! - [`cookie`] -- `g1000_session` cookie construction and parsing.

pub mod cookie;
pub mod jwt;
pub mod password;
