//! Well-known role names.
//!
//! These must match the `CHECK` constraint on `identities.role` in
//! `20250101000001_create_identities.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_ADMIN: &str = "admin";

/// The single role an identity holds for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Owner,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Owner => ROLE_OWNER,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_OWNER => Ok(Role::Owner),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}
