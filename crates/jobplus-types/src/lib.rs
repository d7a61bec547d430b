//! Shared types and constants for the jobplus data model.
//!
//! This crate holds the value types every other jobplus crate agrees on:
//! the user role codes, the `created_at` / `updated_at` pair composed into
//! every entity, the column width limits enforced by the schema, and the
//! [`Principal`] capability implemented by loginable records.
//!
//! It has no database dependency. `jobplus-db` owns the schema and
//! `jobplus-models` maps rows onto the entity records.

use serde::{Deserialize, Serialize};

pub mod limits;
mod principal;
mod timestamps;

pub use principal::Principal;
pub use timestamps::Timestamps;

/// Access role of a user, persisted as a small integer in `user.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum Role {
    /// A regular account (job seeker or company).
    #[default]
    User = 10,
    /// Site staff.
    Staff = 20,
    /// Site administrator.
    Admin = 30,
}

impl Role {
    /// Returns the stored code for this role.
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Converts a stored code back to a `Role`.
    ///
    /// Returns `None` for codes that do not correspond to a known role.
    pub fn from_i16(code: i16) -> Option<Self> {
        match code {
            10 => Some(Self::User),
            20 => Some(Self::Staff),
            30 => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Staff => "STAFF",
            Self::Admin => "ADMIN",
        }
    }
}
