//! Error types for the model layer.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors returned by entity and repository operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A database operation failed. Constraint violations (duplicate user
    /// or company name, second profile for a user, dangling or still
    /// referenced foreign key, oversize column) arrive here unchanged.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No row with the given primary key exists.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The hashing library rejected the input, or the stored hash is NULL
    /// or could not be parsed.
    #[error("password hash error: {0}")]
    PasswordHash(String),
}

impl ModelError {
    /// Returns `true` if the store rejected the write because of a
    /// `UNIQUE`, `FOREIGN KEY`, `CHECK` or `NOT NULL` constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
        )
    }

    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// A `role` column value that is not one of the known role codes.
#[derive(Debug, Error)]
#[error("unknown role code {0}")]
pub struct UnknownRole(pub i16);
