//! Entity records and persistence helpers for jobplus.
//!
//! Five entities map one-to-one onto the tables created by `jobplus-db`:
//!
//! | Entity | Table | Owned by |
//! |--------|-------|----------|
//! | [`User`] | `user` | |
//! | [`Personal`] | `personal` | one `User` (at most one profile per user) |
//! | [`Company`] | `company` | one `User` |
//! | [`Job`] | `job` | one `Company` |
//! | [`JobWanted`] | `jobwanted` | one `Personal` and one `Job` |
//!
//! Every function takes a `&rusqlite::Connection`; callers that need
//! several writes to commit together pass a `Transaction` (it derefs to a
//! connection). Reverse navigation is explicit: `job::applications`,
//! `company::jobs`, `user::companies` and friends are plain queries.
//!
//! Constraint violations are not pre-checked. A duplicate user name, for
//! example, comes back from [`user::create_user`] as
//! [`ModelError::Database`] carrying SQLite's own error.
//!
//! # Usage
//!
//! ```rust,ignore
//! use jobplus_models::user::{self, NewUser};
//!
//! let alice = user::create_user(&conn, &NewUser::new("alice", "secret123"))?;
//! assert!(alice.check_password("secret123")?);
//! ```

use std::fmt;

use jobplus_types::Timestamps;
use rusqlite::types::ToSql;
use rusqlite::{Connection, Row};

pub mod company;
mod error;
pub mod job;
pub mod jobwanted;
pub mod password;
pub mod personal;
pub mod user;

pub use company::Company;
pub use error::{ModelError, UnknownRole};
pub use job::Job;
pub use jobwanted::JobWanted;
pub use personal::Personal;
pub use user::User;

pub use jobplus_types::{Principal, Role};

/// `SET` clause fragment that refreshes `updated_at`.
///
/// The new value is the current time, or one millisecond past the previous
/// value when the clock has not moved on, so every update is observable.
pub(crate) const TOUCH_UPDATED_AT: &str = "updated_at = max(
    strftime('%Y-%m-%d %H:%M:%f', 'now'),
    strftime('%Y-%m-%d %H:%M:%f', updated_at, '+0.001 seconds'))";

/// Reads the `created_at` / `updated_at` pair starting at column `idx`.
pub(crate) fn timestamps_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Timestamps> {
    Ok(Timestamps {
        created_at: row.get(idx)?,
        updated_at: row.get(idx + 1)?,
    })
}

/// The `SET` list of a partial `UPDATE`, built one column at a time.
///
/// `set` takes the outer `Option` of an `Update*` field: `None` skips the
/// column, `Some(value)` writes it, so `Some(None)` stores NULL.
pub(crate) struct Assignments {
    clauses: Vec<String>,
    values: Vec<Box<dyn ToSql>>,
}

impl Assignments {
    pub(crate) fn new() -> Self {
        Self {
            clauses: Vec::new(),
            values: Vec::new(),
        }
    }

    pub(crate) fn set<T: ToSql + 'static>(&mut self, column: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.values.push(Box::new(value));
            self.clauses.push(format!("{column} = ?{}", self.values.len()));
        }
    }

    /// Runs the update against row `id` of `table`, always refreshing
    /// `updated_at`. Returns the number of rows changed.
    pub(crate) fn execute(
        mut self,
        conn: &Connection,
        table: &str,
        id: i64,
    ) -> rusqlite::Result<usize> {
        self.clauses.push(TOUCH_UPDATED_AT.to_string());
        self.values.push(Box::new(id));
        let sql = format!(
            "UPDATE {table} SET {} WHERE id = ?{}",
            self.clauses.join(", "),
            self.values.len()
        );

        let params: Vec<&dyn ToSql> = self.values.iter().map(|v| &**v).collect();
        conn.execute(&sql, params.as_slice())
    }
}

/// An optional text column as entity `Display` impls show it: quoted when
/// present, a bare `None` when NULL.
pub(crate) struct Label<'a>(pub(crate) Option<&'a str>);

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(text) => write!(f, "{text:?}"),
            None => f.write_str("None"),
        }
    }
}
