//! User accounts: the `user` table.
//!
//! A user is a login principal. It may own company profiles and at most one
//! personal (job seeker) profile. The `password` column only ever receives
//! the output of [`hash_password`] through this module, but rows written
//! elsewhere may leave it NULL.

use std::fmt;

use chrono::{DateTime, Utc};
use jobplus_types::{Principal, Role, Timestamps};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::company::{self, Company};
use crate::error::{ModelError, UnknownRole};
use crate::password::{hash_password, verify_password};
use crate::personal::{self, Personal};
use crate::{timestamps_at, Assignments, Label, TOUCH_UPDATED_AT};

const ENTITY: &str = "user";

const COLUMNS: &str = "id, name, email, password, role, addtime, created_at, updated_at";

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(skip)]
    password: Option<String>,
    pub role: Role,
    pub addtime: DateTime<Utc>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl User {
    /// The stored password hash, if one is set. Never the plaintext.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Replaces the stored hash with a fresh salted hash of `plaintext`.
    ///
    /// Only the in-memory record changes; persist with
    /// [`set_user_password`].
    ///
    /// # Errors
    ///
    /// Returns `ModelError::PasswordHash` if hashing fails.
    pub fn set_password(&mut self, plaintext: &str) -> Result<(), ModelError> {
        self.password = Some(hash_password(plaintext)?);
        Ok(())
    }

    /// Checks `candidate` against the stored hash.
    ///
    /// # Errors
    ///
    /// A wrong candidate is `Ok(false)`. An error means no hash is stored,
    /// or the stored hash is empty or malformed.
    pub fn check_password(&self, candidate: &str) -> Result<bool, ModelError> {
        let hash = self
            .password
            .as_deref()
            .ok_or_else(|| ModelError::PasswordHash("no password set".to_string()))?;
        verify_password(candidate, hash)
    }

    /// Staff and administrators.
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Staff | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl Principal for User {
    fn principal_id(&self) -> String {
        self.id.to_string()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User {}>", Label(self.name.as_deref()))
    }
}

/// Parameters for creating a user. `password` is the plaintext; it is
/// hashed before it reaches the store.
#[derive(Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    /// A regular account with no email.
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Fields to change on an existing user. `None` leaves a column as is;
/// `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub role: Option<Role>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let code: i16 = row.get(4)?;
    let role = Role::from_i16(code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Integer,
            Box::new(UnknownRole(code)),
        )
    })?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        role,
        addtime: row.get(5)?,
        timestamps: timestamps_at(row, 6)?,
    })
}

/// Inserts a user, storing a salted hash of `new.password`.
///
/// # Errors
///
/// Returns `ModelError::Database` if the name is taken or a column is too
/// long, and `ModelError::PasswordHash` if hashing fails.
pub fn create_user(conn: &Connection, new: &NewUser) -> Result<User, ModelError> {
    let hash = hash_password(&new.password)?;

    conn.execute(
        "INSERT INTO \"user\" (name, email, password, role) VALUES (?1, ?2, ?3, ?4)",
        params![new.name, new.email, hash, new.role.as_i16()],
    )?;
    let id = conn.last_insert_rowid();

    tracing::debug!(user_id = id, role = new.role.label(), "user created");

    get_user(conn, id)
}

/// Retrieves a user by primary key.
///
/// # Errors
///
/// Returns `ModelError::NotFound` if no such user exists.
pub fn get_user(conn: &Connection, id: i64) -> Result<User, ModelError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM \"user\" WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| ModelError::not_found(ENTITY, id))
}

/// Looks a user up by their unique name.
pub fn find_user_by_name(conn: &Connection, name: &str) -> Result<Option<User>, ModelError> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM \"user\" WHERE name = ?1"),
            params![name],
            from_row,
        )
        .optional()?)
}

/// Lists all users, newest registration first.
pub fn list_users(conn: &Connection) -> Result<Vec<User>, ModelError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM \"user\" ORDER BY addtime DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Applies the `Some` fields of `changes` and refreshes `updated_at`.
///
/// # Errors
///
/// Returns `ModelError::NotFound` if no such user exists, or
/// `ModelError::Database` on a constraint violation (e.g. renaming onto a
/// taken name).
pub fn update_user(conn: &Connection, id: i64, changes: &UpdateUser) -> Result<User, ModelError> {
    let mut set = Assignments::new();
    set.set("name", changes.name.clone());
    set.set("email", changes.email.clone());
    set.set("role", changes.role.map(Role::as_i16));

    let changed = set.execute(conn, "\"user\"", id)?;

    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }

    get_user(conn, id)
}

/// Hashes `plaintext` and stores it as the user's password.
///
/// # Errors
///
/// Returns `ModelError::NotFound` if no such user exists.
pub fn set_user_password(conn: &Connection, id: i64, plaintext: &str) -> Result<User, ModelError> {
    let hash = hash_password(plaintext)?;
    let changed = conn.execute(
        &format!("UPDATE \"user\" SET password = ?1, {TOUCH_UPDATED_AT} WHERE id = ?2"),
        params![hash, id],
    )?;

    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }

    tracing::debug!(user_id = id, "user password changed");

    get_user(conn, id)
}

/// Looks up `name` and checks `candidate` against its stored hash.
///
/// Returns `None` for an unknown name or a wrong password alike.
///
/// # Errors
///
/// Returns `ModelError::PasswordHash` if the stored hash is missing or
/// malformed.
pub fn authenticate(
    conn: &Connection,
    name: &str,
    candidate: &str,
) -> Result<Option<User>, ModelError> {
    let Some(user) = find_user_by_name(conn, name)? else {
        return Ok(None);
    };

    if user.check_password(candidate)? {
        Ok(Some(user))
    } else {
        tracing::debug!(user_id = user.id, "password check failed");
        Ok(None)
    }
}

/// Deletes a user.
///
/// # Errors
///
/// Returns `ModelError::Database` while a company or personal profile still
/// references the user, and `ModelError::NotFound` if no such user exists.
pub fn delete_user(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let changed = conn.execute("DELETE FROM \"user\" WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }
    Ok(())
}

/// Companies owned by the user.
pub fn companies(conn: &Connection, user_id: i64) -> Result<Vec<Company>, ModelError> {
    company::list_companies_by_owner(conn, user_id)
}

/// The user's personal profile, if they have created one.
pub fn personal(conn: &Connection, user_id: i64) -> Result<Option<Personal>, ModelError> {
    personal::find_personal_by_user(conn, user_id)
}
