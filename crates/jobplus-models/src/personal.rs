//! Job seeker profiles: the `personal` table.
//!
//! `personal.user_id` carries a unique index, so a user has at most one
//! profile. A second insert for the same user fails in the store.

use std::fmt;

use jobplus_types::Timestamps;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::jobwanted::{self, JobWanted};
use crate::user::{self, User};
use crate::{timestamps_at, Assignments, Label};

const ENTITY: &str = "personal";

const COLUMNS: &str = "id, user_id, name, phone, jobyear, resume, created_at, updated_at";

/// A job seeker's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personal {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Years of work experience.
    pub jobyear: Option<i64>,
    /// Path or URL of the uploaded resume.
    pub resume: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl fmt::Display for Personal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Personal {}>", Label(self.name.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPersonal {
    pub user_id: i64,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub jobyear: Option<i64>,
    pub resume: Option<String>,
}

/// `None` leaves a column as is; `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdatePersonal {
    pub name: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub jobyear: Option<Option<i64>>,
    pub resume: Option<Option<String>>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Personal> {
    Ok(Personal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        jobyear: row.get(4)?,
        resume: row.get(5)?,
        timestamps: timestamps_at(row, 6)?,
    })
}

/// Creates a profile for `new.user_id`.
///
/// # Errors
///
/// Returns `ModelError::Database` if the user already has a profile, the
/// user does not exist, or a column is too long.
pub fn create_personal(conn: &Connection, new: &NewPersonal) -> Result<Personal, ModelError> {
    conn.execute(
        "INSERT INTO personal (user_id, name, phone, jobyear, resume)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![new.user_id, new.name, new.phone, new.jobyear, new.resume],
    )?;
    let id = conn.last_insert_rowid();

    tracing::debug!(personal_id = id, user_id = new.user_id, "personal profile created");

    get_personal(conn, id)
}

pub fn get_personal(conn: &Connection, id: i64) -> Result<Personal, ModelError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM personal WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| ModelError::not_found(ENTITY, id))
}

/// The profile belonging to `user_id`, if any.
pub fn find_personal_by_user(
    conn: &Connection,
    user_id: i64,
) -> Result<Option<Personal>, ModelError> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM personal WHERE user_id = ?1"),
            params![user_id],
            from_row,
        )
        .optional()?)
}

pub fn update_personal(
    conn: &Connection,
    id: i64,
    changes: &UpdatePersonal,
) -> Result<Personal, ModelError> {
    let mut set = Assignments::new();
    set.set("name", changes.name.clone());
    set.set("phone", changes.phone.clone());
    set.set("jobyear", changes.jobyear);
    set.set("resume", changes.resume.clone());

    let changed = set.execute(conn, "personal", id)?;

    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }

    get_personal(conn, id)
}

/// Deletes a profile. Rejected by the store while applications reference it.
pub fn delete_personal(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let changed = conn.execute("DELETE FROM personal WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }
    Ok(())
}

/// The user this profile belongs to, or `None` when `user_id` is NULL.
pub fn owner(conn: &Connection, personal: &Personal) -> Result<Option<User>, ModelError> {
    personal
        .user_id
        .map(|user_id| user::get_user(conn, user_id))
        .transpose()
}

/// Applications submitted from this profile, oldest first.
pub fn applications(conn: &Connection, personal_id: i64) -> Result<Vec<JobWanted>, ModelError> {
    jobwanted::list_by_personal(conn, personal_id)
}
