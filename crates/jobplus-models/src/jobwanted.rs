//! Job applications: the `jobwanted` table.
//!
//! Each row pairs one personal profile with one job at `addtime`. The pair
//! is not unique; applying twice records two rows.

use std::fmt;

use chrono::{DateTime, Utc};
use jobplus_types::Timestamps;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::job::{self, Job};
use crate::personal::{self, Personal};
use crate::timestamps_at;

const ENTITY: &str = "jobwanted";

const COLUMNS: &str = "id, personal_id, job_id, addtime, created_at, updated_at";

/// One application of a job seeker to a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobWanted {
    pub id: i64,
    pub personal_id: Option<i64>,
    pub job_id: Option<i64>,
    /// When the application was submitted.
    pub addtime: DateTime<Utc>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl fmt::Display for JobWanted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<JobWanted {}>", self.id)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NewJobWanted {
    pub personal_id: i64,
    pub job_id: i64,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<JobWanted> {
    Ok(JobWanted {
        id: row.get(0)?,
        personal_id: row.get(1)?,
        job_id: row.get(2)?,
        addtime: row.get(3)?,
        timestamps: timestamps_at(row, 4)?,
    })
}

/// Records an application stamped with the current time.
///
/// # Errors
///
/// Returns `ModelError::Database` if the profile or the job does not exist.
pub fn create_jobwanted(conn: &Connection, new: &NewJobWanted) -> Result<JobWanted, ModelError> {
    conn.execute(
        "INSERT INTO jobwanted (personal_id, job_id) VALUES (?1, ?2)",
        params![new.personal_id, new.job_id],
    )?;
    let id = conn.last_insert_rowid();

    tracing::info!(
        jobwanted_id = id,
        personal_id = new.personal_id,
        job_id = new.job_id,
        "application recorded"
    );

    get_jobwanted(conn, id)
}

pub fn get_jobwanted(conn: &Connection, id: i64) -> Result<JobWanted, ModelError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM jobwanted WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| ModelError::not_found(ENTITY, id))
}

pub fn delete_jobwanted(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let changed = conn.execute("DELETE FROM jobwanted WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }
    Ok(())
}

pub(crate) fn list_by_job(conn: &Connection, job_id: i64) -> Result<Vec<JobWanted>, ModelError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM jobwanted WHERE job_id = ?1 ORDER BY addtime, id"
    ))?;
    let rows = stmt.query_map(params![job_id], from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub(crate) fn list_by_personal(
    conn: &Connection,
    personal_id: i64,
) -> Result<Vec<JobWanted>, ModelError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM jobwanted WHERE personal_id = ?1 ORDER BY addtime, id"
    ))?;
    let rows = stmt.query_map(params![personal_id], from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// The applicant's profile.
pub fn personal(
    conn: &Connection,
    application: &JobWanted,
) -> Result<Option<Personal>, ModelError> {
    application
        .personal_id
        .map(|personal_id| personal::get_personal(conn, personal_id))
        .transpose()
}

/// The posting applied to.
pub fn job(conn: &Connection, application: &JobWanted) -> Result<Option<Job>, ModelError> {
    application
        .job_id
        .map(|job_id| job::get_job(conn, job_id))
        .transpose()
}
