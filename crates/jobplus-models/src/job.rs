//! Job postings: the `job` table.
//!
//! Pay bounds are stored as given. Nothing here checks that `min_pay` does
//! not exceed `max_pay`; that belongs to whatever form accepts the posting.

use std::fmt;

use jobplus_types::Timestamps;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::company::{self, Company};
use crate::error::ModelError;
use crate::jobwanted::{self, JobWanted};
use crate::{timestamps_at, Assignments};

const ENTITY: &str = "job";

const COLUMNS: &str = "id, company_id, name, min_pay, max_pay, address, label, jobyear, \
                       education, description, created_at, updated_at";

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub company_id: Option<i64>,
    pub name: Option<String>,
    pub min_pay: Option<i64>,
    pub max_pay: Option<i64>,
    pub address: Option<String>,
    /// Free-form tags.
    pub label: Option<String>,
    /// Required experience, as displayed (e.g. "3-5").
    pub jobyear: Option<String>,
    pub education: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Job {}>", self.id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewJob {
    pub company_id: i64,
    pub name: Option<String>,
    pub min_pay: Option<i64>,
    pub max_pay: Option<i64>,
    pub address: Option<String>,
    pub label: Option<String>,
    pub jobyear: Option<String>,
    pub education: Option<String>,
    pub description: Option<String>,
}

/// `None` leaves a column as is; `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateJob {
    pub name: Option<Option<String>>,
    pub min_pay: Option<Option<i64>>,
    pub max_pay: Option<Option<i64>>,
    pub address: Option<Option<String>>,
    pub label: Option<Option<String>>,
    pub jobyear: Option<Option<String>>,
    pub education: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        company_id: row.get(1)?,
        name: row.get(2)?,
        min_pay: row.get(3)?,
        max_pay: row.get(4)?,
        address: row.get(5)?,
        label: row.get(6)?,
        jobyear: row.get(7)?,
        education: row.get(8)?,
        description: row.get(9)?,
        timestamps: timestamps_at(row, 10)?,
    })
}

/// Inserts a job posting.
///
/// # Errors
///
/// Returns `ModelError::Database` if the company does not exist or a
/// column is too long.
pub fn create_job(conn: &Connection, new: &NewJob) -> Result<Job, ModelError> {
    conn.execute(
        "INSERT INTO job (
            company_id, name, min_pay, max_pay, address, label, jobyear, education, description
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            new.company_id,
            new.name,
            new.min_pay,
            new.max_pay,
            new.address,
            new.label,
            new.jobyear,
            new.education,
            new.description,
        ],
    )?;
    let id = conn.last_insert_rowid();

    tracing::debug!(job_id = id, company_id = new.company_id, "job created");

    get_job(conn, id)
}

pub fn get_job(conn: &Connection, id: i64) -> Result<Job, ModelError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM job WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| ModelError::not_found(ENTITY, id))
}

/// Lists all postings, newest first.
pub fn list_jobs(conn: &Connection) -> Result<Vec<Job>, ModelError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM job ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub(crate) fn list_jobs_by_company(
    conn: &Connection,
    company_id: i64,
) -> Result<Vec<Job>, ModelError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM job WHERE company_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![company_id], from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub fn update_job(conn: &Connection, id: i64, changes: &UpdateJob) -> Result<Job, ModelError> {
    let mut set = Assignments::new();
    set.set("name", changes.name.clone());
    set.set("min_pay", changes.min_pay);
    set.set("max_pay", changes.max_pay);
    set.set("address", changes.address.clone());
    set.set("label", changes.label.clone());
    set.set("jobyear", changes.jobyear.clone());
    set.set("education", changes.education.clone());
    set.set("description", changes.description.clone());

    let changed = set.execute(conn, "job", id)?;

    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }

    get_job(conn, id)
}

/// Deletes a posting.
///
/// Applications are not removed with it: while any `jobwanted` row still
/// references the job the store rejects the delete.
pub fn delete_job(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let changed = conn.execute("DELETE FROM job WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }
    Ok(())
}

/// The company that published the posting, or `None` when `company_id`
/// is NULL.
pub fn company(conn: &Connection, job: &Job) -> Result<Option<Company>, ModelError> {
    job.company_id
        .map(|company_id| company::get_company(conn, company_id))
        .transpose()
}

/// Applications received for the posting, oldest first.
pub fn applications(conn: &Connection, job_id: i64) -> Result<Vec<JobWanted>, ModelError> {
    jobwanted::list_by_job(conn, job_id)
}
