//! Company profiles: the `company` table.

use std::fmt;

use jobplus_types::Timestamps;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::job::{self, Job};
use crate::user::{self, User};
use crate::{timestamps_at, Assignments, Label};

const ENTITY: &str = "company";

const COLUMNS: &str = "id, user_id, name, address, phone, logo, summary, field, financing, \
                       created_at, updated_at";

/// A hiring company. A non-NULL `name` is unique across all companies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    /// The account that manages this company.
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Path or URL of the logo image.
    pub logo: Option<String>,
    pub summary: Option<String>,
    /// Industry.
    pub field: Option<String>,
    /// Funding stage.
    pub financing: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Company {}>", Label(self.name.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCompany {
    pub user_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub summary: Option<String>,
    pub field: Option<String>,
    pub financing: Option<String>,
}

/// `None` leaves a column as is; `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompany {
    pub name: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub logo: Option<Option<String>>,
    pub summary: Option<Option<String>>,
    pub field: Option<Option<String>>,
    pub financing: Option<Option<String>>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        phone: row.get(4)?,
        logo: row.get(5)?,
        summary: row.get(6)?,
        field: row.get(7)?,
        financing: row.get(8)?,
        timestamps: timestamps_at(row, 9)?,
    })
}

/// Inserts a company.
///
/// # Errors
///
/// Returns `ModelError::Database` if the name is taken, the owning user
/// does not exist, or a column is too long.
pub fn create_company(conn: &Connection, new: &NewCompany) -> Result<Company, ModelError> {
    conn.execute(
        "INSERT INTO company (user_id, name, address, phone, logo, summary, field, financing)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new.user_id,
            new.name,
            new.address,
            new.phone,
            new.logo,
            new.summary,
            new.field,
            new.financing,
        ],
    )?;
    let id = conn.last_insert_rowid();

    tracing::debug!(company_id = id, user_id = new.user_id, "company created");

    get_company(conn, id)
}

pub fn get_company(conn: &Connection, id: i64) -> Result<Company, ModelError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM company WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| ModelError::not_found(ENTITY, id))
}

pub fn find_company_by_name(conn: &Connection, name: &str) -> Result<Option<Company>, ModelError> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM company WHERE name = ?1"),
            params![name],
            from_row,
        )
        .optional()?)
}

/// Lists all companies by name.
pub fn list_companies(conn: &Connection) -> Result<Vec<Company>, ModelError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM company ORDER BY name"))?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub(crate) fn list_companies_by_owner(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<Company>, ModelError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM company WHERE user_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![user_id], from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub fn update_company(
    conn: &Connection,
    id: i64,
    changes: &UpdateCompany,
) -> Result<Company, ModelError> {
    let mut set = Assignments::new();
    set.set("name", changes.name.clone());
    set.set("address", changes.address.clone());
    set.set("phone", changes.phone.clone());
    set.set("logo", changes.logo.clone());
    set.set("summary", changes.summary.clone());
    set.set("field", changes.field.clone());
    set.set("financing", changes.financing.clone());

    let changed = set.execute(conn, "company", id)?;

    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }

    get_company(conn, id)
}

/// Deletes a company. Rejected by the store while jobs reference it.
pub fn delete_company(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let changed = conn.execute("DELETE FROM company WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(ModelError::not_found(ENTITY, id));
    }
    Ok(())
}

/// The account that manages the company, or `None` when `user_id` is NULL.
pub fn owner(conn: &Connection, company: &Company) -> Result<Option<User>, ModelError> {
    company
        .user_id
        .map(|user_id| user::get_user(conn, user_id))
        .transpose()
}

/// Job postings published by the company.
pub fn jobs(conn: &Connection, company_id: i64) -> Result<Vec<Job>, ModelError> {
    job::list_jobs_by_company(conn, company_id)
}
