//! Creates and upgrades the job board schema.
//!
//! One SQL file per table (`000_user` through `004_jobwanted`), compiled in
//! with `include_str!`. A file's statements and its row in
//! `_jobplus_migrations` commit in the same transaction, so a half-applied
//! table is never recorded. [`run_migrations`] reports how many files it
//! applied so callers can log it.

use rusqlite::Connection;
use thiserror::Error;

struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// All migrations in order. New migrations are appended here.
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "000_user",
        sql: include_str!("migrations/000_user.sql"),
    },
    Migration {
        name: "001_personal",
        sql: include_str!("migrations/001_personal.sql"),
    },
    Migration {
        name: "002_company",
        sql: include_str!("migrations/002_company.sql"),
    },
    Migration {
        name: "003_job",
        sql: include_str!("migrations/003_job.sql"),
    },
    Migration {
        name: "004_jobwanted",
        sql: include_str!("migrations/004_jobwanted.sql"),
    },
];

/// Tables created by the embedded migrations, in dependency order.
pub const SCHEMA_TABLES: &[&str] = &["user", "personal", "company", "job", "jobwanted"];

/// Errors that can occur during migration execution.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A SQL statement within a migration failed.
    #[error("migration '{name}' failed: {source}")]
    ExecutionFailed {
        /// The name of the migration that failed.
        name: String,
        /// The underlying SQLite error.
        source: rusqlite::Error,
    },

    /// Failed to query migration state.
    #[error("failed to check migration state: {0}")]
    StateQuery(rusqlite::Error),
}

/// Runs all pending migrations against the given connection.
///
/// Returns the number of migrations applied by this call; zero when the
/// schema is already current.
///
/// # Errors
///
/// Returns `MigrationError` if any migration fails to execute or if the
/// migration tracking table cannot be queried.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    run_migrations_from_list(conn, MIGRATIONS)
}

fn run_migrations_from_list(
    conn: &Connection,
    migrations: &[Migration],
) -> Result<usize, MigrationError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _jobplus_migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| MigrationError::ExecutionFailed {
        name: "_jobplus_migrations_bootstrap".to_string(),
        source: e,
    })?;

    let mut applied = 0;

    for migration in migrations {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _jobplus_migrations WHERE name = ?1",
                [migration.name],
                |row| row.get(0),
            )
            .map_err(MigrationError::StateQuery)?;

        if already_applied {
            tracing::debug!(
                migration = migration.name,
                "migration already applied, skipping"
            );
            continue;
        }

        tracing::info!(migration = migration.name, "applying migration");

        let failed = |e: rusqlite::Error| MigrationError::ExecutionFailed {
            name: migration.name.to_string(),
            source: e,
        };

        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(migration.sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO _jobplus_migrations (name) VALUES (?1)",
            [migration.name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [table],
            |row| row.get(0),
        )
        .expect("should query sqlite_master")
    }

    #[test]
    fn run_migrations_on_fresh_db() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        let applied = run_migrations(&conn).expect("migrations should succeed");
        assert_eq!(applied, MIGRATIONS.len());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM _jobplus_migrations", [], |row| {
                row.get(0)
            })
            .expect("should query migration count");
        assert_eq!(count, 5);
    }

    #[test]
    fn run_migrations_idempotent() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");

        let first = run_migrations(&conn).expect("first run should succeed");
        assert_eq!(first, 5);

        let second = run_migrations(&conn).expect("second run should succeed");
        assert_eq!(second, 0, "no new migrations to apply");
    }

    #[test]
    fn creates_every_schema_table() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        for table in SCHEMA_TABLES {
            assert!(table_exists(&conn, table), "{table} table should exist");
        }
    }

    #[test]
    fn user_columns_match_schema() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        let mut stmt = conn
            .prepare("SELECT name FROM pragma_table_info('user') ORDER BY cid")
            .expect("should prepare table_info");
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .expect("should query table_info")
            .collect::<Result<_, _>>()
            .expect("should read column names");

        assert_eq!(
            columns,
            [
                "id",
                "name",
                "email",
                "password",
                "role",
                "addtime",
                "created_at",
                "updated_at"
            ]
        );
    }

    #[test]
    fn role_defaults_to_regular_user() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        conn.execute(
            "INSERT INTO \"user\" (name, password) VALUES ('bob', 'x')",
            [],
        )
        .expect("should insert user");
        let role: i16 = conn
            .query_row("SELECT role FROM \"user\" WHERE name = 'bob'", [], |row| {
                row.get(0)
            })
            .expect("should read role");
        assert_eq!(role, 10);
    }

    #[test]
    fn created_at_cannot_be_rewritten() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        conn.execute(
            "INSERT INTO \"user\" (name, password) VALUES ('carol', 'x')",
            [],
        )
        .expect("should insert user");
        let err = conn
            .execute(
                "UPDATE \"user\" SET created_at = '2000-01-01 00:00:00.000' WHERE name = 'carol'",
                [],
            )
            .expect_err("created_at rewrite should be rejected");
        assert!(err.to_string().contains("immutable"), "unexpected error: {err}");
    }

    #[test]
    fn names_passwords_and_links_are_nullable() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        let nullable = [
            ("user", "name"),
            ("user", "password"),
            ("personal", "user_id"),
            ("company", "user_id"),
            ("company", "name"),
            ("job", "company_id"),
            ("jobwanted", "personal_id"),
            ("jobwanted", "job_id"),
        ];
        for (table, column) in nullable {
            let notnull: bool = conn
                .query_row(
                    &format!("SELECT \"notnull\" FROM pragma_table_info('{table}') WHERE name = ?1"),
                    [column],
                    |row| row.get(0),
                )
                .expect("column should exist");
            assert!(!notnull, "{table}.{column} should accept NULL");
        }

        conn.execute("INSERT INTO \"user\" DEFAULT VALUES", [])
            .expect("a user row needs no values");
    }

    #[test]
    fn oversize_values_are_rejected() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");

        let long_name = "n".repeat(101);
        let result = conn.execute(
            "INSERT INTO \"user\" (name, password) VALUES (?1, 'x')",
            [&long_name],
        );
        assert!(result.is_err(), "101-char user name should violate CHECK");
    }

    #[test]
    fn migration_side_effects_rollback_when_tracking_insert_fails() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        let migrations = [Migration {
            name: "001_tracking_insert_conflict",
            sql: "
                CREATE TABLE rollback_probe (id INTEGER PRIMARY KEY);
                INSERT INTO _jobplus_migrations (name) VALUES ('001_tracking_insert_conflict');
            ",
        }];

        let err = run_migrations_from_list(&conn, &migrations)
            .expect_err("tracking insert conflict should fail migration");

        match err {
            MigrationError::ExecutionFailed { name, .. } => {
                assert_eq!(name, "001_tracking_insert_conflict")
            }
            other => panic!("unexpected error type: {other:?}"),
        }

        assert!(
            !table_exists(&conn, "rollback_probe"),
            "schema side effects should be rolled back when tracking insert fails"
        );
    }
}
