use std::fs;

use jobplus::models::user::{self, NewUser};
use jobplus::{init_tracing, load_config, DatabaseConfig, LoggingConfig, Store};

fn file_config(dir: &tempfile::TempDir) -> DatabaseConfig {
    DatabaseConfig {
        path: dir
            .path()
            .join("jobplus.db")
            .to_str()
            .expect("temp path should be utf-8")
            .to_string(),
        ..DatabaseConfig::default()
    }
}

#[test]
fn store_persists_across_reopen() {
    init_tracing(&LoggingConfig::default());
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = file_config(&dir);

    {
        let store = Store::open(&config).expect("failed to open store");
        let conn = store.connection().expect("failed to check out");
        user::create_user(&conn, &NewUser::new("alice", "secret123"))
            .expect("failed to create user");
    }

    let store = Store::open(&config).expect("failed to reopen store");
    let conn = store.connection().expect("failed to check out");

    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM _jobplus_migrations", [], |row| row.get(0))
        .expect("failed to count migrations");
    assert_eq!(applied, 5, "reopen should not reapply migrations");

    let alice = user::authenticate(&conn, "alice", "secret123")
        .expect("authenticate failed")
        .expect("alice should log in");
    assert_eq!(alice.name.as_deref(), Some("alice"));
}

#[test]
fn in_memory_store_shares_schema_across_connections() {
    let config = DatabaseConfig {
        path: ":memory:".to_string(),
        ..DatabaseConfig::default()
    };
    let store = Store::open(&config).expect("failed to open in-memory store");

    let a = store.connection().expect("failed to check out first");
    let b = store.connection().expect("failed to check out second");

    let created = user::create_user(&a, &NewUser::new("alice", "secret123"))
        .expect("failed to create user");
    let seen = user::find_user_by_name(&b, "alice")
        .expect("second connection should see the schema")
        .expect("second connection should see the row");
    assert_eq!(seen.id, created.id);

    let other = Store::open(&config).expect("failed to open second store");
    let conn = other.connection().expect("failed to check out");
    assert!(user::find_user_by_name(&conn, "alice")
        .expect("other store should be migrated")
        .is_none());
}

#[test]
fn pooled_connections_enforce_foreign_keys() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = Store::open(&file_config(&dir)).expect("failed to open store");
    let conn = store.connection().expect("failed to check out");

    let result = conn.execute(
        "INSERT INTO jobwanted (personal_id, job_id) VALUES (1, 1)",
        [],
    );
    assert!(result.is_err(), "dangling application should be rejected");
}

#[test]
fn config_file_drives_store() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join("from-file.db");
    let config_path = dir.path().join("jobplus.toml");
    fs::write(
        &config_path,
        format!(
            "[database]\npath = {:?}\npool_max_size = 2\n\n[logging]\nlevel = \"debug\"\n",
            db_path.to_str().expect("temp path should be utf-8")
        ),
    )
    .expect("failed to write config");

    let config = load_config(Some(config_path.to_str().expect("utf-8 path")))
        .expect("failed to load config");
    assert_eq!(config.database.pool_max_size, 2);
    assert_eq!(config.logging.level, "debug");

    let store = Store::open(&config.database).expect("failed to open store");
    assert_eq!(store.pool().max_size(), 2);
    assert!(db_path.exists());
}

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let missing = dir.path().join("absent.toml");

    let config = load_config(Some(missing.to_str().expect("utf-8 path")))
        .expect("missing file should not be an error");
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[database\npath = 1").expect("failed to write config");

    let result = load_config(Some(path.to_str().expect("utf-8 path")));
    assert!(matches!(result, Err(jobplus::ConfigError::Parse(_))));
}
