//! Database migration system for superlists.
//!
//! Tracks the schema version in the metadata table and applies any pending
//! steps from [`MIGRATIONS`], each inside its own transaction.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::{Migration, CREATE_METADATA_TABLE, MIGRATIONS};

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// The schema version produced by the latest migration.
#[must_use]
pub fn current_version() -> i32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Initialize the database schema.
///
/// Creates the metadata table if needed, then applies every migration newer
/// than the recorded schema version.
///
/// # Errors
///
/// Returns an error if schema creation or migration fails, or if the
/// database was written by a newer version of superlists.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let version = get_schema_version(conn)?;
    let latest = current_version();
    if version > latest {
        return Err(Error::DatabaseMigration {
            message: format!("database schema version {version} is newer than supported {latest}"),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > version) {
        apply(conn, migration)?;
    }

    Ok(())
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (fresh database).
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        None => Ok(0),
    }
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Apply one migration and record its version atomically.
fn apply(conn: &mut Connection, migration: &Migration) -> Result<()> {
    debug!(
        version = migration.version,
        name = migration.name,
        "Applying migration"
    );

    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)
        .map_err(|e| Error::DatabaseMigration {
            message: format!(
                "migration {} ({}) failed: {e}",
                migration.version, migration.name
            ),
        })?;
    set_schema_version(&tx, migration.version)?;
    tx.commit()?;

    info!(
        version = migration.version,
        name = migration.name,
        "Applied migration"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        conn.prepare(&format!("PRAGMA table_info({table})"))
            .unwrap()
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect()
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).expect("failed to initialize schema");

        for table in ["lists_item", "metadata"] {
            let count: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test]
    fn test_initialize_schema_adds_item_columns() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();

        let columns = column_names(&conn, "lists_item");
        assert_eq!(columns, vec!["id", "text", "created_at"]);
    }

    #[test]
    fn test_initialize_schema_sets_version() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), current_version());
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let mut conn = create_test_db();

        initialize_schema(&mut conn).expect("first init failed");
        initialize_schema(&mut conn).expect("second init failed");

        assert_eq!(get_schema_version(&conn).unwrap(), current_version());
    }

    #[test]
    fn test_upgrade_from_partial_schema() {
        let mut conn = create_test_db();
        conn.execute(CREATE_METADATA_TABLE, []).unwrap();
        conn.execute_batch(MIGRATIONS[0].sql).unwrap();
        set_schema_version(&conn, 1).unwrap();
        conn.execute("INSERT INTO lists_item DEFAULT VALUES", [])
            .unwrap();

        initialize_schema(&mut conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), current_version());
        let text: String = conn
            .query_row("SELECT text FROM lists_item", [], |row| row.get(0))
            .unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_get_schema_version_fresh_db() {
        let conn = create_test_db();
        conn.execute(CREATE_METADATA_TABLE, []).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_invalid_schema_version() {
        let conn = create_test_db();
        conn.execute(CREATE_METADATA_TABLE, []).unwrap();
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES (?1, 'abc')",
            [VERSION_KEY],
        )
        .unwrap();

        let err = get_schema_version(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_newer_schema_rejected() {
        let mut conn = create_test_db();
        conn.execute(CREATE_METADATA_TABLE, []).unwrap();
        set_schema_version(&conn, current_version() + 1).unwrap();

        let err = initialize_schema(&mut conn).unwrap_err();
        assert!(matches!(err, Error::DatabaseMigration { .. }));
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    fn test_current_version_matches_last_migration() {
        assert_eq!(current_version(), 3);
    }
}
