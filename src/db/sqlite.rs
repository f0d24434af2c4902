use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension};

use super::DatabaseError;

/// Versioned schema scripts, applied in order. Each script records its own
/// row in `schema_version`.
const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    include_str!("../../resources/migrations/001_initial.sql"),
)];

/// Scanner stations write concurrently with the office PC; wait instead of
/// failing with SQLITE_BUSY.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the inspection database at `path`, creating parent directories and
/// bringing the schema up to date.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| DatabaseError::Storage {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    prepare(Connection::open(path)?)
}

/// Fresh, fully migrated in-memory database.
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<Connection, DatabaseError> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA journal_mode=DELETE; PRAGMA foreign_keys=ON;")?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Apply every migration newer than the stored schema version.
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current = schema_version(conn)?;
    for &(version, script) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        tracing::info!(version, "Applying schema migration");
        conn.execute_batch(&format!("BEGIN;\n{script}\nCOMMIT;"))
            .map_err(|e| {
                let _ = conn.execute_batch("ROLLBACK;");
                DatabaseError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                }
            })?;
    }
    Ok(())
}

/// Highest applied migration, 0 for an empty database.
pub fn schema_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let has_table = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !has_table {
        return Ok(0);
    }
    let version: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// Number of user tables, used by health checks and tests.
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_database_has_inspection_tables() {
        let conn = open_memory_database().unwrap();
        // components, detections, schema_version
        assert_eq!(count_tables(&conn).unwrap(), 3);
        assert_eq!(schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn empty_database_is_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn rerunning_migrations_is_a_no_op() {
        let conn = open_memory_database().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn foreign_keys_enforced() {
        let conn = open_memory_database().unwrap();
        let err = conn
            .execute(
                "INSERT INTO detections (kind, component_kind, component_id)
                 VALUES ('motor_worm', 'motor', 'M-ghost')",
                [],
            )
            .unwrap_err();
        assert!(DatabaseError::from(err).is_constraint_violation());
    }

    #[test]
    fn file_database_keeps_rows_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("station-3").join("pda.db");
        {
            let conn = open_database(&path).unwrap();
            conn.execute(
                "INSERT INTO components (kind, component_id, task_id, created_at)
                 VALUES ('palm', 'P-1', 'T-1', '2025-01-01 00:00:00')",
                [],
            )
            .unwrap();
        }
        let conn = open_database(&path).unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM components", [], |row| row.get(0))
            .unwrap();
        assert_eq!(n, 1);
    }
}
