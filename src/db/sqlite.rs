use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension};

use super::DatabaseError;

/// Catalog schema migrations, applied in order. Each script records its own
/// version in `schema_version`.
const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    include_str!("../../resources/migrations/001_catalog.sql"),
)];

/// Schema version this build reads and writes.
pub const SCHEMA_VERSION: i64 = 1;

/// How long a connection waits on a catalog file locked by another writer.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a catalog database file, creating or upgrading its schema.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    prepare(&conn)?;
    Ok(conn)
}

/// Open a migrated in-memory catalog database.
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    run_migrations(conn)?;
    Ok(())
}

/// Apply pending migrations and return the resulting schema version.
///
/// A file written by a newer build is refused rather than read with a schema
/// this build does not know.
pub fn run_migrations(conn: &Connection) -> Result<i64, DatabaseError> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DatabaseError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > found) {
        tracing::info!(version, "Applying catalog migration");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        tx.commit()?;
    }

    schema_version(conn)
}

/// Highest applied migration, 0 for a fresh database.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn fresh_database_has_catalog_schema() {
        let conn = open_memory_database().unwrap();
        assert_eq!(
            table_names(&conn),
            vec!["catalog_generation", "medications", "schema_version"]
        );
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn empty_connection_is_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn rerunning_migrations_is_a_no_op() {
        let conn = open_memory_database().unwrap();
        conn.execute("INSERT INTO medications (name) VALUES ('Paracetamol')", [])
            .unwrap();

        assert_eq!(run_migrations(&conn).unwrap(), SCHEMA_VERSION);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn newer_schema_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        {
            let conn = open_database(&path).unwrap();
            conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [SCHEMA_VERSION + 1])
                .unwrap();
        }

        let err = open_database(&path).unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::UnsupportedSchema { found, supported }
                if found == SCHEMA_VERSION + 1 && supported == SCHEMA_VERSION
        ));
    }

    #[test]
    fn generation_starts_at_zero() {
        let conn = open_memory_database().unwrap();
        let generation: i64 = conn
            .query_row("SELECT generation FROM catalog_generation WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(generation, 0);
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        {
            let conn = open_database(&path).unwrap();
            conn.execute("INSERT INTO medications (name) VALUES ('Paracetamol')", [])
                .unwrap();
        }

        let conn = open_database(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
