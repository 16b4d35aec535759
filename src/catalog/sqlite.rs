use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::{CatalogError, CatalogProvider};
use crate::db::{self, DatabaseError};
use crate::models::CatalogEntry;

/// Catalog backed by the `medications` table.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open (and migrate) a catalog database file.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Opened catalog database");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Ok(Self::from_connection(db::open_memory_database()?))
    }

    /// Wrap an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn insert(&self, entry: &CatalogEntry) -> Result<i64, CatalogError> {
        let conn = self.lock()?;
        insert_entry(&conn, entry)
    }

    /// Insert every entry in one transaction. Any failure rolls the whole
    /// batch back and leaves the catalog as it was.
    pub fn import(&self, entries: &[CatalogEntry]) -> Result<usize, CatalogError> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;

        for entry in entries {
            insert_entry(&tx, entry)?;
        }

        tx.commit().map_err(DatabaseError::from)?;
        tracing::info!(imported = entries.len(), "Imported catalog entries");
        Ok(entries.len())
    }

    pub fn remove(&self, name: &str) -> Result<bool, CatalogError> {
        let conn = self.lock()?;
        Ok(db::delete_medication_by_name(&conn, name)?)
    }

    pub fn count(&self) -> Result<i64, CatalogError> {
        let conn = self.lock()?;
        Ok(db::count_medications(&conn)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn.lock().map_err(|_| CatalogError::LockPoisoned)
    }
}

fn insert_entry(conn: &Connection, entry: &CatalogEntry) -> Result<i64, CatalogError> {
    if entry.name.trim().is_empty() {
        return Err(CatalogError::EmptyName);
    }
    match db::insert_medication(conn, entry) {
        Ok(id) => Ok(id),
        Err(DatabaseError::ConstraintViolation(_)) => {
            Err(CatalogError::DuplicateName(entry.name.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

impl CatalogProvider for SqliteCatalog {
    fn fetch_all_names(&self) -> Result<Vec<String>, CatalogError> {
        let conn = self.lock()?;
        Ok(db::list_medication_names(&conn)?)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        let conn = self.lock()?;
        Ok(db::get_medication_by_name(&conn, name)?)
    }

    fn generation(&self) -> Result<Option<u64>, CatalogError> {
        let conn = self.lock()?;
        Ok(Some(db::catalog_generation(&conn)?))
    }
}
