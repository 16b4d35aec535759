//! Reference catalog access.
//!
//! The matcher never talks to storage directly. It reads a snapshot of names
//! through `CatalogProvider`, and asks for the full record of an accepted name
//! afterwards.

pub mod cache;
pub mod memory;
pub mod sqlite;

pub use cache::{CatalogCache, PreparedCatalog, PreparedName};
pub use memory::MemoryCatalog;
pub use sqlite::SqliteCatalog;

use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::CatalogEntry;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Failed to read catalog file {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse catalog file {0}: {1}")]
    Parse(String, String),

    #[error("Duplicate catalog name: {0}")]
    DuplicateName(String),

    #[error("Catalog name cannot be empty")]
    EmptyName,

    #[error("Catalog listed {0} but has no record for it")]
    MissingRecord(String),

    #[error("Catalog lock poisoned")]
    LockPoisoned,
}

/// Source of catalog names and records.
pub trait CatalogProvider: Send + Sync {
    /// Full, ordered snapshot of the known names.
    fn fetch_all_names(&self) -> Result<Vec<String>, CatalogError>;

    /// Full record for a name returned by `fetch_all_names`.
    fn find_by_name(&self, name: &str) -> Result<Option<CatalogEntry>, CatalogError>;

    /// Number that changes whenever the catalog changes. `None` disables
    /// snapshot caching for this provider.
    fn generation(&self) -> Result<Option<u64>, CatalogError> {
        Ok(None)
    }
}
