use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

use super::{CatalogError, CatalogProvider};
use crate::models::{CatalogEntry, Medication};

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, CatalogEntry>,
    generation: u64,
}

/// In-memory catalog keyed by name. Names are listed in ascending order and
/// every insertion bumps the generation.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: RwLock<MemoryState>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    /// Catalog of bare name-only records.
    pub fn from_names<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_entries(names.into_iter().map(Medication::named))
    }

    /// Load a JSON array of medication records.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let entries = read_json_entries(path)?;
        let count = entries.len();
        let catalog = Self::from_entries(entries)?;
        tracing::info!(
            path = %path.display(),
            entries = count,
            "Loaded catalog file"
        );
        Ok(catalog)
    }

    pub fn insert(&self, entry: CatalogEntry) -> Result<(), CatalogError> {
        if entry.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        let mut state = self.state.write().map_err(|_| CatalogError::LockPoisoned)?;
        if state.entries.contains_key(&entry.name) {
            return Err(CatalogError::DuplicateName(entry.name));
        }
        state.entries.insert(entry.name.clone(), entry);
        state.generation += 1;
        Ok(())
    }

    pub fn len(&self) -> Result<usize, CatalogError> {
        let state = self.state.read().map_err(|_| CatalogError::LockPoisoned)?;
        Ok(state.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len()? == 0)
    }

    /// All records in name order.
    pub fn entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let state = self.state.read().map_err(|_| CatalogError::LockPoisoned)?;
        Ok(state.entries.values().cloned().collect())
    }
}

impl CatalogProvider for MemoryCatalog {
    fn fetch_all_names(&self) -> Result<Vec<String>, CatalogError> {
        let state = self.state.read().map_err(|_| CatalogError::LockPoisoned)?;
        Ok(state.entries.keys().cloned().collect())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        let state = self.state.read().map_err(|_| CatalogError::LockPoisoned)?;
        Ok(state.entries.get(name).cloned())
    }

    fn generation(&self) -> Result<Option<u64>, CatalogError> {
        let state = self.state.read().map_err(|_| CatalogError::LockPoisoned)?;
        Ok(Some(state.generation))
    }
}

/// Parse a JSON catalog file (array of medication records).
pub fn read_json_entries(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CatalogError::Load(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&json)
        .map_err(|e| CatalogError::Parse(path.display().to_string(), e.to_string()))
}
