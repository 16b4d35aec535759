//! Prepared catalog snapshots and a generation-keyed cache of them.
//!
//! Preparing a catalog means bringing every name into comparison form once
//! per snapshot instead of once per scoring call. The cache only holds a
//! snapshot for providers that report a generation number, and drops it as
//! soon as the provider reports a different one.

use std::sync::{Arc, RwLock};

use super::{CatalogError, CatalogProvider};
use crate::matching::normalize::clean;

/// A catalog name next to its cleaned comparison form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedName {
    pub name: String,
    pub comparable: String,
}

/// Immutable snapshot of catalog names ready for scoring.
#[derive(Debug, Clone, Default)]
pub struct PreparedCatalog {
    generation: Option<u64>,
    names: Vec<PreparedName>,
}

impl PreparedCatalog {
    pub fn from_names<I, S>(generation: Option<u64>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let comparable = clean(&name);
                PreparedName { name, comparable }
            })
            .collect();
        Self { generation, names }
    }

    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    pub fn names(&self) -> &[PreparedName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read-mostly cache holding the last prepared snapshot.
#[derive(Debug, Default)]
pub struct CatalogCache {
    slot: RwLock<Option<Arc<PreparedCatalog>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a prepared snapshot of `provider`, reusing the cached one when
    /// the provider's generation has not moved.
    pub fn load(&self, provider: &dyn CatalogProvider) -> Result<Arc<PreparedCatalog>, CatalogError> {
        let generation = provider.generation()?;

        if let Some(current) = generation {
            if let Some(hit) = self.lookup(current) {
                tracing::debug!(generation = current, "Catalog cache hit");
                return Ok(hit);
            }
        }

        let names = provider.fetch_all_names()?;
        let prepared = Arc::new(PreparedCatalog::from_names(generation, names));
        tracing::debug!(
            generation = ?generation,
            names = prepared.len(),
            "Prepared catalog snapshot"
        );

        if generation.is_some() {
            if let Ok(mut slot) = self.slot.write() {
                *slot = Some(Arc::clone(&prepared));
            }
        }

        Ok(prepared)
    }

    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }

    /// Generation of the cached snapshot, if any.
    pub fn cached_generation(&self) -> Option<u64> {
        self.slot
            .read()
            .ok()
            .and_then(|slot| slot.as_ref().and_then(|c| c.generation()))
    }

    fn lookup(&self, generation: u64) -> Option<Arc<PreparedCatalog>> {
        let slot = self.slot.read().ok()?;
        slot.as_ref()
            .filter(|cached| cached.generation() == Some(generation))
            .map(Arc::clone)
    }
}
