pub mod medication;

pub use medication::Medication;

/// Catalog records are medication records.
pub type CatalogEntry = Medication;
