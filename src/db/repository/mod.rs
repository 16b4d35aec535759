//! Repository layer: catalog table operations.

mod medication;

pub use medication::*;
