pub mod catalog;
pub mod config;
pub mod db;
pub mod matching;
pub mod models;
pub mod recognition;

pub use catalog::{CatalogError, CatalogProvider, MemoryCatalog, SqliteCatalog};
pub use matching::{resolve_names, MatchOutcome, MatchResult, MatcherConfig, Resolver};
pub use models::{CatalogEntry, Medication};
pub use recognition::{identify_image, Identification, TextRecognizer};

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber, honouring RUST_LOG when set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
