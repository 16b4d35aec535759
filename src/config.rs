use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Medident";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Medident/ on all platforms, or ./Medident when no home directory is known
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the SQLite catalog
pub fn default_catalog_path() -> PathBuf {
    app_data_dir().join("catalog.db")
}

/// Log filter used when RUST_LOG is unset
pub fn default_log_filter() -> &'static str {
    "medident=info,medident_lib=info"
}
