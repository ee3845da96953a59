use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "HealthSync";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the data directory when set (tests, containers).
pub const DATA_DIR_ENV: &str = "HEALTHSYNC_DATA_DIR";

pub const DATABASE_FILE: &str = "healthsync.db";

/// Get the application data directory.
/// `$HEALTHSYNC_DATA_DIR` if set, otherwise ~/HealthSync/ (falls back to the
/// system temp dir when no home directory can be determined).
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Get the SQLite database path
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "healthsync_lib=info,healthsync=info,warn"
}
