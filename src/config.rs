use std::path::{Path, PathBuf};

/// Application-level constants
pub const APP_NAME: &str = "HealthOps";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the operations database, as exported by the data team.
pub const DATABASE_FILENAME: &str = "healthcare_data.db";

/// Environment variable that overrides the database location.
pub const DATABASE_ENV: &str = "HEALTHOPS_DB";

/// Rows shown by the claims preview when no limit is given.
pub const DEFAULT_PREVIEW_LIMIT: u32 = 5;

/// Upper bound on preview rows, whatever the caller asks for.
pub const MAX_PREVIEW_LIMIT: u32 = 500;

/// Width in characters of the longest bar in console charts.
pub const CHART_BAR_WIDTH: usize = 40;

/// Get the application data directory
/// ~/HealthOps/ on all platforms
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Resolve the database path when none was given on the command line.
///
/// A database in the working directory wins (that is where the export
/// scripts drop it); otherwise the file under the app data directory.
pub fn default_database_path() -> PathBuf {
    resolve_database_path(Path::new("."))
}

fn resolve_database_path(working_dir: &Path) -> PathBuf {
    let local = working_dir.join(DATABASE_FILENAME);
    if local.is_file() {
        return local;
    }
    app_data_dir().join(DATABASE_FILENAME)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "healthops_lib=info,healthops=info,warn"
}
