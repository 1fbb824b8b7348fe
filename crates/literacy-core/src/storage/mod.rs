mod config;
pub mod database;
pub mod progress;

pub use config::{AnalysisConfig, Config, ExportConfig, SurveyConfig};
pub use database::Database;
pub use progress::{ProgressStore, SavedProgress};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `LITERACY_DATA_DIR` overrides the location entirely. Otherwise the
/// directory is `~/.config/literacy-survey[-dev]/`; set `LITERACY_ENV=dev`
/// to use the development directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LITERACY_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LITERACY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("literacy-survey-dev")
            } else {
                base_dir.join("literacy-survey")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
