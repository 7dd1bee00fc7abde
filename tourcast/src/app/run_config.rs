use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tourcast_core::linking::LinkingConfig;
use tourcast_core::tour::TourConfig;

use super::error::TourcastError;

/// TOML run configuration: input tables, output directory, and the
/// `[linking]` and `[tours]` sections deserialized straight into the
/// core configuration types. omitted sections take the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub households_input: PathBuf,
    pub persons_input: PathBuf,
    pub segments_input: PathBuf,
    pub output_directory: PathBuf,
    #[serde(default)]
    pub linking: LinkingConfig,
    #[serde(default)]
    pub tours: TourConfig,
}

impl RunConfig {
    pub fn from_path(path: &Path) -> Result<RunConfig, TourcastError> {
        let contents = std::fs::read_to_string(path).map_err(|e| TourcastError::ReadError {
            filepath: path.to_string_lossy().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| TourcastError::ConfigError {
            filepath: path.to_string_lossy().to_string(),
            error: e.to_string(),
        })
    }
}
