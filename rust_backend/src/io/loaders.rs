use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::TimeMapConfig;
use crate::parsing::timeline_parser::{self, TimelineRecord};
use crate::pipeline::time_map::{TimeMapMode, TimeMapOutput, TimeMapPipeline};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "timemap.toml";

/// Loads timeline records from JSON files
pub struct TimelineLoader;

impl TimelineLoader {
    /// Load timeline records from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Vec<TimelineRecord>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read timeline file: {}", path.display()))?;

        Self::load_from_str(&content)
            .with_context(|| format!("Failed to parse timeline file: {}", path.display()))
    }

    /// Load timeline records from a JSON string
    pub fn load_from_str(json_str: &str) -> Result<Vec<TimelineRecord>> {
        timeline_parser::parse_timeline_json_str(json_str)
            .context("Failed to parse timeline JSON string")
    }

    /// Load a timeline file and build the requested view in one step
    pub fn build_from_file(
        path: &Path,
        pipeline: &TimeMapPipeline,
        mode: TimeMapMode,
    ) -> Result<TimeMapOutput> {
        let records = Self::load_from_file(path)?;
        pipeline
            .run_records(&records, mode)
            .with_context(|| format!("Failed to build time map from {}", path.display()))
    }
}

/// Loads [`TimeMapConfig`] from TOML files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<TimeMapConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        TimeMapConfig::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load configuration from the first `timemap.toml` found in the
    /// standard locations, falling back to defaults when there is none.
    ///
    /// Searches:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn load_default() -> Result<TimeMapConfig> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("rust_backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths.iter() {
            if path.exists() {
                log::info!("Loading time map config from {}", path.display());
                return Self::load_from_file(path);
            }
        }

        log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        Ok(TimeMapConfig::default())
    }
}
