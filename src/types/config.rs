//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file and environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::{Error, Result};

/// Environment override for [`StorageConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "TOOLSHED_DATA_DIR";

/// Environment override for [`StorageConfig::image_dir`].
pub const IMAGE_DIR_ENV: &str = "TOOLSHED_IMAGE_DIR";

/// Global engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the inventory and location files live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Inventory representation choices.
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Search tuning.
    #[serde(default)]
    pub search: SearchConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from `path` (if given), then apply env overrides.
    ///
    /// A missing file is an error when explicitly requested.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)?;
                serde_json::from_str(&text)?
            }
            None => Config::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.storage.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(dir) = std::env::var(IMAGE_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.storage.image_dir = PathBuf::from(dir);
            }
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.search.fuzzy_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(Error::validation(format!(
                "search.fuzzy_threshold must be in [0, 1), got {}",
                threshold
            )));
        }
        if self.inventory.page_count == 0 {
            return Err(Error::validation("inventory.page_count must be positive"));
        }
        for (field, name) in [
            ("storage.inventory_file", &self.storage.inventory_file),
            ("storage.locations_file", &self.storage.locations_file),
            ("storage.bindings_file", &self.storage.bindings_file),
        ] {
            if name.trim().is_empty() {
                return Err(Error::validation(format!("{} cannot be empty", field)));
            }
        }
        Ok(())
    }
}

/// File locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted files.
    pub data_dir: PathBuf,

    /// Directory scanned for candidate location images.
    pub image_dir: PathBuf,

    /// Inventory file name, relative to `data_dir`.
    pub inventory_file: String,

    /// Location list file name, relative to `data_dir`.
    pub locations_file: String,

    /// Location → image bindings file name, relative to `data_dir`.
    pub bindings_file: String,

    /// Write to a temporary sibling and rename over the target.
    pub atomic_writes: bool,
}

impl StorageConfig {
    pub fn inventory_path(&self) -> PathBuf {
        self.data_dir.join(&self.inventory_file)
    }

    pub fn locations_path(&self) -> PathBuf {
        self.data_dir.join(&self.locations_file)
    }

    pub fn bindings_path(&self) -> PathBuf {
        self.data_dir.join(&self.bindings_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            image_dir: PathBuf::from("."),
            inventory_file: "inventory.jsonl".to_string(),
            locations_file: "locations.jsonl".to_string(),
            bindings_file: "location_images.jsonl".to_string(),
            atomic_writes: true,
        }
    }
}

/// Which location representation a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    /// `(page, x, y)` on a workshop photo.
    #[default]
    Spatial,
    /// A name from the location registry.
    Named,
}

/// Inventory representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub location_mode: LocationMode,

    /// Number of workshop photo pages (spatial mode).
    pub page_count: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            location_mode: LocationMode::Spatial,
            page_count: 3,
        }
    }
}

/// Search tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fuzzy candidates must score strictly above this ratio.
    pub fuzzy_threshold: f64,

    /// Optional upper bound on fuzzy candidates offered for disambiguation.
    /// Unset keeps every candidate above the threshold.
    pub max_fuzzy_candidates: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.5,
            max_fuzzy_candidates: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
