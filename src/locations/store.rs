//! Location registry persistence: the locations file and the bindings file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::registry::LocationRegistry;
use crate::persist;
use crate::types::{LocationName, Result};

/// One line of the bindings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Binding {
    location: LocationName,
    image: String,
}

/// The two files backing a [`LocationRegistry`].
#[derive(Debug, Clone)]
pub struct LocationStore {
    locations_path: PathBuf,
    bindings_path: PathBuf,
    atomic: bool,
}

impl LocationStore {
    pub fn new(
        locations_path: impl Into<PathBuf>,
        bindings_path: impl Into<PathBuf>,
        atomic: bool,
    ) -> Self {
        Self {
            locations_path: locations_path.into(),
            bindings_path: bindings_path.into(),
            atomic,
        }
    }

    /// Load both files; missing files are empty.
    ///
    /// Bad lines are skipped with a warning. A binding whose location is not
    /// in the locations file registers that location too.
    pub fn load(&self) -> Result<LocationRegistry> {
        let mut registry = LocationRegistry::new();

        for entry in persist::read_entries(&self.locations_path)? {
            match entry.value.map(serde_json::from_value::<LocationName>) {
                Ok(Ok(name)) => {
                    registry.add_location(name);
                }
                Ok(Err(e)) | Err(e) => tracing::warn!(
                    "location_skipped: path={}, line={}, error={}",
                    self.locations_path.display(),
                    entry.line,
                    e
                ),
            }
        }

        for entry in persist::read_entries(&self.bindings_path)? {
            match entry.value.map(serde_json::from_value::<Binding>) {
                Ok(Ok(binding)) => {
                    registry.add_location(binding.location.clone());
                    registry.restore_binding(binding.location, binding.image);
                }
                Ok(Err(e)) | Err(e) => tracing::warn!(
                    "location_binding_skipped: path={}, line={}, error={}",
                    self.bindings_path.display(),
                    entry.line,
                    e
                ),
            }
        }

        tracing::info!(
            "locations_loaded: locations={}, bindings={}",
            registry.len(),
            registry.bindings().len()
        );
        Ok(registry)
    }

    /// Overwrite both files with the registry's contents.
    pub fn save(&self, registry: &LocationRegistry) -> Result<()> {
        persist::write_lines(&self.locations_path, registry.names(), self.atomic)?;
        let bindings = registry.bindings().into_iter().map(|(location, image)| Binding {
            location: location.clone(),
            image: image.to_string(),
        });
        persist::write_lines(&self.bindings_path, bindings, self.atomic)
    }
}
