//! Inventory store: ordered tool collection and its persisted file.

use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::allocator::next_number;
use super::legacy;
use super::record::{Location, Marker, ToolPatch, ToolRecord};
use crate::persist;
use crate::types::{Error, InventoryConfig, LocationMode, Result, ToolName, ToolNumber};

// =============================================================================
// In-memory inventory
// =============================================================================

/// Ordered tool records. Insertion order is display and persistence order.
///
/// Spatial records must sit on a page below `page_count`.
#[derive(Debug, Clone)]
pub struct Inventory {
    mode: LocationMode,
    page_count: u32,
    records: Vec<ToolRecord>,
}

impl Inventory {
    pub fn new(mode: LocationMode) -> Self {
        Self {
            mode,
            page_count: InventoryConfig::default().page_count,
            records: Vec::new(),
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.location_mode).with_page_count(config.page_count)
    }

    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }

    pub fn mode(&self) -> LocationMode {
        self.mode
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Append a record whose number the caller already allocated.
    pub fn add(&mut self, record: ToolRecord) -> Result<()> {
        self.check_location(&record.location)?;
        if self.contains(record.number) {
            return Err(Error::validation(format!(
                "tool number {} is already in use",
                record.number
            )));
        }
        self.records.push(record);
        Ok(())
    }

    /// Allocate the next free number and append a new record.
    pub fn add_new(&mut self, name: ToolName, location: Location) -> Result<&ToolRecord> {
        let number = next_number(&self.numbers());
        self.add(ToolRecord::new(number, name, location))?;
        self.records
            .last()
            .ok_or_else(|| Error::validation(format!("tool {} was not stored", number)))
    }

    /// Remove by number. Absent numbers are a no-op.
    pub fn remove(&mut self, number: ToolNumber) -> Option<ToolRecord> {
        let idx = self.records.iter().position(|r| r.number == number)?;
        Some(self.records.remove(idx))
    }

    /// Mutate a record in place.
    pub fn update(&mut self, number: ToolNumber, patch: ToolPatch) -> Result<&ToolRecord> {
        if let Some(location) = &patch.location {
            self.check_location(location)?;
        }
        let record = self
            .records
            .iter_mut()
            .find(|r| r.number == number)
            .ok_or_else(|| Error::validation(format!("unknown tool number {}", number)))?;
        patch.apply(record);
        Ok(record)
    }

    pub fn get(&self, number: ToolNumber) -> Option<&ToolRecord> {
        self.records.iter().find(|r| r.number == number)
    }

    pub fn contains(&self, number: ToolNumber) -> bool {
        self.get(number).is_some()
    }

    pub fn records(&self) -> &[ToolRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolRecord> {
        self.records.iter()
    }

    pub fn numbers(&self) -> HashSet<u32> {
        self.records.iter().map(|r| r.number.get()).collect()
    }

    /// Records currently lent out, in store order.
    pub fn borrowed(&self) -> Vec<&ToolRecord> {
        self.records
            .iter()
            .filter(|r| r.borrowed_by.is_some())
            .collect()
    }

    /// Spatial markers to draw on `page`.
    pub fn markers_on_page(&self, page: u32) -> Vec<Marker> {
        self.records
            .iter()
            .filter_map(|r| match r.location {
                Location::Spatial { page: p, x, y } if p == page => Some(Marker {
                    number: r.number,
                    x,
                    y,
                    availability: r.availability(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_location(&self, location: &Location) -> Result<()> {
        if location.mode() != self.mode {
            return Err(Error::validation(format!(
                "location '{}' is {:?} but this inventory uses {:?} locations",
                location,
                location.mode(),
                self.mode
            )));
        }
        if let Location::Spatial { page, .. } = location {
            if *page >= self.page_count {
                return Err(Error::validation(format!(
                    "page {} does not exist; pages run from 0 to {}",
                    page,
                    self.page_count.saturating_sub(1)
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Persistence
// =============================================================================

/// A record left out of a load, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub line: usize,
    pub reason: String,
}

/// Result of [`InventoryStore::load_all`].
#[derive(Debug)]
pub struct LoadReport {
    pub inventory: Inventory,
    pub skipped: Vec<SkippedRecord>,
}

/// Inventory file on disk.
///
/// Records that fail schema checks (missing fields after legacy renaming,
/// duplicate numbers, wrong location variant, unparsable lines) are skipped
/// with a warning; the rest of the file still loads.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    path: PathBuf,
    atomic: bool,
}

impl InventoryStore {
    pub fn new(path: impl Into<PathBuf>, atomic: bool) -> Self {
        Self {
            path: path.into(),
            atomic,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file. A missing file is an empty inventory.
    pub fn load_all(&self, config: &InventoryConfig) -> Result<LoadReport> {
        let mut inventory = Inventory::from_config(config);
        let mut skipped = Vec::new();

        for entry in persist::read_entries(&self.path)? {
            let outcome = entry
                .value
                .map_err(|e| Error::schema(format!("unparsable line: {}", e)))
                .and_then(legacy::from_value)
                .and_then(|record| {
                    inventory
                        .add(record)
                        .map_err(|e| Error::schema(e.to_string()))
                });
            if let Err(err) = outcome {
                tracing::warn!(
                    "inventory_record_skipped: path={}, line={}, error={}",
                    self.path.display(),
                    entry.line,
                    err
                );
                skipped.push(SkippedRecord {
                    line: entry.line,
                    reason: err.to_string(),
                });
            }
        }

        tracing::info!(
            "inventory_loaded: path={}, records={}, skipped={}",
            self.path.display(),
            inventory.len(),
            skipped.len()
        );
        Ok(LoadReport { inventory, skipped })
    }

    /// Replace the file with every record, in store order.
    pub fn save_all(&self, inventory: &Inventory) -> Result<()> {
        let values: Vec<Value> = inventory
            .iter()
            .map(legacy::to_value)
            .collect::<Result<_>>()?;
        persist::write_lines(&self.path, values, self.atomic)
    }
}
