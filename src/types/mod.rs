//! Core types for the toolshed engine.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed tool numbers and validated names
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Storage, inventory, search and observability settings

mod config;
mod errors;
mod ids;

pub use config::{
    Config, InventoryConfig, LocationMode, ObservabilityConfig, SearchConfig, StorageConfig,
    DATA_DIR_ENV, IMAGE_DIR_ENV,
};
pub use errors::{Error, Result};
pub use ids::{Borrower, LocationName, ToolName, ToolNumber};
