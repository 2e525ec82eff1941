//! # Toolshed - Workshop Tool Inventory Engine
//!
//! Tracks physical tools: number, name, where they live and who has them.
//! - Ordered inventory with full-file persistence after every change
//! - Transparent loading of records written under the first schema's field names
//! - Smallest-free tool number allocation
//! - Named locations with optional display images
//! - Staged search: exact number, partial name, then fuzzy name
//! - Selection state with mandatory disambiguation for uncertain matches
//!
//! ## Architecture
//!
//! A single [`Session`] owns all mutable state; the display layer calls into
//! it and drains [`SessionEvent`]s afterwards:
//! ```text
//!                    ┌─────────────────────────────────┐
//!   UI actions    →  │            Session              │
//!                    │  ┌─────────┐ ┌─────────┐        │
//!                    │  │Inventory│ │Location │        │
//!                    │  │ + Store │ │Registry │        │
//!                    │  └─────────┘ └─────────┘        │
//!                    │  ┌─────────┐ ┌─────────┐        │
//!                    │  │ Search  │ │Selection│        │
//!                    │  │ Engine  │ │         │        │
//!                    │  └─────────┘ └─────────┘        │
//!                    └─────────────────────────────────┘
//! ```
//!
//! Image decoding, scaling and click-to-pixel mapping stay in the display layer.

// Enforce strict safety at compile time
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod events;
pub mod inventory;
pub mod locations;
pub mod search;
pub mod session;
pub mod types;

// Internal utilities
pub mod observability;
pub mod persist;

pub use events::{FormFields, SessionEvent};
pub use inventory::{Inventory, InventoryStore, Location, ToolRecord};
pub use search::{SearchEngine, SearchOutcome};
pub use session::Session;
pub use types::{Config, Error, Result};
