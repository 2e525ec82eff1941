//! Tool inventory: records, number allocation, legacy-aware persistence.
//!
//! The [`Inventory`] owns the ordered record list; [`InventoryStore`] is the
//! full-overwrite file it round-trips through. Persisted records written
//! under the first schema's field names load transparently (see [`legacy`]).

pub mod allocator;
pub mod legacy;
pub mod record;
pub mod store;

pub use allocator::next_number;
pub use record::{Availability, Location, Marker, ToolPatch, ToolRecord};
pub use store::{Inventory, InventoryStore, LoadReport, SkippedRecord};
