//! Locations: the named-location registry, its files, and image discovery.

pub mod images;
pub mod registry;
pub mod store;

pub use images::{list_candidates, page_image};
pub use registry::LocationRegistry;
pub use store::LocationStore;
