//! Tool number allocation.

use std::collections::HashSet;

use crate::types::ToolNumber;

/// Smallest positive integer not in `existing`.
///
/// Only `1..=existing.len() + 1` needs scanning: by pigeonhole, that range
/// always holds at least one free value.
pub fn next_number(existing: &HashSet<u32>) -> ToolNumber {
    let bound = u32::try_from(existing.len()).map_or(u32::MAX, |n| n.saturating_add(1));
    (1..=bound)
        .find(|n| !existing.contains(n))
        .and_then(ToolNumber::new)
        .unwrap_or(ToolNumber::MAX)
}
