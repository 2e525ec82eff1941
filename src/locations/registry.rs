//! Location registry: named locations and their display images.
//!
//! Tools refer to locations by name only. Removing a binding or never
//! adding one is fine: callers render a placeholder for `None`.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::{Error, LocationName, Result};

/// Named locations in insertion order, each optionally bound to an image.
#[derive(Debug, Default, Clone)]
pub struct LocationRegistry {
    names: Vec<LocationName>,
    images: HashMap<LocationName, String>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location. Returns `false` if it already existed.
    pub fn add_location(&mut self, name: LocationName) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &LocationName) -> bool {
        self.names.contains(name)
    }

    /// Bind `image` to `name`, replacing any earlier binding.
    ///
    /// `candidates` are the images the user could have chosen from.
    pub fn link_image(
        &mut self,
        name: &LocationName,
        image: &str,
        candidates: &[String],
    ) -> Result<()> {
        if candidates.is_empty() {
            return Err(Error::no_images_available(format!(
                "no images to link to location '{}'",
                name
            )));
        }
        if !self.contains(name) {
            return Err(Error::validation(format!("unknown location '{}'", name)));
        }
        if !candidates.iter().any(|c| c == image) {
            return Err(Error::validation(format!(
                "'{}' is not one of the available images",
                image
            )));
        }
        self.images.insert(name.clone(), image.to_string());
        Ok(())
    }

    /// Bind without candidate checks. Used when loading persisted bindings.
    pub(crate) fn restore_binding(&mut self, name: LocationName, image: String) {
        self.images.insert(name, image);
    }

    /// Drop a binding. Returns the old image, if any.
    pub fn unlink_image(&mut self, name: &LocationName) -> Option<String> {
        self.images.remove(name)
    }

    pub fn image_for(&self, name: &LocationName) -> Option<&str> {
        self.images.get(name).map(String::as_str)
    }

    /// Names in insertion (persistence) order.
    pub fn names(&self) -> &[LocationName] {
        &self.names
    }

    /// Names in display order: numeric tokens numerically and first, the rest lexically.
    pub fn sorted_names(&self) -> Vec<&LocationName> {
        let mut names: Vec<&LocationName> = self.names.iter().collect();
        names.sort_by(|a, b| display_order(a.as_str(), b.as_str()));
        names
    }

    /// Bindings in display order of their location.
    pub fn bindings(&self) -> Vec<(&LocationName, &str)> {
        let mut pairs: Vec<(&LocationName, &str)> = self
            .images
            .iter()
            .map(|(k, v)| (k, v.as_str()))
            .collect();
        pairs.sort_by(|a, b| display_order(a.0.as_str(), b.0.as_str()));
        pairs
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn display_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
