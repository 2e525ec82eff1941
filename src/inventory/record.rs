//! Tool record: the tracked entity and its location variants.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Borrower, Error, LocationMode, LocationName, Result, ToolName, ToolNumber};

// =============================================================================
// Location
// =============================================================================

/// Where a tool lives.
///
/// A deployment uses exactly one variant (see [`LocationMode`]); the
/// inventory refuses records of the other variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Pixel position on a workshop photo page, in unscaled image coordinates.
    Spatial { page: u32, x: u32, y: u32 },
    /// A name from the location registry.
    Named(LocationName),
}

impl Location {
    pub fn mode(&self) -> LocationMode {
        match self {
            Location::Spatial { .. } => LocationMode::Spatial,
            Location::Named(_) => LocationMode::Named,
        }
    }

    /// Page this location sits on, if spatial.
    pub fn page(&self) -> Option<u32> {
        match self {
            Location::Spatial { page, .. } => Some(*page),
            Location::Named(_) => None,
        }
    }

    /// Parse form text into a location.
    ///
    /// Spatial input is `(x, y)` or `x, y`; `page` is the page being viewed.
    /// Named input is the location name itself.
    pub fn parse(text: &str, mode: LocationMode, page: u32) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::validation("location cannot be empty"));
        }
        match mode {
            LocationMode::Spatial => {
                let inner = text
                    .strip_prefix('(')
                    .and_then(|t| t.strip_suffix(')'))
                    .unwrap_or(text);
                let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
                if parts.len() != 2 {
                    return Err(Error::validation(format!(
                        "malformed location '{}': expected (x, y)",
                        text
                    )));
                }
                let coord = |s: &str| {
                    s.parse::<u32>().map_err(|_| {
                        Error::validation(format!(
                            "malformed location '{}': '{}' is not a non-negative integer",
                            text, s
                        ))
                    })
                };
                Ok(Location::Spatial {
                    page,
                    x: coord(parts[0])?,
                    y: coord(parts[1])?,
                })
            }
            LocationMode::Named => LocationName::new(text)
                .map(Location::Named)
                .map_err(Error::validation),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Spatial { x, y, .. } => write!(f, "({}, {})", x, y),
            Location::Named(name) => write!(f, "{}", name),
        }
    }
}

// =============================================================================
// Tool record
// =============================================================================

/// Whether a tool is on the shelf or out with someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Borrowed,
}

/// A tracked tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRecord {
    pub number: ToolNumber,
    pub name: ToolName,
    pub location: Location,
    pub borrowed_by: Option<Borrower>,
}

impl ToolRecord {
    pub fn new(number: ToolNumber, name: ToolName, location: Location) -> Self {
        Self {
            number,
            name,
            location,
            borrowed_by: None,
        }
    }

    pub fn with_borrower(mut self, borrower: Borrower) -> Self {
        self.borrowed_by = Some(borrower);
        self
    }

    pub fn availability(&self) -> Availability {
        if self.borrowed_by.is_some() {
            Availability::Borrowed
        } else {
            Availability::Available
        }
    }
}

impl fmt::Display for ToolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.number, self.name)
    }
}

/// In-place changes applied by [`super::Inventory::update`].
///
/// `borrowed_by: Some(None)` returns the tool; `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPatch {
    pub name: Option<ToolName>,
    pub location: Option<Location>,
    pub borrowed_by: Option<Option<Borrower>>,
}

impl ToolPatch {
    pub fn lend(borrower: Borrower) -> Self {
        Self {
            borrowed_by: Some(Some(borrower)),
            ..Self::default()
        }
    }

    pub fn give_back() -> Self {
        Self {
            borrowed_by: Some(None),
            ..Self::default()
        }
    }

    pub fn relocate(location: Location) -> Self {
        Self {
            location: Some(location),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, record: &mut ToolRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(location) = self.location {
            record.location = location;
        }
        if let Some(borrowed_by) = self.borrowed_by {
            record.borrowed_by = borrowed_by;
        }
    }
}

/// A spatial tool drawn on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub number: ToolNumber,
    pub x: u32,
    pub y: u32,
    pub availability: Availability,
}
