//! Persisted tool form and legacy field normalization.
//!
//! Records written by the first schema use Spanish keys and keep the page
//! index next to a bare `[x, y]` location. Reads rename those keys through a
//! declared table before typed decoding; writes always use canonical keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::{Location, ToolRecord};
use crate::types::{Borrower, Error, LocationName, Result, ToolName, ToolNumber};

/// Schema revision produced by [`serialize`].
pub const SCHEMA_VERSION: u32 = 2;

/// `(legacy key, canonical key)` pairs, applied in order (schema 1 → 2).
pub const LEGACY_FIELD_RENAMES: &[(&str, &str)] = &[
    ("número", "number"),
    ("nombre", "name"),
    ("ubicación", "location"),
    ("página", "page"),
    ("quien_se_la_lleva", "borrowed_by"),
];

const REQUIRED_FIELDS: &[&str] = &["number", "name", "location"];

/// Location as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedLocation {
    Point([u32; 2]),
    Named(String),
}

/// Canonical on-disk shape of a tool record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTool {
    pub number: u32,
    pub name: String,
    pub location: PersistedLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default)]
    pub borrowed_by: Option<String>,
}

/// Rename legacy keys in place. A canonical key already present wins.
pub fn normalize_keys(map: &mut Map<String, Value>) {
    for (legacy, canonical) in LEGACY_FIELD_RENAMES {
        if let Some(value) = map.remove(*legacy) {
            map.entry(*canonical).or_insert(value);
        }
    }
}

/// Record → persisted form.
pub fn serialize(record: &ToolRecord) -> PersistedTool {
    let (location, page) = match &record.location {
        Location::Spatial { page, x, y } => (PersistedLocation::Point([*x, *y]), Some(*page)),
        Location::Named(name) => (PersistedLocation::Named(name.to_string()), None),
    };
    PersistedTool {
        number: record.number.get(),
        name: record.name.to_string(),
        location,
        page,
        borrowed_by: record.borrowed_by.as_ref().map(ToString::to_string),
    }
}

/// Persisted form → record.
pub fn deserialize(persisted: PersistedTool) -> Result<ToolRecord> {
    let number = ToolNumber::new(persisted.number)
        .ok_or_else(|| Error::schema("field `number` must be positive"))?;
    let name = ToolName::new(persisted.name)
        .map_err(|e| Error::schema(format!("field `name`: {}", e)))?;
    let location = match persisted.location {
        PersistedLocation::Point([x, y]) => Location::Spatial {
            page: persisted.page.unwrap_or(0),
            x,
            y,
        },
        PersistedLocation::Named(name) => Location::Named(
            LocationName::new(name).map_err(|e| Error::schema(format!("field `location`: {}", e)))?,
        ),
    };
    Ok(ToolRecord {
        number,
        name,
        location,
        borrowed_by: Borrower::from_optional(persisted.borrowed_by.as_deref()),
    })
}

/// Decode one raw JSON object, accepting legacy keys.
pub fn from_value(value: Value) -> Result<ToolRecord> {
    let Value::Object(mut map) = value else {
        return Err(Error::schema("tool record must be a JSON object"));
    };
    normalize_keys(&mut map);

    for field in REQUIRED_FIELDS {
        if map.get(*field).map_or(true, Value::is_null) {
            return Err(Error::schema(format!("missing required field `{}`", field)));
        }
    }
    if map.get("page").is_some_and(Value::is_null) {
        map.remove("page");
    }

    let persisted: PersistedTool = serde_json::from_value(Value::Object(map))
        .map_err(|e| Error::schema(format!("malformed tool record: {}", e)))?;
    deserialize(persisted)
}

/// Encode one record as a JSON value with canonical keys.
pub fn to_value(record: &ToolRecord) -> Result<Value> {
    Ok(serde_json::to_value(serialize(record))?)
}
