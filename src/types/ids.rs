//! Strongly-typed identifiers and names.
//!
//! All values are validated at construction time and implement common traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Macro to define a non-empty, trimmed text newtype.
///
/// Generates: struct, `new()`, `as_str()`, Display, Serialize, Deserialize
/// (deserialization goes through `new()` so the invariant holds on load too).
macro_rules! define_name {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Result<Self, &'static str> {
                let s = s.into();
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(concat!(stringify!($name), " cannot be empty"));
                }
                if trimmed.len() == s.len() {
                    Ok(Self(s))
                } else {
                    Ok(Self(trimmed.to_string()))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = &'static str;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_name!(ToolName);
define_name!(LocationName);
define_name!(Borrower);

impl Borrower {
    /// Normalize optional free text: empty or blank means "not borrowed".
    pub fn from_optional(s: Option<&str>) -> Option<Self> {
        s.and_then(|v| Self::new(v).ok())
    }
}

/// Positive tool number, unique within an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolNumber(NonZeroU32);

impl ToolNumber {
    /// Upper bound, only reachable with a saturated number space.
    pub const MAX: ToolNumber = ToolNumber(NonZeroU32::MAX);

    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Parse user input such as `" 12 "`.
    pub fn parse(s: &str) -> Result<Self, &'static str> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| "tool number must be a positive integer")?;
        Self::new(n).ok_or("tool number must be a positive integer")
    }
}

impl fmt::Display for ToolNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
