//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the toolshed engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad user input: empty required field, malformed location, non-integer number.
    #[error("validation error: {0}")]
    Validation(String),

    /// Persisted record still missing a required field after legacy renaming.
    #[error("schema error: {0}")]
    Schema(String),

    /// Search produced no exact, partial or fuzzy match.
    #[error("not found: {0}")]
    NotFound(String),

    /// Edit/lend/return/delete invoked while nothing is selected.
    #[error("no tool selected: {0}")]
    NoSelection(String),

    /// No candidate images exist to bind to a location.
    #[error("no images available: {0}")]
    NoImagesAvailable(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors the UI shows as a message and then carries on.
    ///
    /// Everything else aborts the operation that raised it.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::NotFound(_)
                | Error::NoSelection(_)
                | Error::NoImagesAvailable(_)
        )
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn no_selection(msg: impl Into<String>) -> Self {
        Self::NoSelection(msg.into())
    }

    pub fn no_images_available(msg: impl Into<String>) -> Self {
        Self::NoImagesAvailable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::validation("name cannot be empty").is_user_facing());
        assert!(Error::not_found("rake").is_user_facing());
        assert!(Error::no_selection("lend").is_user_facing());
        assert!(Error::no_images_available("shed").is_user_facing());
        assert!(!Error::schema("missing number").is_user_facing());
        assert!(!Error::Io(std::io::Error::other("disk full")).is_user_facing());
    }

    #[test]
    fn test_display_carries_context() {
        let err = Error::schema("record 3: missing required field `name`");
        assert_eq!(
            err.to_string(),
            "schema error: record 3: missing required field `name`"
        );
    }
}
