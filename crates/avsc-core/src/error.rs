//! # Error Types
//!
//! Errors raised while constructing or reading documents in this crate.
//! All errors use `thiserror` for derive-based `Display` and `Error`.

use thiserror::Error;

/// Error in the document model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A metadata key collides with one of the reserved field keys.
    #[error("metadata key '{0}' collides with a reserved field key")]
    ReservedMetadataKey(String),

    /// A value could not be read as a field document.
    #[error("invalid field document: {0}")]
    InvalidFieldDocument(String),
}
