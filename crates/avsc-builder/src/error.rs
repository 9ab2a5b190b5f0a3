//! # Builder Errors
//!
//! Every failure is raised at the call that detects it. A failed operation
//! leaves the builder exactly as it was before the call.

use avsc_core::CoreError;
use avsc_schema::SchemaValidationError;
use thiserror::Error;

/// Error raised by [`SchemaBuilder`](crate::SchemaBuilder) operations.
#[derive(Error, Debug)]
pub enum BuilderError {
    /// The operation does not apply to the current builder state, e.g.
    /// `add_field` while no record is being built.
    #[error("invalid builder state for {operation}: {reason}")]
    InvalidBuilderState {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Why the current state does not allow it.
        reason: String,
    },

    /// No field with this name exists in the current record.
    #[error("cannot find field named {0}")]
    FieldNotFound(String),

    /// An insertion index outside `0..=len`.
    #[error("index {index} is out of range for a field list of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the field list.
        len: usize,
    },

    /// A field document could not be created or read.
    #[error("field error: {0}")]
    Field(#[from] CoreError),

    /// The validation service rejected the assembled schema.
    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),
}

impl BuilderError {
    pub(crate) fn invalid_state(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidBuilderState {
            operation,
            reason: reason.into(),
        }
    }
}
