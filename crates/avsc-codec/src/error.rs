//! # Codec Errors

use avsc_schema::SchemaValidationError;
use thiserror::Error;

/// Error during datum encoding, decoding or payload synthesis.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The schema handed to a writer or reader did not validate.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// A JSON value could not be represented under the schema.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The JSON value has the wrong shape for the schema node.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Schema kind at the failing node.
        expected: String,
        /// The offending JSON value.
        actual: String,
    },

    /// `apache-avro` failed to serialize the datum.
    #[error("encode error: {0}")]
    Encode(String),

    /// `apache-avro` failed to read or resolve the datum.
    #[error("decode error: {0}")]
    Decode(String),

    /// An operation that needs a record schema got something else.
    #[error("expected a record schema, got {0}")]
    NotARecord(String),

    /// Payload synthesis found no default and no primitive branch.
    #[error("no example value for field '{field}' of type {field_type}")]
    NoExampleValue {
        /// Field name.
        field: String,
        /// The field's type document.
        field_type: String,
    },
}
