//! # avsc-schema: Schema Validation Boundary
//!
//! Turns unvalidated schema documents into [`ValidatedSchema`]s.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`SchemaValidator::validate`] runs the strict structural checks enabled
//! in its [`ValidationConfig`] and then hands the document to
//! `apache_avro::Schema::parse`. [`SchemaValidator::resolve`] accepts any
//! [`SchemaSource`] (JSON string, document, or validated schema).
//!
//! ## Crate Policy
//!
//! - Depends only on `avsc-core` internally.
//! - Validation is the trust boundary: invalid documents are rejected with
//!   structured errors (path and message for strict checks, the
//!   `apache-avro` message otherwise).

pub mod config;
mod strict;
pub mod validate;

pub use config::ValidationConfig;
pub use validate::{
    SchemaSource, SchemaValidationError, SchemaValidator, ValidatedSchema, ValidationViolations,
    Violation,
};
