//! # avsc-core: Foundational Types
//!
//! The document model shared by every other `avsc-*` crate. It depends on
//! nothing internal.
//!
//! ## Contents
//!
//! - [`PrimitiveType`]: the eight primitive tags.
//! - [`SchemaDocument`]: an unvalidated schema tree (`serde_json::Value`),
//!   plus [`TypeOptions`] and [`LogicalType`] used to construct keyed
//!   documents.
//! - [`FieldDocument`] and [`FieldAttributes`]: record fields and their
//!   factory.
//! - [`make_nullable`] / [`is_nullable`]: the nullable-union policy.
//! - [`metadata_keys`]: data-pipeline metadata key constants.
//!
//! ## Crate Policy
//!
//! - Documents in this crate are never validated. Validation happens once,
//!   at the `avsc-schema` boundary.
//! - No `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod field;
pub mod metadata_keys;
pub mod nullable;
pub mod primitive;

pub use document::{
    is_primitive, is_record, is_union, type_tag, LogicalType, Metadata, SchemaDocument,
    TypeOptions,
};
pub use error::CoreError;
pub use field::{FieldAttributes, FieldDocument, SortOrder, RESERVED_FIELD_KEYS};
pub use nullable::{is_nullable, make_nullable};
pub use primitive::{PrimitiveType, UnknownPrimitive};
