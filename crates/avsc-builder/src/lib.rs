//! # avsc-builder: Incremental Schema Construction
//!
//! A stack machine for assembling nested Avro schema documents one node at
//! a time, plus in-place mutation of the field list of the record being
//! built.
//!
//! ## Lifecycle
//!
//! ```text
//! begin_*  ──▶  current (parent pushed)  ──▶  add_field / field ops
//!                    │
//!                   end  ──▶  Nested(child), parent restored
//!                    │
//!            (outermost)  ──▶  validate  ──▶  Complete(ValidatedSchema)
//! ```
//!
//! ## Crate Policy
//!
//! - Depends on `avsc-core` for documents and `avsc-schema` for validation.
//! - All failures are returned as [`BuilderError`]; a failed call leaves the
//!   builder unchanged.

pub mod builder;
pub mod error;
pub mod fields;

pub use builder::{Ended, SchemaBuilder};
pub use error::BuilderError;
pub use fields::ReplaceMode;
