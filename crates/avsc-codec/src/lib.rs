//! # avsc-codec: Avro Binary Datums
//!
//! Encodes and decodes single Avro binary datums against validated schemas,
//! using JSON value documents on the Rust side.
//!
//! ```
//! use avsc_codec::{DatumReader, DatumWriter};
//! use serde_json::json;
//!
//! let schema = r#"{"type": "record", "name": "user", "fields": [
//!     {"name": "id", "type": "int"},
//!     {"name": "email", "type": ["null", "string"], "default": null}
//! ]}"#;
//!
//! let writer = DatumWriter::new(schema)?;
//! let bytes = writer.encode(&json!({"id": 7, "email": "a@b.c"}))?;
//!
//! let reader = DatumReader::for_schema(schema)?;
//! assert_eq!(reader.decode(&bytes)?, json!({"id": 7, "email": "a@b.c"}));
//! # Ok::<(), avsc_codec::CodecError>(())
//! ```
//!
//! ## Crate Policy
//!
//! - Writers and readers hold only [`ValidatedSchema`](avsc_schema::ValidatedSchema)s.
//! - The JSON convention is documented in `convert.rs`.

mod convert;
pub mod error;
pub mod payload;
pub mod reader;
pub mod writer;

pub use error::CodecError;
pub use payload::{example_value, generate_payload_data};
pub use reader::DatumReader;
pub use writer::DatumWriter;
