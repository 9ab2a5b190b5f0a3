//! # Datum Reader
//!
//! Decodes Avro binary datums written with a writer schema and projects them
//! onto a reader schema using Avro schema resolution: reader fields missing
//! from the writer take their defaults, writer-only fields are skipped, and
//! numeric promotions apply.

use std::io::Cursor;

use apache_avro::from_avro_datum;
use serde_json::Value;

use avsc_schema::{SchemaSource, SchemaValidator, ValidatedSchema};

use crate::convert::avro_to_json;
use crate::error::CodecError;

#[derive(Debug, Clone)]
pub struct DatumReader {
    reader: ValidatedSchema,
    writer: ValidatedSchema,
}

impl DatumReader {
    /// Create a reader from a reader schema and the schema the data was
    /// written with.
    pub fn new(
        reader: impl Into<SchemaSource>,
        writer: impl Into<SchemaSource>,
    ) -> Result<Self, CodecError> {
        let validator = SchemaValidator::default();
        Ok(Self {
            reader: validator.resolve(reader)?,
            writer: validator.resolve(writer)?,
        })
    }

    /// A reader whose reader and writer schemas are the same.
    pub fn for_schema(schema: impl Into<SchemaSource>) -> Result<Self, CodecError> {
        let schema = SchemaValidator::default().resolve(schema)?;
        Ok(Self {
            reader: schema.clone(),
            writer: schema,
        })
    }

    pub fn reader_schema(&self) -> &ValidatedSchema {
        &self.reader
    }

    pub fn writer_schema(&self) -> &ValidatedSchema {
        &self.writer
    }

    /// Decode one datum.
    ///
    /// # Errors
    ///
    /// `Decode` if the bytes are truncated or malformed, or the writer
    /// schema cannot be resolved against the reader schema.
    pub fn decode(&self, data: &[u8]) -> Result<Value, CodecError> {
        let mut cursor = Cursor::new(data);
        let datum = from_avro_datum(self.writer.inner(), &mut cursor, Some(self.reader.inner()))
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        tracing::trace!(len = data.len(), "decoded datum");
        avro_to_json(&datum)
    }
}
