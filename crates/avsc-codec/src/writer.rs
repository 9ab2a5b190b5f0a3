//! # Datum Writer
//!
//! Encodes JSON value documents as Avro binary datums (no container header,
//! no schema fingerprint).

use apache_avro::to_avro_datum;
use serde_json::Value;

use avsc_schema::{SchemaSource, SchemaValidator, ValidatedSchema};

use crate::convert::{json_to_avro, NamedTypes};
use crate::error::CodecError;

/// Encodes values under one writer schema.
#[derive(Debug, Clone)]
pub struct DatumWriter {
    schema: ValidatedSchema,
    names: NamedTypes,
}

impl DatumWriter {
    /// Create a writer. JSON and document sources are validated with the
    /// default [`SchemaValidator`]; a [`ValidatedSchema`] is used as-is.
    pub fn new(source: impl Into<SchemaSource>) -> Result<Self, CodecError> {
        let schema = SchemaValidator::default().resolve(source)?;
        let names = NamedTypes::collect(schema.inner());
        Ok(Self { schema, names })
    }

    pub fn schema(&self) -> &ValidatedSchema {
        &self.schema
    }

    /// Encode one value.
    ///
    /// # Errors
    ///
    /// `InvalidValue` or `TypeMismatch` if the value does not fit the
    /// schema; `Encode` if `apache-avro` refuses the converted datum.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let datum = json_to_avro(value, self.schema.inner(), &self.names)?;
        let bytes = to_avro_datum(self.schema.inner(), datum)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        tracing::trace!(len = bytes.len(), "encoded datum");
        Ok(bytes)
    }
}
