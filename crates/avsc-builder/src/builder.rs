//! # Schema Stack Machine
//!
//! [`SchemaBuilder`] holds one in-progress `current` document and a stack of
//! parent documents. Every `begin_*` pushes the current document (if any)
//! and installs a new one; every [`end`](SchemaBuilder::end) pops the parent
//! back in and hands the finished child to the caller, so it can be threaded
//! into a parent `add_field`, `begin_array` and so on:
//!
//! ```
//! use avsc_builder::SchemaBuilder;
//! use avsc_core::PrimitiveType;
//!
//! let mut b = SchemaBuilder::new();
//! let color = b.begin_enum("color_enum", ["red", "blue"]).end()?.into_document();
//! let schema = b
//!     .begin_record("user")
//!     .add_field("id", PrimitiveType::Int)?
//!     .add_field("fav_color", color)?
//!     .end()?
//!     .into_schema()?;
//! assert_eq!(schema.name(), Some("user"));
//! # Ok::<(), avsc_builder::BuilderError>(())
//! ```
//!
//! ## Deferred Validation
//!
//! Intermediate documents are never interpreted. Only the `end()` that
//! closes the outermost document hands it to the [`SchemaValidator`] and
//! returns a [`ValidatedSchema`]. A rejected document stays installed as
//! `current` so the caller can inspect it or [`clear`](SchemaBuilder::clear).
//!
//! ## Concurrency
//!
//! A builder is single-threaded mutable state. Share it only behind
//! external locking.

use serde_json::Value;

use avsc_core::document::keyed_document;
use avsc_core::{
    make_nullable, FieldAttributes, FieldDocument, LogicalType, Metadata, PrimitiveType,
    SchemaDocument, TypeOptions,
};
use avsc_schema::{SchemaValidator, ValidatedSchema};

use crate::error::BuilderError;

/// Result of [`SchemaBuilder::end`].
#[derive(Debug, Clone)]
pub enum Ended {
    /// A nested document was closed; the parent is current again.
    Nested(SchemaDocument),
    /// The outermost document was closed and validated.
    Complete(ValidatedSchema),
}

impl Ended {
    /// The closed document: the raw child, or the validated document.
    pub fn document(&self) -> &SchemaDocument {
        match self {
            Self::Nested(doc) => doc,
            Self::Complete(schema) => schema.document(),
        }
    }

    /// Consume the result, keeping only the document.
    pub fn into_document(self) -> SchemaDocument {
        match self {
            Self::Nested(doc) => doc,
            Self::Complete(schema) => schema.into_document(),
        }
    }

    /// Whether the outermost document was closed and validated.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// The validated schema of a top-level close.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidBuilderState` for a nested close, which
    /// has not been validated.
    pub fn into_schema(self) -> Result<ValidatedSchema, BuilderError> {
        match self {
            Self::Complete(schema) => Ok(schema),
            Self::Nested(_) => Err(BuilderError::invalid_state(
                "into_schema",
                "a nested document was closed; only the outermost end() validates",
            )),
        }
    }
}

/// Incremental builder for Avro schema documents.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    pub(crate) current: Option<SchemaDocument>,
    stack: Vec<SchemaDocument>,
    validator: SchemaValidator,
}

impl SchemaBuilder {
    /// An empty builder using the default [`SchemaValidator`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose top-level `end()` uses the given validator.
    pub fn with_validator(validator: SchemaValidator) -> Self {
        Self {
            current: None,
            stack: Vec::new(),
            validator,
        }
    }

    /// The validator applied by the outermost `end()`.
    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// The document under construction.
    pub fn current(&self) -> Option<&SchemaDocument> {
        self.current.as_ref()
    }

    /// Number of parent documents waiting for their child to end.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether nothing is being built.
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.stack.is_empty()
    }

    fn install(&mut self, doc: SchemaDocument) -> &mut Self {
        if let Some(parent) = self.current.take() {
            self.stack.push(parent);
        }
        self.current = Some(doc);
        tracing::trace!(depth = self.stack.len(), "began schema document");
        self
    }

    // ─── Named types ────────────────────────────────────────────────

    pub fn begin_record(&mut self, name: impl Into<String>) -> &mut Self {
        self.begin_record_with(name, TypeOptions::default())
    }

    /// `{"type": "record", "name": .., "fields": []}` with namespace,
    /// aliases, doc and metadata.
    pub fn begin_record_with(&mut self, name: impl Into<String>, options: TypeOptions) -> &mut Self {
        let doc = keyed_document(
            [
                ("type", Value::from("record")),
                ("name", Value::String(name.into())),
                ("fields", Value::Array(Vec::new())),
            ],
            &options,
            true,
        );
        self.install(doc)
    }

    pub fn begin_enum<I, S>(&mut self, name: impl Into<String>, symbols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.begin_enum_with(name, symbols, TypeOptions::default())
    }

    pub fn begin_enum_with<I, S>(
        &mut self,
        name: impl Into<String>,
        symbols: I,
        options: TypeOptions,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<Value> = symbols.into_iter().map(|s| Value::String(s.into())).collect();
        let doc = keyed_document(
            [
                ("type", Value::from("enum")),
                ("name", Value::String(name.into())),
                ("symbols", Value::Array(symbols)),
            ],
            &options,
            true,
        );
        self.install(doc)
    }

    pub fn begin_fixed(&mut self, name: impl Into<String>, size: usize) -> &mut Self {
        self.begin_fixed_with(name, size, TypeOptions::default())
    }

    /// Fixed types carry namespace and aliases; `options.doc` is ignored.
    pub fn begin_fixed_with(
        &mut self,
        name: impl Into<String>,
        size: usize,
        options: TypeOptions,
    ) -> &mut Self {
        let doc = keyed_document(
            [
                ("type", Value::from("fixed")),
                ("name", Value::String(name.into())),
                ("size", Value::from(size)),
            ],
            &options,
            false,
        );
        self.install(doc)
    }

    pub fn begin_decimal_fixed(
        &mut self,
        precision: u32,
        scale: u32,
        size: usize,
        name: impl Into<String>,
    ) -> &mut Self {
        self.begin_decimal_fixed_with(precision, scale, size, name, TypeOptions::default())
    }

    pub fn begin_decimal_fixed_with(
        &mut self,
        precision: u32,
        scale: u32,
        size: usize,
        name: impl Into<String>,
        options: TypeOptions,
    ) -> &mut Self {
        let doc = keyed_document(
            [
                ("type", Value::from("fixed")),
                ("logicalType", Value::from("decimal")),
                ("name", Value::String(name.into())),
                ("precision", Value::from(precision)),
                ("scale", Value::from(scale)),
                ("size", Value::from(size)),
            ],
            &options,
            false,
        );
        self.install(doc)
    }

    // ─── Unnamed types ──────────────────────────────────────────────

    pub fn begin_decimal_bytes(&mut self, precision: u32, scale: u32, metadata: Metadata) -> &mut Self {
        let doc = unnamed(
            [
                ("type", PrimitiveType::Bytes.document()),
                ("logicalType", Value::from("decimal")),
                ("precision", Value::from(precision)),
                ("scale", Value::from(scale)),
            ],
            metadata,
        );
        self.install(doc)
    }

    pub fn begin_array(&mut self, items: impl Into<SchemaDocument>) -> &mut Self {
        self.begin_array_with(items, Metadata::new())
    }

    pub fn begin_array_with(&mut self, items: impl Into<SchemaDocument>, metadata: Metadata) -> &mut Self {
        let doc = unnamed(
            [("type", Value::from("array")), ("items", items.into())],
            metadata,
        );
        self.install(doc)
    }

    pub fn begin_map(&mut self, values: impl Into<SchemaDocument>) -> &mut Self {
        self.begin_map_with(values, Metadata::new())
    }

    pub fn begin_map_with(&mut self, values: impl Into<SchemaDocument>, metadata: Metadata) -> &mut Self {
        let doc = unnamed(
            [("type", Value::from("map")), ("values", values.into())],
            metadata,
        );
        self.install(doc)
    }

    /// `{"type": <int|long>, "logicalType": <tag>}` plus metadata.
    pub fn begin_logical(&mut self, logical: LogicalType, metadata: Metadata) -> &mut Self {
        let mut doc = logical.document();
        if let Value::Object(map) = &mut doc {
            map.extend(metadata);
        }
        self.install(doc)
    }

    pub fn begin_date(&mut self) -> &mut Self {
        self.begin_logical(LogicalType::Date, Metadata::new())
    }

    pub fn begin_time_millis(&mut self) -> &mut Self {
        self.begin_logical(LogicalType::TimeMillis, Metadata::new())
    }

    pub fn begin_time_micros(&mut self) -> &mut Self {
        self.begin_logical(LogicalType::TimeMicros, Metadata::new())
    }

    pub fn begin_timestamp_millis(&mut self) -> &mut Self {
        self.begin_logical(LogicalType::TimestampMillis, Metadata::new())
    }

    pub fn begin_timestamp_micros(&mut self) -> &mut Self {
        self.begin_logical(LogicalType::TimestampMicros, Metadata::new())
    }

    // ─── Unions and verbatim documents ──────────────────────────────

    /// Install the ordered union of `parts`. Nested unions are accepted here
    /// and rejected by validation.
    pub fn begin_union<I>(&mut self, parts: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<SchemaDocument>,
    {
        let parts: Vec<Value> = parts.into_iter().map(Into::into).collect();
        self.install(Value::Array(parts))
    }

    /// Install `make_nullable(type_doc, default)`.
    pub fn begin_nullable_type(&mut self, type_doc: &SchemaDocument, default: Option<&Value>) -> &mut Self {
        self.install(make_nullable(type_doc, default))
    }

    /// Install a copy of `doc` without interpreting it.
    pub fn begin_with_schema_json(&mut self, doc: &SchemaDocument) -> &mut Self {
        self.install(doc.clone())
    }

    // ─── Fields ─────────────────────────────────────────────────────

    /// Append `{"name": name, "type": typ}` to the current record.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        typ: impl Into<SchemaDocument>,
    ) -> Result<&mut Self, BuilderError> {
        self.add_field_with(FieldAttributes::new(name, typ))
    }

    /// Append a field built from `attrs` to the current record.
    ///
    /// # Errors
    ///
    /// `InvalidBuilderState` unless a record is current; `Field` if the
    /// attributes carry a reserved metadata key.
    pub fn add_field_with(&mut self, attrs: FieldAttributes) -> Result<&mut Self, BuilderError> {
        self.record("add_field")?;
        let field = FieldDocument::create(attrs)?;
        self.fields_mut("add_field")?.push(field.into_value());
        Ok(self)
    }

    // ─── Closing ────────────────────────────────────────────────────

    /// Close the current document.
    ///
    /// With parents on the stack, the most recent parent becomes current
    /// again and the finished child is returned as [`Ended::Nested`].
    /// Otherwise the document is validated, the builder is reset, and the
    /// validated schema is returned as [`Ended::Complete`].
    ///
    /// # Errors
    ///
    /// `InvalidBuilderState` if nothing is being built;
    /// `SchemaValidation` if the outermost document is rejected, in which
    /// case the builder is left unchanged.
    pub fn end(&mut self) -> Result<Ended, BuilderError> {
        let Some(current) = self.current.take() else {
            return Err(BuilderError::invalid_state("end", "no schema is being built"));
        };

        if let Some(parent) = self.stack.pop() {
            self.current = Some(parent);
            tracing::trace!(depth = self.stack.len(), "ended nested schema document");
            return Ok(Ended::Nested(current));
        }

        match self.validator.validate(&current) {
            Ok(schema) => {
                tracing::debug!(name = ?schema.name(), "built schema");
                Ok(Ended::Complete(schema))
            }
            Err(e) => {
                self.current = Some(current);
                Err(e.into())
            }
        }
    }

    /// Discard everything built so far.
    pub fn clear(&mut self) {
        self.current = None;
        self.stack.clear();
    }
}

fn unnamed(entries: impl IntoIterator<Item = (&'static str, Value)>, metadata: Metadata) -> Value {
    let mut doc: Metadata = entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    doc.extend(metadata);
    Value::Object(doc)
}
