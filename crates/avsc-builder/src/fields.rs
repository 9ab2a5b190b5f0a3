//! # Field List Operations
//!
//! Mutators and lookups over the `fields` list of the record currently being
//! built. Every operation requires a record as `current` and fails with
//! `InvalidBuilderState` otherwise. A record document without a `fields`
//! key reads as having no fields; the mutators create the list on demand.
//!
//! Failed operations never modify the record.

use serde_json::{Map, Value};

use avsc_core::document::FIELDS_KEY;
use avsc_core::{is_nullable, is_record, make_nullable, FieldAttributes, FieldDocument};

use crate::builder::SchemaBuilder;
use crate::error::BuilderError;

/// How [`SchemaBuilder::replace_field`] treats a nullable original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplaceMode {
    /// Insert the replacements as given.
    #[default]
    Verbatim,
    /// If the replaced field's type admits `null`, make every replacement's
    /// type nullable too (see [`make_nullable`]).
    PreserveNull,
}

impl SchemaBuilder {
    /// Build a standalone field document for [`insert_field`](Self::insert_field)
    /// or [`replace_field`](Self::replace_field).
    pub fn create_field(attrs: FieldAttributes) -> Result<FieldDocument, BuilderError> {
        Ok(FieldDocument::create(attrs)?)
    }

    /// The current document as a record, or `InvalidBuilderState`.
    pub(crate) fn record(&self, operation: &'static str) -> Result<&Map<String, Value>, BuilderError> {
        match &self.current {
            Some(doc) if is_record(doc) => doc.as_object().ok_or_else(|| {
                BuilderError::invalid_state(operation, "the schema being built is not a record")
            }),
            Some(_) => Err(BuilderError::invalid_state(
                operation,
                "the schema being built is not a record",
            )),
            None => Err(BuilderError::invalid_state(operation, "no schema is being built")),
        }
    }

    fn record_mut(&mut self, operation: &'static str) -> Result<&mut Map<String, Value>, BuilderError> {
        self.record(operation)?;
        match &mut self.current {
            Some(Value::Object(map)) => Ok(map),
            _ => Err(BuilderError::invalid_state(operation, "the schema being built is not a record")),
        }
    }

    fn fields(&self, operation: &'static str) -> Result<&[Value], BuilderError> {
        match self.record(operation)?.get(FIELDS_KEY) {
            None => Ok(&[][..]),
            Some(Value::Array(fields)) => Ok(fields.as_slice()),
            Some(other) => Err(not_a_list(operation, other)),
        }
    }

    pub(crate) fn fields_mut(&mut self, operation: &'static str) -> Result<&mut Vec<Value>, BuilderError> {
        let record = self.record_mut(operation)?;
        match record
            .entry(FIELDS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(fields) => Ok(fields),
            other => Err(not_a_list(operation, other)),
        }
    }

    fn locate(&self, operation: &'static str, name: &str) -> Result<Option<usize>, BuilderError> {
        Ok(self
            .fields(operation)?
            .iter()
            .position(|f| f.get("name").and_then(Value::as_str) == Some(name)))
    }

    /// Position and copy of the first field named `name`.
    ///
    /// # Errors
    ///
    /// `FieldNotFound` if no field has that name; `Field` if the stored entry
    /// is not a well-formed field document.
    pub fn find_field(&self, name: &str) -> Result<(usize, FieldDocument), BuilderError> {
        let index = self
            .locate("find_field", name)?
            .ok_or_else(|| BuilderError::FieldNotFound(name.to_string()))?;
        let field = FieldDocument::from_value(self.fields("find_field")?[index].clone())?;
        Ok((index, field))
    }

    /// Remove the first field named `name`.
    pub fn remove_field(&mut self, name: &str) -> Result<&mut Self, BuilderError> {
        let index = self
            .locate("remove_field", name)?
            .ok_or_else(|| BuilderError::FieldNotFound(name.to_string()))?;
        self.fields_mut("remove_field")?.remove(index);
        tracing::trace!(field = name, index, "removed field");
        Ok(self)
    }

    /// Insert `field` before position `index`; `index == len` appends.
    pub fn insert_field(&mut self, field: FieldDocument, index: usize) -> Result<&mut Self, BuilderError> {
        self.insert_fields([field], index)
    }

    /// Insert `fields` in order, starting at position `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` unless `index <= len`. The check happens before any
    /// field is inserted.
    pub fn insert_fields<I>(&mut self, fields: I, index: usize) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = FieldDocument>,
    {
        let len = self.fields("insert_fields")?.len();
        if index > len {
            return Err(BuilderError::IndexOutOfRange { index, len });
        }
        let list = self.fields_mut("insert_fields")?;
        list.splice(index..index, fields.into_iter().map(FieldDocument::into_value));
        Ok(self)
    }

    /// Replace the first field named `old_name` with `new_fields`, in place.
    ///
    /// With [`ReplaceMode::PreserveNull`] and a nullable original, each
    /// replacement's type is wrapped with
    /// `make_nullable(type, replacement.default)`.
    pub fn replace_field(
        &mut self,
        old_name: &str,
        new_fields: Vec<FieldDocument>,
        mode: ReplaceMode,
    ) -> Result<&mut Self, BuilderError> {
        let (index, original) = self.find_field(old_name)?;

        let wrap = mode == ReplaceMode::PreserveNull && is_nullable(original.field_type());
        let replacements = new_fields.into_iter().map(|mut field| {
            if wrap {
                let nullable = make_nullable(field.field_type(), field.default_value());
                field.set_field_type(nullable);
            }
            field.into_value()
        });

        self.fields_mut("replace_field")?
            .splice(index..=index, replacements);
        tracing::trace!(field = old_name, index, ?mode, "replaced field");
        Ok(self)
    }

    /// Copy of the field named `name`.
    pub fn get_field(&self, name: &str) -> Result<FieldDocument, BuilderError> {
        self.find_field(name).map(|(_, field)| field)
    }

    /// Position of the field named `name`.
    pub fn get_field_index(&self, name: &str) -> Result<usize, BuilderError> {
        self.locate("get_field_index", name)?
            .ok_or_else(|| BuilderError::FieldNotFound(name.to_string()))
    }
}

fn not_a_list(operation: &'static str, found: &Value) -> BuilderError {
    BuilderError::invalid_state(operation, format!("record 'fields' is not a list: {found}"))
}
