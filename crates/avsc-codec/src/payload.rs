//! # Example Payload Synthesis
//!
//! Builds a record value that is valid for a record schema, for fixtures and
//! smoke tests. Each field takes, in order of preference:
//!
//! 1. the caller's override for that field name;
//! 2. the field's default;
//! 3. the example value of the field's first primitive type, looking one
//!    level into unions.
//!
//! Values follow the JSON convention of [`DatumWriter`](crate::DatumWriter),
//! so a synthesized payload always encodes. Defaults are rewritten the same
//! way the writer rewrites them: a `bytes`, `fixed` or `decimal` default (a
//! JSON string of code points 0-255) becomes base64.

use apache_avro::schema::{RecordField, Schema};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use avsc_core::{type_tag, PrimitiveType};
use avsc_schema::ValidatedSchema;

use crate::convert::{default_to_json, NamedTypes};
use crate::error::CodecError;

/// Example value for a primitive type.
pub fn example_value(primitive: PrimitiveType) -> Value {
    match primitive {
        PrimitiveType::Null => Value::Null,
        PrimitiveType::Boolean => Value::Bool(true),
        PrimitiveType::String => Value::from("❤"),
        PrimitiveType::Bytes => Value::from(STANDARD.encode(b"_")),
        PrimitiveType::Int => Value::from(1),
        PrimitiveType::Long => Value::from(2),
        // 0.5 survives the f32 round trip exactly.
        PrimitiveType::Float => Value::from(0.5),
        PrimitiveType::Double => Value::from(2.2),
    }
}

/// Generate a payload for a record schema.
///
/// # Errors
///
/// `NotARecord` unless the schema is a record; `NoExampleValue` for a field
/// with no override, no default and no primitive type to draw from.
pub fn generate_payload_data(
    schema: &ValidatedSchema,
    overrides: &Map<String, Value>,
) -> Result<Map<String, Value>, CodecError> {
    let Schema::Record(record) = schema.inner() else {
        let doc = schema.document();
        return Err(CodecError::NotARecord(
            type_tag(doc).map_or_else(|| doc.to_string(), str::to_string),
        ));
    };
    let names = NamedTypes::collect(schema.inner());

    let mut data = Map::new();
    for field in &record.fields {
        let value = match overrides.get(&field.name) {
            Some(v) => v.clone(),
            None => field_value(field, &names)?,
        };
        data.insert(field.name.clone(), value);
    }
    Ok(data)
}

fn field_value(field: &RecordField, names: &NamedTypes) -> Result<Value, CodecError> {
    if let Some(default) = &field.default {
        return default_to_json(default, &field.schema, names);
    }
    first_primitive(&field.schema, names)
        .map(example_value)
        .ok_or_else(|| CodecError::NoExampleValue {
            field: field.name.clone(),
            field_type: field.schema.canonical_form(),
        })
}

/// The type itself if primitive, else the first primitive union branch.
fn first_primitive(schema: &Schema, names: &NamedTypes) -> Option<PrimitiveType> {
    match names.resolve(schema).ok()? {
        Schema::Union(union) => union.variants().iter().find_map(primitive_of),
        other => primitive_of(other),
    }
}

/// Logical types report the primitive that carries them.
fn primitive_of(schema: &Schema) -> Option<PrimitiveType> {
    let primitive = match schema {
        Schema::Null => PrimitiveType::Null,
        Schema::Boolean => PrimitiveType::Boolean,
        Schema::Int | Schema::Date | Schema::TimeMillis => PrimitiveType::Int,
        Schema::Long | Schema::TimeMicros | Schema::TimestampMillis | Schema::TimestampMicros => {
            PrimitiveType::Long
        }
        Schema::Float => PrimitiveType::Float,
        Schema::Double => PrimitiveType::Double,
        Schema::Bytes => PrimitiveType::Bytes,
        Schema::String => PrimitiveType::String,
        Schema::Decimal(decimal) if matches!(decimal.inner.as_ref(), Schema::Bytes) => {
            PrimitiveType::Bytes
        }
        _ => return None,
    };
    Some(primitive)
}
