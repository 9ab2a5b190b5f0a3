//! # JSON ⇄ Avro Value Conversion
//!
//! Maps JSON value documents onto `apache_avro::types::Value` under a schema
//! and back.
//!
//! ## JSON Convention
//!
//! | Avro                         | JSON                                        |
//! |------------------------------|---------------------------------------------|
//! | record                       | object keyed by field name                  |
//! | enum                         | symbol string                               |
//! | bytes, fixed, decimal        | standard base64 string                      |
//! | date, time-*, timestamp-*    | integer                                     |
//! | union                        | bare value, or `{"<branch>": value}`        |
//!
//! A union branch is named by its type tag (`"int"`, `"array"`, ...) or, for
//! named types, by its simple or full name. Logical types are named by their
//! underlying type. Bare union values take the first branch that accepts
//! them. Decoding always produces bare union values.
//!
//! A record field missing from the JSON object takes the field's default.
//! Defaults are written in the Avro JSON encoding, where `bytes`, `fixed`
//! and `decimal` values are strings of code points 0-255; they are rewritten
//! with [`default_to_json`] before conversion.

use std::collections::HashMap;

use apache_avro::schema::{Name, Schema};
use apache_avro::types::Value as AvroValue;
use apache_avro::Decimal;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::CodecError;

/// Named types of a parsed schema, keyed by full name, so that
/// `Schema::Ref` nodes can be followed.
#[derive(Debug, Clone, Default)]
pub(crate) struct NamedTypes {
    by_name: HashMap<String, Schema>,
}

impl NamedTypes {
    pub(crate) fn collect(schema: &Schema) -> Self {
        let mut names = Self::default();
        names.visit(schema);
        names
    }

    fn visit(&mut self, schema: &Schema) {
        match schema {
            Schema::Record(record) => {
                if self.register(&record.name, schema) {
                    for field in &record.fields {
                        self.visit(&field.schema);
                    }
                }
            }
            Schema::Enum(e) => {
                self.register(&e.name, schema);
            }
            Schema::Fixed(f) => {
                self.register(&f.name, schema);
            }
            Schema::Decimal(d) => self.visit(&d.inner),
            Schema::Array(array) => self.visit(&array.items),
            Schema::Map(map) => self.visit(&map.types),
            Schema::Union(union) => {
                for variant in union.variants() {
                    self.visit(variant);
                }
            }
            _ => {}
        }
    }

    /// Returns false if the name was already registered.
    fn register(&mut self, name: &Name, schema: &Schema) -> bool {
        let fullname = name.fullname(None);
        if self.by_name.contains_key(&fullname) {
            return false;
        }
        self.by_name.insert(fullname, schema.clone());
        true
    }

    /// Follow a `Schema::Ref` to its definition; other nodes are returned
    /// as they are.
    pub(crate) fn resolve<'a>(&'a self, schema: &'a Schema) -> Result<&'a Schema, CodecError> {
        match schema {
            Schema::Ref { name } => {
                let fullname = name.fullname(None);
                self.by_name
                    .get(&fullname)
                    .ok_or_else(|| CodecError::InvalidValue(format!("unknown named type '{fullname}'")))
            }
            other => Ok(other),
        }
    }
}

/// Convert a JSON value document to an Avro value under `schema`.
pub(crate) fn json_to_avro<'a>(
    json: &Value,
    schema: &'a Schema,
    names: &'a NamedTypes,
) -> Result<AvroValue, CodecError> {
    let schema = names.resolve(schema)?;
    match (schema, json) {
        (Schema::Null, Value::Null) => Ok(AvroValue::Null),
        (Schema::Boolean, Value::Bool(b)) => Ok(AvroValue::Boolean(*b)),

        (Schema::Int, Value::Number(_)) => Ok(AvroValue::Int(as_int(json)?)),
        (Schema::Date, Value::Number(_)) => Ok(AvroValue::Date(as_int(json)?)),
        (Schema::TimeMillis, Value::Number(_)) => Ok(AvroValue::TimeMillis(as_int(json)?)),

        (Schema::Long, Value::Number(_)) => Ok(AvroValue::Long(as_long(json)?)),
        (Schema::TimeMicros, Value::Number(_)) => Ok(AvroValue::TimeMicros(as_long(json)?)),
        (Schema::TimestampMillis, Value::Number(_)) => {
            Ok(AvroValue::TimestampMillis(as_long(json)?))
        }
        (Schema::TimestampMicros, Value::Number(_)) => {
            Ok(AvroValue::TimestampMicros(as_long(json)?))
        }

        (Schema::Float, Value::Number(n)) => {
            let f = n
                .as_f64()
                .ok_or_else(|| CodecError::InvalidValue(format!("expected float, got {n}")))?;
            Ok(AvroValue::Float(f as f32))
        }
        (Schema::Double, Value::Number(n)) => {
            let f = n
                .as_f64()
                .ok_or_else(|| CodecError::InvalidValue(format!("expected double, got {n}")))?;
            Ok(AvroValue::Double(f))
        }

        (Schema::String, Value::String(s)) => Ok(AvroValue::String(s.clone())),
        (Schema::Bytes, Value::String(s)) => Ok(AvroValue::Bytes(decode_base64(s)?)),

        (Schema::Fixed(fixed), Value::String(s)) => {
            let bytes = decode_base64(s)?;
            if bytes.len() != fixed.size {
                return Err(CodecError::InvalidValue(format!(
                    "fixed '{}' needs {} bytes, got {}",
                    fixed.name.name,
                    fixed.size,
                    bytes.len()
                )));
            }
            Ok(AvroValue::Fixed(fixed.size, bytes))
        }

        (Schema::Decimal(_), Value::String(s)) => {
            Ok(AvroValue::Decimal(Decimal::from(decode_base64(s)?)))
        }

        (Schema::Enum(e), Value::String(s)) => match e.symbols.iter().position(|sym| sym == s) {
            Some(index) => Ok(AvroValue::Enum(index as u32, s.clone())),
            None => Err(CodecError::InvalidValue(format!(
                "'{s}' is not a symbol of enum '{}'",
                e.name.name
            ))),
        },

        (Schema::Array(array), Value::Array(items)) => {
            let items = items
                .iter()
                .map(|item| json_to_avro(item, &array.items, names))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AvroValue::Array(items))
        }

        (Schema::Map(map), Value::Object(entries)) => {
            let mut values = HashMap::with_capacity(entries.len());
            for (key, value) in entries {
                values.insert(key.clone(), json_to_avro(value, &map.types, names)?);
            }
            Ok(AvroValue::Map(values))
        }

        (Schema::Record(record), Value::Object(obj)) => {
            let mut fields = Vec::with_capacity(record.fields.len());
            for field in &record.fields {
                let value = match (obj.get(&field.name), &field.default) {
                    (Some(v), _) => json_to_avro(v, &field.schema, names)?,
                    (None, Some(default)) => {
                        let default = default_to_json(default, &field.schema, names)?;
                        json_to_avro(&default, &field.schema, names)?
                    }
                    (None, None) => {
                        return Err(CodecError::InvalidValue(format!(
                            "missing required field '{}' of record '{}'",
                            field.name, record.name.name
                        )))
                    }
                };
                fields.push((field.name.clone(), value));
            }
            Ok(AvroValue::Record(fields))
        }

        (Schema::Union(union), json) => {
            let variants = union.variants();

            if let Some((branch, inner)) = single_entry(json) {
                if let Some(index) = variants
                    .iter()
                    .position(|v| branch_matches(v, branch, names))
                {
                    if let Ok(v) = json_to_avro(inner, &variants[index], names) {
                        return Ok(AvroValue::Union(index as u32, Box::new(v)));
                    }
                }
            }

            for (index, variant) in variants.iter().enumerate() {
                if let Ok(v) = json_to_avro(json, variant, names) {
                    return Ok(AvroValue::Union(index as u32, Box::new(v)));
                }
            }
            Err(CodecError::InvalidValue(format!(
                "no union branch accepts {json}"
            )))
        }

        (schema, json) => Err(CodecError::TypeMismatch {
            expected: kind_name(schema).to_string(),
            actual: json.to_string(),
        }),
    }
}

/// Rewrite a schema default from the Avro JSON encoding into the codec's
/// JSON convention. A union default belongs to the first branch.
pub(crate) fn default_to_json(
    default: &Value,
    schema: &Schema,
    names: &NamedTypes,
) -> Result<Value, CodecError> {
    match (names.resolve(schema)?, default) {
        (Schema::Bytes | Schema::Fixed(_) | Schema::Decimal(_), Value::String(s)) => {
            Ok(Value::String(latin1_base64(s)?))
        }
        (Schema::Union(union), _) => match union.variants().first() {
            Some(first) => default_to_json(default, first, names),
            None => Ok(default.clone()),
        },
        (Schema::Array(array), Value::Array(items)) => items
            .iter()
            .map(|item| default_to_json(item, &array.items, names))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (Schema::Map(map), Value::Object(entries)) => {
            let mut out = Map::new();
            for (key, value) in entries {
                out.insert(key.clone(), default_to_json(value, &map.types, names)?);
            }
            Ok(Value::Object(out))
        }
        (Schema::Record(record), Value::Object(entries)) => {
            let mut out = entries.clone();
            for field in &record.fields {
                if let Some(value) = entries.get(&field.name) {
                    out.insert(field.name.clone(), default_to_json(value, &field.schema, names)?);
                }
            }
            Ok(Value::Object(out))
        }
        _ => Ok(default.clone()),
    }
}

/// Base64 of a string whose code points are all in 0-255.
pub(crate) fn latin1_base64(s: &str) -> Result<String, CodecError> {
    let bytes = s
        .chars()
        .map(|c| u8::try_from(u32::from(c)))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| {
            CodecError::InvalidValue(format!("bytes default '{s}' has a code point above 255"))
        })?;
    Ok(STANDARD.encode(bytes))
}

/// Convert a decoded Avro value back to a JSON value document.
pub(crate) fn avro_to_json(avro: &AvroValue) -> Result<Value, CodecError> {
    match avro {
        AvroValue::Null => Ok(Value::Null),
        AvroValue::Boolean(b) => Ok(Value::Bool(*b)),
        AvroValue::Int(i) | AvroValue::Date(i) | AvroValue::TimeMillis(i) => Ok(Value::from(*i)),
        AvroValue::Long(l)
        | AvroValue::TimeMicros(l)
        | AvroValue::TimestampMillis(l)
        | AvroValue::TimestampMicros(l) => Ok(Value::from(*l)),
        AvroValue::Float(f) => Ok(Value::from(*f)),
        AvroValue::Double(d) => Ok(Value::from(*d)),
        AvroValue::String(s) => Ok(Value::String(s.clone())),
        AvroValue::Bytes(bytes) | AvroValue::Fixed(_, bytes) => {
            Ok(Value::String(STANDARD.encode(bytes)))
        }
        AvroValue::Decimal(decimal) => {
            let bytes = Vec::<u8>::try_from(decimal)
                .map_err(|e| CodecError::Decode(format!("decimal: {e}")))?;
            Ok(Value::String(STANDARD.encode(bytes)))
        }
        AvroValue::Uuid(uuid) => Ok(Value::String(uuid.to_string())),
        AvroValue::Enum(_, symbol) => Ok(Value::String(symbol.clone())),
        AvroValue::Union(_, inner) => avro_to_json(inner),
        AvroValue::Array(items) => items
            .iter()
            .map(avro_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AvroValue::Map(entries) => {
            let mut obj = Map::new();
            for (key, value) in entries {
                obj.insert(key.clone(), avro_to_json(value)?);
            }
            Ok(Value::Object(obj))
        }
        AvroValue::Record(fields) => {
            let mut obj = Map::new();
            for (name, value) in fields {
                obj.insert(name.clone(), avro_to_json(value)?);
            }
            Ok(Value::Object(obj))
        }
        other => Err(CodecError::Decode(format!("unsupported Avro value: {other:?}"))),
    }
}

fn as_int(json: &Value) -> Result<i32, CodecError> {
    let l = as_long(json)?;
    i32::try_from(l).map_err(|_| CodecError::InvalidValue(format!("{l} is out of int range")))
}

fn as_long(json: &Value) -> Result<i64, CodecError> {
    json.as_i64()
        .ok_or_else(|| CodecError::InvalidValue(format!("expected an integer, got {json}")))
}

fn decode_base64(s: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD
        .decode(s)
        .map_err(|e| CodecError::InvalidValue(format!("invalid base64 '{s}': {e}")))
}

fn single_entry(json: &Value) -> Option<(&str, &Value)> {
    match json {
        Value::Object(obj) if obj.len() == 1 => obj.iter().next().map(|(k, v)| (k.as_str(), v)),
        _ => None,
    }
}

fn branch_matches(variant: &Schema, branch: &str, names: &NamedTypes) -> bool {
    let name_matches = |name: &Name| name.name == branch || name.fullname(None) == branch;
    match names.resolve(variant) {
        Ok(Schema::Record(r)) => name_matches(&r.name),
        Ok(Schema::Enum(e)) => name_matches(&e.name),
        Ok(Schema::Fixed(f)) => name_matches(&f.name),
        Ok(Schema::Decimal(d)) => branch_matches(&d.inner, branch, names),
        Ok(other) => kind_name(other) == branch,
        Err(_) => false,
    }
}

/// Type tag of a schema node; logical types report their underlying type.
fn kind_name(schema: &Schema) -> &'static str {
    match schema {
        Schema::Null => "null",
        Schema::Boolean => "boolean",
        Schema::Int | Schema::Date | Schema::TimeMillis => "int",
        Schema::Long | Schema::TimeMicros | Schema::TimestampMillis | Schema::TimestampMicros => {
            "long"
        }
        Schema::Float => "float",
        Schema::Double => "double",
        Schema::Bytes => "bytes",
        Schema::String | Schema::Uuid => "string",
        Schema::Array(_) => "array",
        Schema::Map(_) => "map",
        Schema::Union(_) => "union",
        Schema::Record(_) => "record",
        Schema::Enum(_) => "enum",
        Schema::Fixed(_) => "fixed",
        Schema::Decimal(_) => "decimal",
        _ => "unsupported",
    }
}
