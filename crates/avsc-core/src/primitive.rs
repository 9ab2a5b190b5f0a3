//! # Primitive Type Tags
//!
//! The eight Avro primitive types. In a schema document a primitive type is
//! written as a bare JSON string (`"int"`), so [`PrimitiveType`] converts
//! into a [`SchemaDocument`](crate::SchemaDocument) directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An Avro primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

impl PrimitiveType {
    /// All primitive types, in the order the Avro specification lists them.
    pub const ALL: [PrimitiveType; 8] = [
        Self::Null,
        Self::Boolean,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Bytes,
        Self::String,
    ];

    /// The JSON tag used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
        }
    }

    /// Whether `name` is one of the primitive tags.
    pub fn is_primitive_name(name: &str) -> bool {
        name.parse::<PrimitiveType>().is_ok()
    }

    /// The schema document for this primitive (a bare JSON string).
    pub fn document(&self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a primitive type tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an Avro primitive type")]
pub struct UnknownPrimitive(pub String);

impl FromStr for PrimitiveType {
    type Err = UnknownPrimitive;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPrimitive(s.to_string()))
    }
}

impl From<PrimitiveType> for Value {
    fn from(p: PrimitiveType) -> Self {
        p.document()
    }
}
