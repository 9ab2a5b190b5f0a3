//! # Schema Documents
//!
//! A schema document is an untyped JSON tree: a primitive tag (string), a
//! keyed document (object) or a union (array). Documents here are never
//! validated; they are opaque until a validator accepts the outermost one.

use serde_json::{Map, Value};

use crate::primitive::PrimitiveType;

/// An unvalidated schema document.
pub type SchemaDocument = Value;

/// Arbitrary extra metadata merged into a keyed document.
pub type Metadata = Map<String, Value>;

/// Key holding the kind of a keyed document.
pub const TYPE_KEY: &str = "type";
/// Key holding the field list of a record document.
pub const FIELDS_KEY: &str = "fields";
/// Key holding a logical type tag.
pub const LOGICAL_TYPE_KEY: &str = "logicalType";

/// Logical types layered over `int` or `long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Date,
    TimeMillis,
    TimeMicros,
    TimestampMillis,
    TimestampMicros,
}

impl LogicalType {
    /// The `logicalType` tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::TimeMillis => "time-millis",
            Self::TimeMicros => "time-micros",
            Self::TimestampMillis => "timestamp-millis",
            Self::TimestampMicros => "timestamp-micros",
        }
    }

    /// The primitive type carrying the logical value.
    pub fn base_type(&self) -> PrimitiveType {
        match self {
            Self::Date | Self::TimeMillis => PrimitiveType::Int,
            Self::TimeMicros | Self::TimestampMillis | Self::TimestampMicros => {
                PrimitiveType::Long
            }
        }
    }

    /// `{"type": <base>, "logicalType": <tag>}`
    pub fn document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert(TYPE_KEY.into(), self.base_type().document());
        doc.insert(LOGICAL_TYPE_KEY.into(), Value::from(self.tag()));
        Value::Object(doc)
    }
}

/// Optional attributes of a named type (record, enum, fixed).
///
/// Kinds that do not carry an attribute ignore it; metadata is always merged
/// last and wins over structural keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeOptions {
    pub namespace: Option<String>,
    pub aliases: Option<Vec<String>>,
    pub doc: Option<String>,
    pub metadata: Metadata,
}

impl TypeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(aliases.into_iter().map(Into::into).collect());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Replace the metadata map.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add one metadata entry.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The `type` tag of a keyed document, if any.
pub fn type_tag(doc: &Value) -> Option<&str> {
    doc.as_object()?.get(TYPE_KEY)?.as_str()
}

/// Whether the document is a record (`{"type": "record", ...}`).
pub fn is_record(doc: &Value) -> bool {
    type_tag(doc) == Some("record")
}

/// Whether the document is a union (a JSON array).
pub fn is_union(doc: &Value) -> bool {
    doc.is_array()
}

/// Whether the document is the given primitive, either as a bare tag or
/// as `{"type": <tag>}` without a logical type.
pub fn is_primitive(doc: &Value, primitive: PrimitiveType) -> bool {
    match doc {
        Value::String(s) => s == primitive.as_str(),
        Value::Object(map) => {
            map.get(TYPE_KEY).and_then(Value::as_str) == Some(primitive.as_str())
                && !map.contains_key(LOGICAL_TYPE_KEY)
        }
        _ => false,
    }
}

/// Merge `metadata` into a keyed document. Metadata wins on collisions.
pub(crate) fn merge_metadata(doc: &mut Map<String, Value>, metadata: &Metadata) {
    for (k, v) in metadata {
        doc.insert(k.clone(), v.clone());
    }
}

/// Build a keyed document from structural entries, optional named-type
/// attributes and trailing metadata.
pub fn keyed_document(
    entries: impl IntoIterator<Item = (&'static str, Value)>,
    options: &TypeOptions,
    supports_doc: bool,
) -> Value {
    let mut doc: Map<String, Value> = entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    if let Some(namespace) = &options.namespace {
        doc.insert("namespace".into(), Value::from(namespace.as_str()));
    }
    if let Some(aliases) = options.aliases.as_ref().filter(|a| !a.is_empty()) {
        doc.insert("aliases".into(), Value::from(aliases.clone()));
    }
    if supports_doc {
        if let Some(text) = options.doc.as_ref().filter(|d| !d.is_empty()) {
            doc.insert("doc".into(), Value::from(text.as_str()));
        }
    }
    merge_metadata(&mut doc, &options.metadata);
    Value::Object(doc)
}
