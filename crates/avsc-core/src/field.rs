//! # Record Field Documents
//!
//! A [`FieldDocument`] is one entry of a record's `fields` list: a JSON
//! object with a required `name` and `type`, optional `default`, `order`,
//! `aliases` and `doc`, plus arbitrary metadata keys.
//!
//! ## Defaults
//!
//! A field may legitimately default to `null`, `0` or `false`. Presence of
//! the `default` key, not the truthiness of its value, is what marks a field
//! as having a default. [`FieldAttributes::default_value`] therefore takes a
//! plain [`Value`] and `Value::Null` is a real default.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{merge_metadata, Metadata, SchemaDocument};
use crate::error::CoreError;

/// Keys with structural meaning in a field document.
pub const RESERVED_FIELD_KEYS: [&str; 6] = ["name", "type", "default", "order", "aliases", "doc"];

/// Sort order of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
    Ignore,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes used to create a field document.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAttributes {
    pub name: String,
    pub field_type: SchemaDocument,
    /// `Some` when the field has a default, including `Some(Value::Null)`.
    pub default: Option<Value>,
    pub order: Option<SortOrder>,
    pub aliases: Option<Vec<String>>,
    pub doc: Option<String>,
    pub metadata: Metadata,
}

impl FieldAttributes {
    pub fn new(name: impl Into<String>, field_type: impl Into<SchemaDocument>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            default: None,
            order: None,
            aliases: None,
            doc: None,
            metadata: Metadata::new(),
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
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

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build the field document. See [`FieldDocument::create`].
    pub fn build(self) -> Result<FieldDocument, CoreError> {
        FieldDocument::create(self)
    }
}

/// A record field document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct FieldDocument(Map<String, Value>);

impl FieldDocument {
    /// Create a field document from attributes.
    ///
    /// `default` is set only when present, `order`/`aliases`/`doc` only when
    /// supplied and non-empty, and metadata is merged last.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReservedMetadataKey`] if a metadata key is one of
    /// [`RESERVED_FIELD_KEYS`].
    pub fn create(attrs: FieldAttributes) -> Result<Self, CoreError> {
        check_metadata_keys(&attrs.metadata)?;

        let mut map = Map::new();
        map.insert("name".into(), Value::String(attrs.name));
        map.insert("type".into(), attrs.field_type);
        if let Some(default) = attrs.default {
            map.insert("default".into(), default);
        }
        if let Some(order) = attrs.order {
            map.insert("order".into(), Value::from(order.as_str()));
        }
        if let Some(aliases) = attrs.aliases.filter(|a| !a.is_empty()) {
            map.insert("aliases".into(), Value::from(aliases));
        }
        if let Some(doc) = attrs.doc.filter(|d| !d.is_empty()) {
            map.insert("doc".into(), Value::String(doc));
        }
        merge_metadata(&mut map, &attrs.metadata);
        Ok(Self(map))
    }

    /// Shorthand for a field with only a name and a type.
    pub fn simple(name: impl Into<String>, field_type: impl Into<SchemaDocument>) -> Self {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(name.into()));
        map.insert("type".into(), field_type.into());
        Self(map)
    }

    /// Wrap an existing JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFieldDocument`] unless the value is an
    /// object with a string `name` and a `type`.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let Value::Object(map) = value else {
            return Err(CoreError::InvalidFieldDocument(format!(
                "expected a JSON object, got {value}"
            )));
        };
        if !map.get("name").is_some_and(Value::is_string) {
            return Err(CoreError::InvalidFieldDocument(
                "missing string 'name'".to_string(),
            ));
        }
        if !map.contains_key("type") {
            return Err(CoreError::InvalidFieldDocument(
                "missing 'type'".to_string(),
            ));
        }
        Ok(Self(map))
    }

    pub fn name(&self) -> &str {
        self.0.get("name").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn field_type(&self) -> &SchemaDocument {
        self.0.get("type").unwrap_or(&Value::Null)
    }

    pub fn set_field_type(&mut self, field_type: SchemaDocument) {
        self.0.insert("type".into(), field_type);
    }

    pub fn has_default(&self) -> bool {
        self.0.contains_key("default")
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.0.get("default")
    }

    pub fn set_default_value(&mut self, value: Value) {
        self.0.insert("default".into(), value);
    }

    /// The raw `order` value. Documents loaded verbatim may carry any string.
    pub fn sort_order(&self) -> Option<&str> {
        self.0.get("order").and_then(Value::as_str)
    }

    pub fn aliases(&self) -> Option<Vec<&str>> {
        self.0
            .get("aliases")?
            .as_array()
            .map(|a| a.iter().filter_map(Value::as_str).collect())
    }

    pub fn doc(&self) -> Option<&str> {
        self.0.get("doc").and_then(Value::as_str)
    }

    /// All non-reserved keys.
    pub fn metadata(&self) -> Metadata {
        self.0
            .iter()
            .filter(|(k, _)| !RESERVED_FIELD_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Merge metadata into the document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReservedMetadataKey`] on a reserved key; the
    /// document is left unchanged in that case.
    pub fn set_metadata(&mut self, metadata: &Metadata) -> Result<(), CoreError> {
        check_metadata_keys(metadata)?;
        merge_metadata(&mut self.0, metadata);
        Ok(())
    }

    /// Drop every non-reserved key.
    pub fn clear_metadata(&mut self) {
        self.0.retain(|k, _| RESERVED_FIELD_KEYS.contains(&k.as_str()));
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for FieldDocument {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<FieldDocument> for Value {
    fn from(field: FieldDocument) -> Self {
        field.into_value()
    }
}

fn check_metadata_keys(metadata: &Metadata) -> Result<(), CoreError> {
    match metadata
        .keys()
        .find(|k| RESERVED_FIELD_KEYS.contains(&k.as_str()))
    {
        Some(key) => Err(CoreError::ReservedMetadataKey(key.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_reads_reserved_keys() {
        let field = FieldDocument::from_value(json!({"name": "bar", "type": "int"})).unwrap();
        assert_eq!(field.name(), "bar");
        assert_eq!(field.field_type(), &json!("int"));
        assert!(!field.has_default());
        assert_eq!(field.sort_order(), None);
        assert_eq!(field.aliases(), None);
        assert_eq!(field.doc(), None);
        assert!(field.metadata().is_empty());
        assert_eq!(field.into_value(), json!({"name": "bar", "type": "int"}));
    }

    #[test]
    fn create_with_every_attribute() {
        let field = FieldAttributes::new("bar", "int")
            .default_value(10)
            .order(SortOrder::Ignore)
            .aliases(["rab"])
            .doc("bar field")
            .meta("key1", "value1")
            .build()
            .unwrap();

        assert_eq!(field.name(), "bar");
        assert!(field.has_default());
        assert_eq!(field.default_value(), Some(&json!(10)));
        assert_eq!(field.sort_order(), Some("ignore"));
        assert_eq!(field.aliases(), Some(vec!["rab"]));
        assert_eq!(field.doc(), Some("bar field"));
        assert_eq!(field.metadata(), json!({"key1": "value1"}).as_object().unwrap().clone());
        assert_eq!(
            field.into_value(),
            json!({
                "name": "bar",
                "type": "int",
                "default": 10,
                "order": "ignore",
                "aliases": ["rab"],
                "doc": "bar field",
                "key1": "value1"
            })
        );
    }

    #[test]
    fn null_default_is_a_real_default() {
        let field = FieldAttributes::new("n", json!(["null", "int"]))
            .default_value(Value::Null)
            .build()
            .unwrap();
        assert!(field.has_default());
        assert_eq!(field.default_value(), Some(&Value::Null));
    }

    #[test]
    fn falsy_defaults_are_kept() {
        let zero = FieldAttributes::new("z", "int").default_value(0).build().unwrap();
        let off = FieldAttributes::new("b", "boolean").default_value(false).build().unwrap();
        assert_eq!(zero.default_value(), Some(&json!(0)));
        assert_eq!(off.default_value(), Some(&json!(false)));
    }

    #[test]
    fn reserved_metadata_key_is_rejected() {
        let err = FieldAttributes::new("bar", "int")
            .meta("type", "string")
            .build()
            .unwrap_err();
        assert_eq!(err, CoreError::ReservedMetadataKey("type".to_string()));
    }

    #[test]
    fn set_metadata_rejects_reserved_and_leaves_document() {
        let mut field = FieldDocument::simple("bar", "int");
        let mut meta = Metadata::new();
        meta.insert("pkey".into(), json!(true));
        meta.insert("doc".into(), json!("nope"));
        assert!(field.set_metadata(&meta).is_err());
        assert_eq!(field, FieldDocument::simple("bar", "int"));
    }

    #[test]
    fn clear_metadata_keeps_reserved_keys() {
        let mut field =
            FieldDocument::from_value(json!({"name": "bar", "type": "int", "key1": "value1"}))
                .unwrap();
        assert_eq!(field.metadata().len(), 1);
        field.clear_metadata();
        assert_eq!(field.clone().into_value(), json!({"name": "bar", "type": "int"}));
        assert!(field.metadata().is_empty());
    }

    #[test]
    fn from_value_requires_name_and_type() {
        assert!(FieldDocument::from_value(json!({"type": "int"})).is_err());
        assert!(FieldDocument::from_value(json!({"name": "a"})).is_err());
        assert!(FieldDocument::from_value(json!({"name": 1, "type": "int"})).is_err());
        assert!(FieldDocument::from_value(json!("int")).is_err());
    }

    #[test]
    fn serde_goes_through_validation() {
        let field: FieldDocument = serde_json::from_value(json!({"name": "a", "type": "long"})).unwrap();
        assert_eq!(field.name(), "a");
        let bad: Result<FieldDocument, _> = serde_json::from_value(json!({"name": "a"}));
        assert!(bad.is_err());
    }
}
