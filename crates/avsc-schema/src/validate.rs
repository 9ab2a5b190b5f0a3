//! # Schema Validation
//!
//! The single boundary where an unvalidated [`SchemaDocument`] becomes a
//! [`ValidatedSchema`]. Validation runs in two passes:
//!
//! 1. Strict structural checks (see `strict.rs`), collected as a list of
//!    [`Violation`]s. Named-type uniqueness, within the document and across
//!    union branches, is checked here regardless of the config.
//! 2. `apache_avro::Schema::parse`, which enforces duplicate fields, enum
//!    symbols, fixed sizes and union shape. Its error is surfaced unchanged
//!    as [`SchemaValidationError::Parse`].
//!
//! Only a [`ValidatedSchema`] is accepted by codecs, so a document that was
//! never validated cannot be used to encode data.

use std::fmt;
use std::path::Path;

use apache_avro::Schema;
use serde_json::Value;
use thiserror::Error;

use avsc_core::SchemaDocument;

use crate::config::ValidationConfig;
use crate::strict;

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document broke one or more strict structural rules.
    #[error("schema validation failed:\n{violations}")]
    ValidationFailed {
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// `apache-avro` rejected the document.
    #[error("schema parse error: {0}")]
    Parse(String),

    /// A JSON schema string could not be parsed as JSON.
    #[error("schema source is not valid JSON: {0}")]
    SourceParse(String),

    /// A validation config file could not be loaded.
    #[error("config load error for '{path}': {reason}")]
    ConfigLoad {
        /// Path to the config file.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },

    /// IO error reading a schema file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single strict-check violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the offending node in the document.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A schema document that passed validation, together with its parsed form.
#[derive(Clone)]
pub struct ValidatedSchema {
    document: Value,
    inner: Schema,
}

impl fmt::Debug for ValidatedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedSchema")
            .field("document", &self.document)
            .finish()
    }
}

impl ValidatedSchema {
    /// The validated document, exactly as assembled.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn into_document(self) -> Value {
        self.document
    }

    /// The parsed `apache-avro` schema.
    pub fn inner(&self) -> &Schema {
        &self.inner
    }

    /// Avro Parsing Canonical Form.
    pub fn canonical_form(&self) -> String {
        self.inner.canonical_form()
    }

    /// Name of a named top-level type.
    pub fn name(&self) -> Option<&str> {
        match &self.inner {
            Schema::Record(r) => Some(r.name.name.as_str()),
            Schema::Enum(e) => Some(e.name.name.as_str()),
            Schema::Fixed(f) => Some(f.name.name.as_str()),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(&self.inner, Schema::Record(_))
    }
}

/// Two validated schemas are equal when their canonical forms are.
impl PartialEq for ValidatedSchema {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_form() == other.canonical_form()
    }
}

/// The three ways a schema may be handed to a consumer.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// A JSON string.
    Json(String),
    /// A parsed, unvalidated document.
    Document(SchemaDocument),
    /// An already validated schema.
    Validated(ValidatedSchema),
}

impl From<&str> for SchemaSource {
    fn from(s: &str) -> Self {
        Self::Json(s.to_string())
    }
}

impl From<String> for SchemaSource {
    fn from(s: String) -> Self {
        Self::Json(s)
    }
}

impl From<Value> for SchemaSource {
    fn from(doc: Value) -> Self {
        Self::Document(doc)
    }
}

impl From<&Value> for SchemaSource {
    fn from(doc: &Value) -> Self {
        Self::Document(doc.clone())
    }
}

impl From<ValidatedSchema> for SchemaSource {
    fn from(schema: ValidatedSchema) -> Self {
        Self::Validated(schema)
    }
}

impl From<&ValidatedSchema> for SchemaSource {
    fn from(schema: &ValidatedSchema) -> Self {
        Self::Validated(schema.clone())
    }
}

/// Validates schema documents.
///
/// Holds only its [`ValidationConfig`]; it is cheap to copy and safe to
/// share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator {
    config: ValidationConfig,
}

impl SchemaValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` if any strict check
    /// fails, or `SchemaValidationError::Parse` if `apache-avro` rejects the
    /// document.
    pub fn validate(&self, doc: &SchemaDocument) -> Result<ValidatedSchema, SchemaValidationError> {
        let violations = strict::check_document(doc, &self.config);
        if !violations.is_empty() {
            tracing::debug!(count = violations.len(), "strict schema checks failed");
            return Err(SchemaValidationError::ValidationFailed {
                violations: ValidationViolations { violations },
            });
        }

        let inner = Schema::parse(doc).map_err(|e| {
            tracing::debug!(error = %e, "apache-avro rejected schema");
            SchemaValidationError::Parse(e.to_string())
        })?;

        tracing::debug!(canonical = %inner.canonical_form(), "schema validated");
        Ok(ValidatedSchema {
            document: doc.clone(),
            inner,
        })
    }

    /// Validate a schema given as a JSON string.
    pub fn validate_str(&self, json: &str) -> Result<ValidatedSchema, SchemaValidationError> {
        let doc: Value = serde_json::from_str(json)
            .map_err(|e| SchemaValidationError::SourceParse(e.to_string()))?;
        self.validate(&doc)
    }

    /// Read and validate a schema file (`.avsc` or any JSON file).
    pub fn validate_file(&self, path: &Path) -> Result<ValidatedSchema, SchemaValidationError> {
        let content = std::fs::read_to_string(path)?;
        self.validate_str(&content)
    }

    /// Normalise any [`SchemaSource`] to a [`ValidatedSchema`]. Already
    /// validated schemas are returned as-is.
    pub fn resolve(
        &self,
        source: impl Into<SchemaSource>,
    ) -> Result<ValidatedSchema, SchemaValidationError> {
        match source.into() {
            SchemaSource::Json(json) => self.validate_str(&json),
            SchemaSource::Document(doc) => self.validate(&doc),
            SchemaSource::Validated(schema) => Ok(schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> SchemaValidator {
        SchemaValidator::default()
    }

    fn user_schema() -> Value {
        json!({
            "type": "record",
            "name": "user",
            "namespace": "yelp",
            "fields": [
                {"name": "id", "type": "int"},
                {"name": "fav_color", "type": {"type": "enum", "name": "color_enum", "symbols": ["red", "blue"]}}
            ]
        })
    }

    #[test]
    fn valid_record_keeps_document() {
        let schema = validator().validate(&user_schema()).unwrap();
        assert_eq!(schema.document(), &user_schema());
        assert_eq!(schema.name(), Some("user"));
        assert!(schema.is_record());
    }

    #[test]
    fn primitive_and_union_documents_validate() {
        let int = validator().validate(&json!("int")).unwrap();
        assert!(!int.is_record());
        assert_eq!(int.name(), None);
        validator().validate(&json!(["null", "string"])).unwrap();
    }

    #[test]
    fn resolve_accepts_all_three_sources() {
        let v = validator();
        let from_doc = v.resolve(user_schema()).unwrap();
        let from_str = v.resolve(user_schema().to_string()).unwrap();
        let from_schema = v.resolve(&from_doc).unwrap();
        assert_eq!(from_doc, from_str);
        assert_eq!(from_doc, from_schema);
        assert_eq!(from_str, from_schema);
    }

    #[test]
    fn invalid_json_string_is_a_source_error() {
        let err = validator().validate_str("{not json").unwrap_err();
        assert!(matches!(err, SchemaValidationError::SourceParse(_)));
    }

    #[test]
    fn unknown_type_reference_is_rejected() {
        let err = validator().validate(&json!("unknown")).unwrap_err();
        assert!(
            matches!(err, SchemaValidationError::Parse(_)),
            "Expected Parse, got: {err}"
        );
    }

    #[test]
    fn duplicate_enum_symbols_are_rejected() {
        let err = validator()
            .validate(&json!({"type": "enum", "name": "foo", "symbols": ["a", "a"]}))
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::Parse(_)));
    }

    #[test]
    fn nested_union_is_rejected() {
        let err = validator().validate(&json!([["int"]])).unwrap_err();
        assert!(matches!(err, SchemaValidationError::Parse(_)));
    }

    #[test]
    fn duplicate_union_branches_are_rejected() {
        assert!(validator().validate(&json!(["int", "int"])).is_err());
        assert!(validator()
            .validate(&json!([
                {"type": "map", "values": "int"},
                {"type": "map", "values": "int"}
            ]))
            .is_err());
    }

    #[test]
    fn strict_failure_lists_violations() {
        let err = validator()
            .validate(&json!({"type": "enum", "name": "int", "symbols": ["a"]}))
            .unwrap_err();
        match &err {
            SchemaValidationError::ValidationFailed { violations } => {
                assert_eq!(violations.len(), 1);
                assert!(err.to_string().contains("(root)"));
            }
            other => panic!("Expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn permissive_config_skips_strict_checks() {
        let v = SchemaValidator::new(ValidationConfig::permissive());
        let doc = json!({
            "type": "record",
            "name": "r",
            "fields": [{"name": "a", "type": "int", "order": "asc"}]
        });
        assert!(v.validate(&doc).is_ok());
        assert!(validator().validate(&doc).is_err());
    }

    #[test]
    fn validate_file_reads_avsc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.avsc");
        std::fs::write(&path, user_schema().to_string()).unwrap();
        let schema = validator().validate_file(&path).unwrap();
        assert_eq!(schema.name(), Some("user"));
    }

    #[test]
    fn violation_display_format() {
        let v = Violation {
            instance_path: "/fields/1".to_string(),
            message: "invalid sort order".to_string(),
        };
        assert_eq!(v.to_string(), "  /fields/1: invalid sort order");
    }
}
