//! # Validation Configuration
//!
//! Toggles for the optional strict checks run before a document is handed to
//! `apache-avro`. All checks are on by default. A config file may be YAML
//! (`.yaml`/`.yml`) or JSON (any other extension):
//!
//! ```yaml
//! reject_reserved_names: true
//! check_field_order: true
//! check_decimal: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::validate::SchemaValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Reject named types whose name is a primitive or complex type tag.
    pub reject_reserved_names: bool,
    /// Reject field `order` values other than ascending/descending/ignore.
    pub check_field_order: bool,
    /// Check precision and scale of `decimal` logical types.
    pub check_decimal: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            reject_reserved_names: true,
            check_field_order: true,
            check_decimal: true,
        }
    }
}

impl ValidationConfig {
    /// Only `apache-avro`'s rules and the always-on strict checks apply.
    pub fn permissive() -> Self {
        Self {
            reject_reserved_names: false,
            check_field_order: false,
            check_decimal: false,
        }
    }

    /// Load a config file, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ConfigLoad` if the file cannot be
    /// read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SchemaValidationError> {
        let load_err = |reason: String| SchemaValidationError::ConfigLoad {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| load_err(format!("cannot read file: {e}")))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| load_err(format!("invalid YAML: {e}"))),
            _ => serde_json::from_str(&content)
                .map_err(|e| load_err(format!("invalid JSON: {e}"))),
        }
    }
}
