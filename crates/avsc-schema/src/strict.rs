//! # Strict Structural Checks
//!
//! Rules that `apache-avro` parses leniently but that a schema document must
//! still obey. The checks walk the whole tree and collect every violation
//! with a JSON Pointer path instead of stopping at the first one.
//!
//! Name uniqueness is always checked: a full name may be defined once per
//! document, and a union may not name the same type in two branches. Full
//! names follow the Avro rules: a dotted name is already full, otherwise the
//! type's `namespace` or else the enclosing named type's namespace applies.

use std::collections::HashMap;

use serde_json::{Map, Value};

use avsc_core::PrimitiveType;

use crate::config::ValidationConfig;
use crate::validate::Violation;

/// Type tags that may not be used as the name of a named type.
const RESERVED_TYPE_NAMES: [&str; 7] = ["record", "error", "enum", "fixed", "array", "map", "union"];

const NAMED_KINDS: [&str; 4] = ["record", "error", "enum", "fixed"];

const SORT_ORDERS: [&str; 3] = ["ascending", "descending", "ignore"];

/// Largest `size` accepted for a fixed type.
const MAX_FIXED_SIZE: u64 = i32::MAX as u64;

/// Run every enabled check over `doc`.
pub(crate) fn check_document(doc: &Value, config: &ValidationConfig) -> Vec<Violation> {
    let mut walker = Walker {
        config,
        defined: HashMap::new(),
        out: Vec::new(),
    };
    walker.walk(doc, "", None);
    walker.out
}

struct Walker<'c> {
    config: &'c ValidationConfig,
    /// Full name of every named type seen so far, with its path.
    defined: HashMap<String, String>,
    out: Vec<Violation>,
}

impl Walker<'_> {
    fn walk(&mut self, doc: &Value, path: &str, namespace: Option<&str>) {
        match doc {
            Value::Array(branches) => {
                self.check_union_branches(branches, path, namespace);
                for (i, branch) in branches.iter().enumerate() {
                    self.walk(branch, &format!("{path}/{i}"), namespace);
                }
            }
            Value::Object(map) => self.walk_keyed(map, path, namespace),
            _ => {}
        }
    }

    fn walk_keyed(&mut self, map: &Map<String, Value>, path: &str, namespace: Option<&str>) {
        let mut inner_namespace = namespace.map(str::to_string);

        match map.get("type") {
            Some(Value::String(kind)) if NAMED_KINDS.contains(&kind.as_str()) => {
                if let Some(name) = self.check_name(map, path) {
                    let fullname = full_name(name, explicit_namespace(map), namespace);
                    inner_namespace = namespace_of(&fullname).map(str::to_string);
                    self.define(fullname, path);
                }
                if kind == "fixed" {
                    self.check_fixed_size(map, path);
                }
            }
            // `{"type": {...}}` nests a full type.
            Some(nested @ (Value::Object(_) | Value::Array(_))) => {
                self.walk(nested, &format!("{path}/type"), namespace);
            }
            _ => {}
        }

        if self.config.check_decimal
            && map.get("logicalType").and_then(Value::as_str) == Some("decimal")
        {
            check_decimal(map, path, &mut self.out);
        }

        let namespace = inner_namespace.as_deref();
        if let Some(items) = map.get("items") {
            self.walk(items, &format!("{path}/items"), namespace);
        }
        if let Some(values) = map.get("values") {
            self.walk(values, &format!("{path}/values"), namespace);
        }
        if let Some(Value::Array(fields)) = map.get("fields") {
            for (i, field) in fields.iter().enumerate() {
                let field_path = format!("{path}/fields/{i}");
                let Some(field) = field.as_object() else {
                    continue;
                };
                if self.config.check_field_order {
                    check_order(field, &field_path, &mut self.out);
                }
                if let Some(field_type) = field.get("type") {
                    self.walk(field_type, &format!("{field_path}/type"), namespace);
                }
            }
        }
    }

    /// Checks the `name` of a named type and returns it when it is a
    /// non-empty string.
    fn check_name<'m>(&mut self, map: &'m Map<String, Value>, path: &str) -> Option<&'m str> {
        match map.get("name") {
            Some(Value::String(name)) if name.is_empty() => {
                self.out.push(violation(path, "named type has an empty name"));
                None
            }
            Some(Value::String(name)) => {
                // The last dotted component is the simple name.
                let simple = name.rsplit('.').next().unwrap_or(name.as_str());
                if self.config.reject_reserved_names
                    && (PrimitiveType::is_primitive_name(simple)
                        || RESERVED_TYPE_NAMES.contains(&simple))
                {
                    self.out
                        .push(violation(path, format!("'{name}' is a reserved type name")));
                }
                Some(name.as_str())
            }
            Some(other) => {
                self.out.push(violation(
                    path,
                    format!("named type requires a string name, got {other}"),
                ));
                None
            }
            None => {
                self.out.push(violation(path, "named type is missing a name"));
                None
            }
        }
    }

    fn define(&mut self, fullname: String, path: &str) {
        if let Some(first) = self.defined.get(&fullname) {
            let first = if first.is_empty() { "(root)" } else { first.as_str() };
            self.out.push(violation(
                path,
                format!("named type '{fullname}' is already defined at {first}"),
            ));
        } else {
            self.defined.insert(fullname, path.to_string());
        }
    }

    fn check_fixed_size(&mut self, map: &Map<String, Value>, path: &str) {
        if let Some(size) = map.get("size").and_then(Value::as_u64) {
            if size > MAX_FIXED_SIZE {
                self.out.push(violation(
                    path,
                    format!("fixed size {size} exceeds the maximum of {MAX_FIXED_SIZE}"),
                ));
            }
        }
    }

    /// A union may reference or define each named type once.
    fn check_union_branches(&mut self, branches: &[Value], path: &str, namespace: Option<&str>) {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (i, branch) in branches.iter().enumerate() {
            let Some(fullname) = branch_name(branch, namespace) else {
                continue;
            };
            if let Some(first) = seen.get(&fullname) {
                self.out.push(violation(
                    &format!("{path}/{i}"),
                    format!("union already has a branch for '{fullname}' at index {first}"),
                ));
            } else {
                seen.insert(fullname, i);
            }
        }
    }
}

/// Full name of a named type given its `name`, its own `namespace` and the
/// enclosing namespace. An empty namespace is the null namespace.
fn full_name(name: &str, own: Option<&str>, enclosing: Option<&str>) -> String {
    if name.contains('.') {
        return name.to_string();
    }
    match own.or(enclosing).filter(|ns| !ns.is_empty()) {
        Some(ns) => format!("{ns}.{name}"),
        None => name.to_string(),
    }
}

fn explicit_namespace(map: &Map<String, Value>) -> Option<&str> {
    map.get("namespace").and_then(Value::as_str)
}

fn namespace_of(fullname: &str) -> Option<&str> {
    fullname.rsplit_once('.').map(|(ns, _)| ns)
}

/// Full name of a union branch that names a type: a reference to a named
/// type or an inline named-type definition.
fn branch_name(branch: &Value, namespace: Option<&str>) -> Option<String> {
    match branch {
        Value::String(reference) if !PrimitiveType::is_primitive_name(reference) => {
            Some(full_name(reference, None, namespace))
        }
        Value::Object(map) => {
            let kind = map.get("type").and_then(Value::as_str)?;
            if !NAMED_KINDS.contains(&kind) {
                return None;
            }
            let name = map.get("name").and_then(Value::as_str).filter(|n| !n.is_empty())?;
            Some(full_name(name, explicit_namespace(map), namespace))
        }
        _ => None,
    }
}

fn check_order(field: &Map<String, Value>, path: &str, out: &mut Vec<Violation>) {
    match field.get("order") {
        None => {}
        Some(Value::String(order)) if SORT_ORDERS.contains(&order.as_str()) => {}
        Some(other) => out.push(violation(
            path,
            format!("invalid sort order {other}, expected one of {SORT_ORDERS:?}"),
        )),
    }
}

fn check_decimal(map: &Map<String, Value>, path: &str, out: &mut Vec<Violation>) {
    let precision = match map.get("precision") {
        Some(Value::Number(n)) => match n.as_u64().filter(|p| *p >= 1) {
            Some(p) => p,
            None => {
                out.push(violation(path, format!("decimal precision must be a positive integer, got {n}")));
                return;
            }
        },
        Some(other) => {
            out.push(violation(path, format!("decimal precision must be a positive integer, got {other}")));
            return;
        }
        None => {
            out.push(violation(path, "decimal is missing precision"));
            return;
        }
    };

    let scale = match map.get("scale") {
        None => 0,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(s) => s,
            None => {
                out.push(violation(path, format!("decimal scale must be a non-negative integer, got {n}")));
                return;
            }
        },
        Some(other) => {
            out.push(violation(path, format!("decimal scale must be a non-negative integer, got {other}")));
            return;
        }
    };

    if scale > precision {
        out.push(violation(
            path,
            format!("decimal scale {scale} exceeds precision {precision}"),
        ));
    }

    if map.get("type").and_then(Value::as_str) == Some("fixed") {
        if let Some(size) = map.get("size").and_then(Value::as_u64) {
            let max = max_fixed_precision(size);
            if precision > max {
                out.push(violation(
                    path,
                    format!("decimal precision {precision} does not fit in fixed size {size} (max {max})"),
                ));
            }
        }
    }
}

/// Largest number of base-10 digits a signed two's complement value of
/// `size` bytes can hold: floor(log10(2^(8*size - 1) - 1)).
fn max_fixed_precision(size: u64) -> u64 {
    match size.saturating_mul(8) {
        0 => 0,
        bits => ((bits - 1) as f64 * std::f64::consts::LOG10_2).floor() as u64,
    }
}

fn violation(path: &str, message: impl Into<String>) -> Violation {
    Violation {
        instance_path: path.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(doc: Value) -> Vec<Violation> {
        check_document(&doc, &ValidationConfig::default())
    }

    #[test]
    fn valid_record_has_no_violations() {
        let doc = json!({
            "type": "record",
            "name": "user",
            "fields": [
                {"name": "id", "type": "int", "order": "descending"},
                {"name": "amount", "type": {"type": "bytes", "logicalType": "decimal", "precision": 5, "scale": 2}}
            ]
        });
        assert!(check(doc).is_empty());
    }

    #[test]
    fn reserved_names_are_rejected() {
        let v = check(json!({"type": "enum", "name": "int", "symbols": ["a"]}));
        assert_eq!(v.len(), 1);
        assert!(v[0].message.contains("reserved"));

        let v = check(json!({"type": "fixed", "name": "ns.record", "size": 4}));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn missing_empty_and_non_string_names() {
        assert_eq!(check(json!({"type": "fixed", "size": 4})).len(), 1);
        assert_eq!(check(json!({"type": "fixed", "name": "", "size": 4})).len(), 1);
        assert_eq!(check(json!({"type": "fixed", "name": 100, "size": 4})).len(), 1);
    }

    #[test]
    fn reserved_name_check_can_be_disabled() {
        let config = ValidationConfig {
            reject_reserved_names: false,
            ..ValidationConfig::default()
        };
        let doc = json!({"type": "enum", "name": "int", "symbols": ["a"]});
        assert!(check_document(&doc, &config).is_empty());
    }

    #[test]
    fn invalid_sort_order_reports_field_path() {
        let v = check(json!({
            "type": "record",
            "name": "r",
            "fields": [
                {"name": "a", "type": "int"},
                {"name": "b", "type": "int", "order": "asc"}
            ]
        }));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].instance_path, "/fields/1");
    }

    #[test]
    fn decimal_rules() {
        let bytes = |p: Value, s: Value| json!({"type": "bytes", "logicalType": "decimal", "precision": p, "scale": s});
        assert_eq!(check(bytes(json!(-1), json!(3))).len(), 1);
        assert_eq!(check(bytes(json!(1), json!(-2))).len(), 1);
        assert_eq!(check(bytes(json!(1), json!(3))).len(), 1);
        assert_eq!(check(bytes(json!("4"), json!(3))).len(), 1);
        assert!(check(bytes(json!(5), json!(2))).is_empty());
    }

    #[test]
    fn fixed_decimal_precision_must_fit_size() {
        let fixed = |p: u64, size: u64| {
            json!({"type": "fixed", "logicalType": "decimal", "name": "d", "precision": p, "scale": 0, "size": size})
        };
        assert!(check(fixed(38, 16)).is_empty());
        assert_eq!(check(fixed(39, 16)).len(), 1);
        assert!(check(fixed(2, 1)).is_empty());
        assert_eq!(check(fixed(3, 1)).len(), 1);
    }

    #[test]
    fn max_fixed_precision_known_values() {
        assert_eq!(max_fixed_precision(1), 2);
        assert_eq!(max_fixed_precision(4), 9);
        assert_eq!(max_fixed_precision(8), 18);
        assert_eq!(max_fixed_precision(16), 38);
        assert!(max_fixed_precision(u64::MAX) > 38);
    }

    #[test]
    fn oversized_fixed_is_a_violation() {
        let v = check(json!({
            "type": "fixed",
            "logicalType": "decimal",
            "name": "d",
            "precision": 4,
            "scale": 0,
            "size": 4_611_686_018_427_387_904_u64
        }));
        assert_eq!(v.len(), 1);
        assert!(v[0].message.contains("exceeds the maximum"));
    }

    #[test]
    fn redefined_name_in_record_is_rejected() {
        let v = check(json!({
            "type": "record",
            "name": "foo",
            "fields": [{"name": "bar", "type": {"type": "enum", "name": "foo", "symbols": ["a"]}}]
        }));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].instance_path, "/fields/0/type");
        assert!(v[0].message.contains("already defined at (root)"));
    }

    #[test]
    fn union_of_two_named_types_with_one_name() {
        let v = check(json!([
            {"type": "enum", "name": "foo", "symbols": ["a"]},
            {"type": "fixed", "name": "foo", "size": 16}
        ]));
        assert!(!v.is_empty());
        assert!(v.iter().all(|v| v.instance_path == "/1"));
    }

    #[test]
    fn union_referencing_a_type_twice() {
        let v = check(json!({
            "type": "record",
            "name": "r",
            "namespace": "ns",
            "fields": [
                {"name": "e", "type": {"type": "enum", "name": "color", "symbols": ["red"]}},
                {"name": "u", "type": ["null", "color", "ns.color"]}
            ]
        }));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].instance_path, "/fields/1/type/2");
    }

    #[test]
    fn names_are_compared_by_full_name() {
        // Same simple name in different namespaces.
        let distinct = json!({
            "type": "record",
            "name": "a.r",
            "fields": [
                {"name": "x", "type": {"type": "enum", "name": "e", "symbols": ["s"]}},
                {"name": "y", "type": {"type": "enum", "name": "e", "namespace": "b", "symbols": ["s"]}}
            ]
        });
        assert!(check(distinct).is_empty());

        // Inherited namespace and a dotted name resolve to the same type.
        let clash = json!({
            "type": "record",
            "name": "a.r",
            "fields": [
                {"name": "x", "type": {"type": "enum", "name": "e", "symbols": ["s"]}},
                {"name": "y", "type": {"type": "fixed", "name": "a.e", "size": 2}}
            ]
        });
        let v = check(clash);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].instance_path, "/fields/1/type");
    }

    #[test]
    fn name_uniqueness_ignores_config() {
        let doc = json!([
            {"type": "enum", "name": "foo", "symbols": ["a"]},
            {"type": "fixed", "name": "foo", "size": 16}
        ]);
        assert!(!check_document(&doc, &ValidationConfig::permissive()).is_empty());
    }

    #[test]
    fn nested_types_are_walked() {
        let v = check(json!({
            "type": "record",
            "name": "outer",
            "fields": [
                {"name": "a", "type": {"type": "array", "items": {"type": "enum", "name": "long", "symbols": ["x"]}}},
                {"name": "b", "type": ["null", {"type": "map", "values": {"type": "fixed", "name": "", "size": 2}}]}
            ]
        }));
        let paths: Vec<&str> = v.iter().map(|v| v.instance_path.as_str()).collect();
        assert_eq!(paths, vec!["/fields/0/type/items", "/fields/1/type/1/values"]);
    }
}
