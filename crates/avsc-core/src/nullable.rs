//! # Nullable-Union Policy
//!
//! Computes how a type is wrapped in a nullable union. The first branch of an
//! Avro union is the one a field default is resolved against, so:
//!
//! - without a default (or with a `null` default) `null` goes first;
//! - with a non-null default the original type stays first and `null` is
//!   appended.
//!
//! A type that already admits `null` is returned unchanged, and a one-element
//! union `[T]` is treated exactly like bare `T`.

use serde_json::Value;

use crate::document::{is_primitive, SchemaDocument};
use crate::primitive::PrimitiveType;

/// Whether the type is `null` itself or a union with a `null` branch.
pub fn is_nullable(type_doc: &SchemaDocument) -> bool {
    match type_doc {
        Value::Array(branches) => branches
            .iter()
            .any(|b| is_primitive(b, PrimitiveType::Null)),
        other => is_primitive(other, PrimitiveType::Null),
    }
}

/// Wrap `type_doc` in a nullable union.
pub fn make_nullable(type_doc: &SchemaDocument, default: Option<&Value>) -> SchemaDocument {
    if is_nullable(type_doc) {
        return type_doc.clone();
    }

    let mut branches = match type_doc {
        Value::Array(branches) => branches.clone(),
        other => vec![other.clone()],
    };
    match default {
        Some(v) if !v.is_null() => branches.push(PrimitiveType::Null.document()),
        _ => branches.insert(0, PrimitiveType::Null.document()),
    }
    Value::Array(branches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn no_default_puts_null_first() {
        assert_eq!(make_nullable(&json!("int"), None), json!(["null", "int"]));
        assert_eq!(make_nullable(&json!(["int"]), None), json!(["null", "int"]));
    }

    #[test]
    fn default_puts_null_last() {
        let ten = json!(10);
        assert_eq!(make_nullable(&json!("int"), Some(&ten)), json!(["int", "null"]));
        assert_eq!(make_nullable(&json!(["int"]), Some(&ten)), json!(["int", "null"]));
    }

    #[test]
    fn null_default_behaves_like_no_default() {
        let null = Value::Null;
        assert_eq!(make_nullable(&json!("long"), Some(&null)), json!(["null", "long"]));
    }

    #[test]
    fn null_type_is_unchanged() {
        assert_eq!(make_nullable(&json!("null"), None), json!("null"));
        assert_eq!(make_nullable(&json!({"type": "null"}), None), json!({"type": "null"}));
    }

    #[test]
    fn nullable_union_is_unchanged_even_with_default() {
        let ten = json!(10);
        assert_eq!(
            make_nullable(&json!(["null", "long"]), Some(&ten)),
            json!(["null", "long"])
        );
    }

    #[test]
    fn multi_branch_union_gains_null() {
        assert_eq!(
            make_nullable(&json!(["double", "bytes"]), None),
            json!(["null", "double", "bytes"])
        );
    }

    #[test]
    fn complex_type_is_wrapped() {
        let enum_doc = json!({"type": "enum", "name": "e", "symbols": ["a"]});
        assert_eq!(
            make_nullable(&enum_doc, None),
            json!(["null", {"type": "enum", "name": "e", "symbols": ["a"]}])
        );
    }

    #[test]
    fn is_nullable_cases() {
        assert!(is_nullable(&json!("null")));
        assert!(is_nullable(&json!(["int", "null"])));
        assert!(!is_nullable(&json!("int")));
        assert!(!is_nullable(&json!(["int", "string"])));
        assert!(!is_nullable(&json!({"type": "array", "items": "null"})));
    }

    fn non_null_primitive() -> impl Strategy<Value = PrimitiveType> {
        prop::sample::select(
            PrimitiveType::ALL
                .into_iter()
                .filter(|p| *p != PrimitiveType::Null)
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        #[test]
        fn make_nullable_is_idempotent(p in non_null_primitive(), with_default in any::<bool>()) {
            let default = json!(1);
            let default = with_default.then_some(&default);
            let once = make_nullable(&p.document(), default);
            let twice = make_nullable(&once, default);
            prop_assert_eq!(&once, &twice);
            prop_assert!(is_nullable(&once));
        }

        #[test]
        fn single_branch_union_matches_bare_type(p in non_null_primitive(), with_default in any::<bool>()) {
            let default = json!("x");
            let default = with_default.then_some(&default);
            prop_assert_eq!(
                make_nullable(&p.document(), default),
                make_nullable(&json!([p.as_str()]), default)
            );
        }
    }
}
