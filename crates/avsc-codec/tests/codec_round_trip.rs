//! Encode/decode through the public codec API, including schemas assembled
//! with the builder and reader/writer schema resolution.

use avsc_builder::SchemaBuilder;
use avsc_codec::{generate_payload_data, CodecError, DatumReader, DatumWriter};
use avsc_core::{FieldAttributes, PrimitiveType};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn primitives_schema() -> Value {
    json!({
        "type": "record",
        "name": "all_primitives",
        "fields": [
            {"name": "union_field", "type": ["null", "int"]},
            {"name": "union_field_null", "type": ["null", "int"], "default": null},
            {"name": "union_field_101", "type": ["int", "null"], "default": 101},
            {"name": "bool_field", "type": "boolean"},
            {"name": "bool_field_F", "type": "boolean", "default": false},
            {"name": "string_field", "type": "string"},
            {"name": "string_field_foo", "type": "string", "default": "foo❤"},
            {"name": "bytes_field", "type": "bytes"},
            {"name": "bytes_field_bar", "type": "bytes", "default": "bar"},
            {"name": "int_field", "type": "int"},
            {"name": "int_field_1", "type": "int", "default": 1},
            {"name": "long_field", "type": "long"},
            {"name": "long_field_42", "type": "long", "default": 42},
            {"name": "float_field", "type": "float"},
            {"name": "float_field_p75", "type": "float", "default": 0.75},
            {"name": "double_field", "type": "double"},
            {"name": "double_field_pi", "type": "double", "default": 3.14}
        ]
    })
}

#[test]
fn payload_without_overrides() {
    let writer = DatumWriter::new(primitives_schema()).unwrap();
    let data = generate_payload_data(writer.schema(), &Map::new()).unwrap();
    assert_eq!(
        Value::Object(data),
        json!({
            "union_field": null,
            "union_field_null": null,
            "union_field_101": 101,
            "bool_field": true,
            "bool_field_F": false,
            "string_field": "❤",
            "string_field_foo": "foo❤",
            "bytes_field": "Xw==",
            "bytes_field_bar": "YmFy",
            "int_field": 1,
            "int_field_1": 1,
            "long_field": 2,
            "long_field_42": 42,
            "float_field": 0.5,
            "float_field_p75": 0.75,
            "double_field": 2.2,
            "double_field_pi": 3.14
        })
    );
}

#[test]
fn payload_overrides_win() {
    let writer = DatumWriter::new(primitives_schema()).unwrap();
    let overrides = json!({"union_field": 101010, "union_field_101": null, "double_field_pi": 0.4});
    let data = generate_payload_data(writer.schema(), overrides.as_object().unwrap()).unwrap();
    assert_eq!(data["union_field"], json!(101010));
    assert_eq!(data["union_field_101"], json!(null));
    assert_eq!(data["double_field_pi"], json!(0.4));
}

#[test]
fn payload_round_trips_through_codec() {
    let writer = DatumWriter::new(primitives_schema()).unwrap();
    let reader = DatumReader::for_schema(writer.schema()).unwrap();
    let data = Value::Object(generate_payload_data(writer.schema(), &Map::new()).unwrap());

    let bytes = writer.encode(&data).unwrap();
    assert_eq!(reader.decode(&bytes).unwrap(), data);
}

#[test]
fn missing_fields_take_latin1_binary_defaults() {
    let schema = json!({
        "type": "record",
        "name": "defaults",
        "fields": [
            {"name": "b", "type": "bytes", "default": "abcd"},
            {"name": "f", "type": {"type": "fixed", "name": "pair", "size": 2}, "default": "\u{00ff}\u{0000}"},
            {"name": "u", "type": ["bytes", "null"], "default": "bar"}
        ]
    });
    let writer = DatumWriter::new(schema.clone()).unwrap();
    let bytes = writer.encode(&json!({})).unwrap();
    assert_eq!(
        bytes,
        [&[0x08][..], &b"abcd"[..], &[0xff, 0x00][..], &[0x00, 0x06][..], &b"bar"[..]].concat()
    );

    let decoded = DatumReader::for_schema(schema).unwrap().decode(&bytes).unwrap();
    assert_eq!(decoded, json!({"b": "YWJjZA==", "f": "/wA=", "u": "YmFy"}));
}

#[test]
fn binary_default_above_latin1_is_rejected() {
    let schema = json!({
        "type": "record",
        "name": "r",
        "fields": [{"name": "b", "type": "bytes", "default": "❤"}]
    });
    match DatumWriter::new(schema) {
        Ok(writer) => assert!(matches!(
            writer.encode(&json!({})).unwrap_err(),
            CodecError::InvalidValue(_)
        )),
        // apache-avro may already refuse the default while parsing.
        Err(err) => assert!(matches!(err, CodecError::Schema(_))),
    }
}

#[test]
fn null_message_is_rejected() {
    let writer = DatumWriter::new(primitives_schema()).unwrap();
    assert!(matches!(
        writer.encode(&Value::Null).unwrap_err(),
        CodecError::TypeMismatch { .. }
    ));
}

#[test]
fn empty_input_fails_to_decode() {
    let reader = DatumReader::for_schema(primitives_schema()).unwrap();
    assert!(matches!(reader.decode(&[]).unwrap_err(), CodecError::Decode(_)));
}

#[test]
fn invalid_schema_is_rejected_up_front() {
    let err = DatumWriter::new(r#"{"type": "enum", "name": "e", "symbols": ["a", "a"]}"#).unwrap_err();
    assert!(matches!(err, CodecError::Schema(_)));
}

#[test]
fn builder_schema_encodes_nested_values() {
    let mut b = SchemaBuilder::new();
    let color = b.begin_enum("color_enum", ["red", "blue"]).end().unwrap().into_document();
    let scores = b.begin_map(PrimitiveType::Double).end().unwrap().into_document();
    let day = b.begin_date().end().unwrap().into_document();
    let schema = b
        .begin_record("user")
        .add_field("id", PrimitiveType::Long)
        .unwrap()
        .add_field("fav_color", color)
        .unwrap()
        .add_field("other_color", "color_enum")
        .unwrap()
        .add_field("scores", scores)
        .unwrap()
        .add_field("joined", day)
        .unwrap()
        .end()
        .unwrap()
        .into_schema()
        .unwrap();

    let value = json!({
        "id": 9,
        "fav_color": "blue",
        "other_color": "red",
        "scores": {"math": 1.5},
        "joined": 19000
    });
    let bytes = DatumWriter::new(&schema).unwrap().encode(&value).unwrap();
    let decoded = DatumReader::for_schema(schema).unwrap().decode(&bytes).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn reader_schema_fills_new_field_default_and_drops_old_field() {
    let writer_schema = json!({
        "type": "record",
        "name": "user",
        "fields": [
            {"name": "id", "type": "int"},
            {"name": "legacy", "type": "string"}
        ]
    });

    let mut b = SchemaBuilder::new();
    b.begin_with_schema_json(&writer_schema)
        .remove_field("legacy")
        .unwrap()
        .add_field_with(FieldAttributes::new("country", "string").default_value("NL"))
        .unwrap();
    let reader_schema = b.end().unwrap().into_schema().unwrap();

    let bytes = DatumWriter::new(writer_schema.clone())
        .unwrap()
        .encode(&json!({"id": 4, "legacy": "x"}))
        .unwrap();
    let decoded = DatumReader::new(reader_schema, writer_schema)
        .unwrap()
        .decode(&bytes)
        .unwrap();
    assert_eq!(decoded, json!({"id": 4, "country": "NL"}));
}

proptest! {
    #[test]
    fn nullable_long_round_trips(value in proptest::option::of(any::<i64>())) {
        let schema = json!({
            "type": "record",
            "name": "r",
            "fields": [{"name": "v", "type": ["null", "long"]}]
        });
        let writer = DatumWriter::new(schema.clone()).unwrap();
        let reader = DatumReader::for_schema(schema).unwrap();
        let datum = json!({"v": value});
        let decoded = reader.decode(&writer.encode(&datum).unwrap()).unwrap();
        prop_assert_eq!(decoded, datum);
    }

    #[test]
    fn strings_round_trip(s in ".*") {
        let writer = DatumWriter::new(r#""string""#).unwrap();
        let reader = DatumReader::for_schema(r#""string""#).unwrap();
        let decoded = reader.decode(&writer.encode(&json!(s)).unwrap()).unwrap();
        prop_assert_eq!(decoded, json!(s));
    }
}
