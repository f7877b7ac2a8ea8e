//! Integration tests: validated values end to end, over real JSON Schema
//! documents and composed record schemas.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use valguard_core::{
    Representation, Schema, SchemaExt, ValidatedMutableType, ValidatedOptions, ValidatedType,
};
use valguard_schema::{JsonSchema, RecordSchema};

fn non_negative_int() -> JsonSchema {
    JsonSchema::named("non_negative", json!({"type": "integer", "minimum": 0})).unwrap()
}

fn age_record() -> JsonSchema {
    JsonSchema::named(
        "age_record",
        json!({
            "type": "object",
            "properties": { "age": { "type": "integer", "minimum": 0 } },
            "required": ["age"],
            "additionalProperties": false
        }),
    )
    .unwrap()
}

/// `{ foo: int >= 0, bar: { baz: int >= 0 } }`
fn nested() -> RecordSchema {
    RecordSchema::new("nested")
        .field("foo", non_negative_int())
        .field("bar", RecordSchema::new("bar").field("baz", non_negative_int()))
}

/// A string that must start with `foo:`, with the prefix stripped.
fn tagged() -> impl Schema {
    JsonSchema::named("tag", json!({"type": "string", "pattern": "^foo:"}))
        .unwrap()
        .transform(|v| match v {
            Value::String(s) => Value::String(s.trim_start_matches("foo:").to_string()),
            other => other,
        })
}

// -- Immutable -----------------------------------------------------------

#[test]
fn test_immutable_record_is_bare() {
    let t = ValidatedType::new(age_record());
    let v = t.create(&json!({"age": 30})).unwrap();
    assert_eq!(v.get("age"), Some(&json!(30)));
    assert_eq!(v.representation(), Representation::Bare);

    for bad in [json!({"age": -1}), json!({"age": 0.5}), json!({}), json!(30)] {
        let err = t.create(&bad).unwrap_err();
        assert_eq!(err.schema_name, "age_record");
        assert!(!err.is_empty());
    }
}

#[test]
fn test_immutable_primitive_is_wrapped() {
    let t = ValidatedType::new(non_negative_int());
    assert_eq!(t.representation(), Some(Representation::Wrapped));
    let v = t.create(&json!(30)).unwrap();
    assert_eq!(v.get("value"), Some(&json!(30)));
    assert_eq!(v.to_visible(), json!({"value": 30}));
    assert!(t.create(&json!(-1)).is_err());
}

#[test]
fn test_immutable_nested_records_are_plain_reads() {
    let t = ValidatedType::new(nested());
    let v = t.create(&json!({"foo": 1, "bar": {"baz": 2}})).unwrap();
    assert_eq!(v.pointer("/bar/baz"), Some(&json!(2)));
    let err = t.create(&json!({"foo": 1, "bar": {"baz": -1}})).unwrap_err();
    assert_eq!(err.violations()[0].instance_path, "/bar/baz");
}

#[test]
fn test_immutable_typed_round_trip() {
    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Age {
        age: u32,
    }

    let t = ValidatedType::new(age_record());
    let v = t.create_from(&Age { age: 7 }).unwrap();
    assert_eq!(v.deserialize::<Age>().unwrap(), Age { age: 7 });
}

// -- Mutable: records ----------------------------------------------------

#[test]
fn test_mutable_age_record() {
    let mut v = ValidatedMutableType::new(age_record())
        .create(&json!({"age": 30}))
        .unwrap();
    v.set("age", json!(31)).unwrap();
    assert_eq!(v.get("age"), Some(&json!(31)));

    let err = v.set("age", json!(-1)).unwrap_err();
    assert_eq!(err.violations()[0].instance_path, "/age");
    assert_eq!(v.get("age"), Some(&json!(31)));
}

#[test]
fn test_mutable_primitive_replaces_value() {
    let mut v = ValidatedMutableType::new(non_negative_int())
        .create(&json!(30))
        .unwrap();
    v.set("value", json!(31)).unwrap();
    assert_eq!(v.get("value"), Some(&json!(31)));
    assert!(v.set("value", json!(-1)).is_err());
    assert_eq!(v.get("value"), Some(&json!(31)));
}

#[test]
fn test_mutable_nested_write_revalidates_whole() {
    let mut v = ValidatedMutableType::new(nested())
        .create(&json!({"foo": 1, "bar": {"baz": 2}}))
        .unwrap();

    v.record_mut("bar").unwrap().set("baz", json!(4)).unwrap();
    assert_eq!(v.pointer("/bar/baz"), Some(&json!(4)));

    let err = v.record_mut("bar").unwrap().set("baz", json!(-1)).unwrap_err();
    assert_eq!(err.violations()[0].instance_path, "/bar/baz");
    assert_eq!(v.value(), &json!({"foo": 1, "bar": {"baz": 4}}));

    assert!(v.set("bar", json!({"baz": -1})).is_err());
    assert_eq!(v.pointer("/bar/baz"), Some(&json!(4)));
}

#[test]
fn test_mutable_whole_field_replacement() {
    let mut v = ValidatedMutableType::new(nested())
        .create(&json!({"foo": 1, "bar": {"baz": 2}}))
        .unwrap();

    assert!(v.set("bar", json!({"baz": -1})).is_err());
    assert!(v.set("bar", json!({"baz": 1, "extra": true})).is_err());
    assert_eq!(v.pointer("/bar/baz"), Some(&json!(2)));

    v.set("bar", json!({"baz": 5})).unwrap();
    // The nested basis follows the replacement.
    v.record_mut("bar").unwrap().set("baz", json!(6)).unwrap();
    assert_eq!(v.value(), &json!({"foo": 1, "bar": {"baz": 6}}));
    assert_eq!(v.snapshot(), v.value());
}

#[test]
fn test_mutable_pointer_writes() {
    let mut v = ValidatedMutableType::new(nested())
        .create(&json!({"foo": 1, "bar": {"baz": 2}}))
        .unwrap();
    v.set_pointer("/bar/baz", json!(8)).unwrap();
    assert!(v.set_pointer("/bar/baz", json!(-8)).is_err());
    assert!(v.set_pointer("/bar/missing", json!(1)).is_err());
    assert!(v.set_pointer("/foo/x", json!(1)).is_err());
    assert_eq!(v.value(), &json!({"foo": 1, "bar": {"baz": 8}}));
}

// -- Mutable: transforms -------------------------------------------------

#[test]
fn test_transform_runs_on_input_shape() {
    let schema = RecordSchema::new("tags")
        .field("foo", tagged())
        .field("bar", tagged());
    let mut v = ValidatedMutableType::new(schema)
        .create(&json!({"foo": "foo:abc", "bar": "foo:def"}))
        .unwrap();
    assert_eq!(v.value(), &json!({"foo": "abc", "bar": "def"}));

    // `bar` is revalidated from its original input, not from "def".
    v.set("foo", json!("foo:xyz")).unwrap();
    assert_eq!(v.value(), &json!({"foo": "xyz", "bar": "def"}));
    assert_eq!(v.snapshot(), &json!({"foo": "foo:xyz", "bar": "foo:def"}));

    assert!(v.set("foo", json!("bad")).is_err());
    assert_eq!(v.get("foo"), Some(&json!("xyz")));
}

#[test]
fn test_wrapped_transform_replace_then_nested_write() {
    let schema = RecordSchema::new("tags")
        .field("foo", tagged())
        .field("bar", tagged());
    let mut v = ValidatedMutableType::with_options(schema, ValidatedOptions::wrapped())
        .create(&json!({"foo": "foo:abc", "bar": "foo:def"}))
        .unwrap();

    v.set("value", json!({"foo": "foo:ghi", "bar": "foo:jkl"}))
        .unwrap();
    assert_eq!(v.value(), &json!({"foo": "ghi", "bar": "jkl"}));

    // The replacement is the new basis; `bar` replays from "foo:jkl".
    v.record_mut("value")
        .unwrap()
        .set("foo", json!("foo:mno"))
        .unwrap();
    assert_eq!(v.to_visible(), json!({"value": {"foo": "mno", "bar": "jkl"}}));
    assert_eq!(v.snapshot(), &json!({"foo": "foo:mno", "bar": "foo:jkl"}));

    assert!(v.record_mut("value").unwrap().set("bar", json!("jkl")).is_err());
    assert_eq!(v.pointer("/value/bar"), Some(&json!("jkl")));
}

// -- Mutable: wrapped records --------------------------------------------

#[test]
fn test_wrapped_record_exposes_only_value() {
    let mut v = ValidatedMutableType::with_options(age_record(), ValidatedOptions::wrapped())
        .create(&json!({"age": 30}))
        .unwrap();
    assert_eq!(v.to_visible(), json!({"value": {"age": 30}}));
    assert!(v.set("age", json!(31)).is_err());

    v.record_mut("value").unwrap().set("age", json!(31)).unwrap();
    assert_eq!(v.pointer("/value/age"), Some(&json!(31)));

    v.set("value", json!({"age": 40})).unwrap();
    assert!(v.set("value", json!({"age": -40})).is_err());
    assert_eq!(v.value(), &json!({"age": 40}));
}

#[test]
fn test_wrapped_discriminated_union() {
    let shape = JsonSchema::named(
        "shape",
        json!({
            "oneOf": [
                {
                    "type": "object",
                    "properties": {
                        "kind": { "const": "circle" },
                        "radius": { "type": "number", "minimum": 0 }
                    },
                    "required": ["kind", "radius"]
                },
                {
                    "type": "object",
                    "properties": {
                        "kind": { "const": "square" },
                        "side": { "type": "number", "minimum": 0 }
                    },
                    "required": ["kind", "side"]
                }
            ]
        }),
    )
    .unwrap();

    let t = ValidatedMutableType::with_options(shape, ValidatedOptions::wrapped());
    let mut v = t.create(&json!({"kind": "circle", "radius": 1})).unwrap();

    v.record_mut("value").unwrap().set("radius", json!(2)).unwrap();
    assert!(v.record_mut("value").unwrap().set("radius", json!(-2)).is_err());
    assert!(v.record_mut("value").unwrap().set("kind", json!("square")).is_err());

    v.set("value", json!({"kind": "square", "side": 3})).unwrap();
    assert_eq!(v.pointer("/value/kind"), Some(&json!("square")));
    assert!(t.create(&json!({"kind": "triangle"})).is_err());
}

// -- Composition ---------------------------------------------------------

#[test]
fn test_validated_type_schema_composes() {
    let age = ValidatedType::new(non_negative_int());
    let person = RecordSchema::new("person")
        .field(
            "name",
            JsonSchema::from_value(json!({"type": "string", "minLength": 1})).unwrap(),
        )
        .field("age", age.schema().clone());

    let mut v = ValidatedMutableType::new(person)
        .create(&json!({"name": "John", "age": 30}))
        .unwrap();
    v.set("age", json!(31)).unwrap();
    assert!(v.set("age", json!(-1)).is_err());
    assert!(v.set("name", json!("")).is_err());
    assert_eq!(v.value(), &json!({"name": "John", "age": 31}));
}

#[test]
fn test_cross_field_refinement() {
    let range = RecordSchema::new("range")
        .field("min", non_negative_int())
        .field("max", non_negative_int())
        .refine(
            |v| v["min"].as_i64() <= v["max"].as_i64(),
            "min must not exceed max",
        );
    let t = ValidatedMutableType::new(range);
    assert_eq!(t.representation(), Some(Representation::Bare));

    let mut v = t.create(&json!({"min": 1, "max": 5})).unwrap();
    let err = v.set("min", json!(6)).unwrap_err();
    assert_eq!(err.violations()[0].message, "min must not exceed max");

    v.set("max", json!(10)).unwrap();
    v.set("min", json!(6)).unwrap();
    assert_eq!(v.value(), &json!({"min": 6, "max": 10}));
    assert!(t.create(&json!({"min": 3, "max": 2})).is_err());
}

#[test]
fn test_freeze_and_serialize() {
    let mut v = ValidatedMutableType::new(non_negative_int())
        .create(&json!(1))
        .unwrap();
    v.set("value", json!(2)).unwrap();
    assert_eq!(serde_json::to_value(&v).unwrap(), json!({"value": 2}));

    let frozen = v.freeze();
    assert_eq!(frozen.get("value"), Some(&json!(2)));
    assert_eq!(frozen.to_string(), r#"{"value":2}"#);
}
