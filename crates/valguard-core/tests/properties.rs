//! Property tests: a mutable value is valid after every write, and failed
//! writes leave no trace.

use proptest::prelude::*;
use serde_json::{json, Value};
use valguard_core::{Schema, SchemaExt, SharedSchema, ValidatedMutableType, ValidatedType};
use valguard_schema::{JsonSchema, RecordSchema};

/// `{ a: int >= 0, b: int >= 0, inner: { c: int >= 0 } }` with `a < b`.
fn ordered_pair() -> SharedSchema {
    let int = || JsonSchema::from_value(json!({"type": "integer", "minimum": 0})).unwrap();
    RecordSchema::new("ordered_pair")
        .field("a", int())
        .field("b", int())
        .field("inner", RecordSchema::new("inner").field("c", int()))
        .refine(
            |v| v["a"].as_i64() < v["b"].as_i64(),
            "a must be less than b",
        )
        .shared()
}

#[derive(Debug, Clone)]
enum Write {
    Top(&'static str, i64),
    Nested(i64),
    WholeInner(i64),
}

fn write() -> impl Strategy<Value = Write> {
    prop_oneof![
        (prop_oneof![Just("a"), Just("b")], -5i64..20).prop_map(|(f, n)| Write::Top(f, n)),
        (-5i64..20).prop_map(Write::Nested),
        (-5i64..20).prop_map(Write::WholeInner),
    ]
}

proptest! {
    /// Every write either commits a valid whole or changes nothing.
    #[test]
    fn mutation_is_atomic(writes in prop::collection::vec(write(), 1..32)) {
        let schema = ordered_pair();
        let t = ValidatedMutableType::from_shared(schema.clone(), Default::default());
        let mut v = t.create(&json!({"a": 0, "b": 1, "inner": {"c": 0}})).unwrap();

        for w in writes {
            let before = v.value().clone();
            let result = match &w {
                Write::Top(field, n) => v.set(field, json!(n)),
                Write::Nested(n) => v
                    .record_mut("inner")
                    .and_then(|mut inner| inner.set("c", json!(n))),
                Write::WholeInner(n) => v.set("inner", json!({"c": n})),
            };

            match result {
                Ok(()) => {
                    let expected = match &w {
                        Write::Top(field, n) => (v.get(field), json!(n)),
                        Write::Nested(n) | Write::WholeInner(n) => {
                            (v.pointer("/inner/c"), json!(n))
                        }
                    };
                    prop_assert_eq!(expected.0, Some(&expected.1));
                }
                Err(_) => prop_assert_eq!(v.value(), &before),
            }

            let reparsed = schema.parse(v.snapshot());
            prop_assert!(reparsed.is_ok(), "snapshot no longer valid: {:?}", reparsed.err());
            prop_assert_eq!(&reparsed.unwrap(), v.value());
        }
    }

    /// Construction succeeds exactly when the schema accepts the input,
    /// and the value holds the schema's output.
    #[test]
    fn construction_is_sound(a in -10i64..10, b in -10i64..10, c in -10i64..10) {
        let schema = ordered_pair();
        let t = ValidatedType::from_shared(schema.clone(), Default::default());
        let input: Value = json!({"a": a, "b": b, "inner": {"c": c}});

        match (t.create(&input), schema.parse(&input)) {
            (Ok(v), Ok(output)) => prop_assert_eq!(v.value(), &output),
            (Err(e), Err(expected)) => prop_assert_eq!(e, expected),
            (got, expected) => prop_assert!(
                false,
                "create and parse disagree: {:?} vs {:?}",
                got.is_ok(),
                expected.is_ok()
            ),
        }
    }
}
