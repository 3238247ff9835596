//! Property-based tests for normalization and aggregation.
//!
//! These complement the integration tests by checking the core guarantees
//! across generated inputs: idempotence, pointer transparency, and ordering of
//! extracted data.

use proptest::prelude::*;
use std::rc::Rc;
use structmeta::{normalize, reflect_struct, to_structs, Reflect, Value};

reflect_struct! {
    #[derive(Debug, Clone)]
    pub struct Sample {
        pub id: i64,
        pub items: Vec<i32>,
        pub note: Option<String>,
    }
}

fn sample() -> impl Strategy<Value = Sample> {
    (
        any::<i64>(),
        prop::collection::vec(any::<i32>(), 0..6),
        proptest::option::of("[a-z]{0,8}"),
    )
        .prop_map(|(id, items, note)| Sample { id, items, note })
}

fn assert_transparent<T: Reflect>(value: &T) -> Result<(), TestCaseError> {
    let direct = normalize(value);
    let via_ref = normalize(&value);
    let via_box = normalize(&Some(Rc::new(Box::new(value))));

    prop_assert!(!direct.was_pointer());
    for indirect in [&via_ref, &via_box] {
        prop_assert!(indirect.was_pointer());
        prop_assert_eq!(indirect.ty(), direct.ty());
        prop_assert_eq!(indirect.value(), direct.value());
        prop_assert_eq!(indirect.is_nil(), direct.is_nil());
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_normalize_idempotent_i64(n in any::<i64>(), wrap in any::<bool>()) {
        let input = if wrap { Some(n).reflect() } else { n.reflect() };
        let once = normalize(&input);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_normalize_idempotent_optional(opt in proptest::option::of(any::<bool>())) {
        let once = normalize(&opt);
        let twice = normalize(&once);
        prop_assert_eq!(twice.ty(), once.ty());
        prop_assert_eq!(twice.was_pointer(), once.was_pointer());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_normalize_idempotent_struct(s in sample()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_pointer_transparency_scalar(n in any::<i32>()) {
        assert_transparent(&n)?;
    }

    #[test]
    fn prop_pointer_transparency_string(s in ".{0,16}") {
        assert_transparent(&s)?;
    }

    #[test]
    fn prop_pointer_transparency_struct(s in sample()) {
        assert_transparent(&s)?;
    }

    #[test]
    fn prop_extract_ordering(samples in prop::collection::vec(sample(), 0..8)) {
        let structs = to_structs(&samples).unwrap();
        let data = structs.extract_data_by_name(["items", "note"]);

        let expected_items: Vec<Value> = samples
            .iter()
            .flat_map(|s| s.items.iter().map(|&i| Value::Int(i64::from(i))))
            .collect();
        let expected_notes: Vec<Value> = samples
            .iter()
            .map(|s| s.note.clone().map_or(Value::Nil, Value::from))
            .collect();

        if samples.is_empty() {
            prop_assert!(data.is_empty());
        } else {
            prop_assert_eq!(data["Sample"].len(), samples.len());
            prop_assert_eq!(data["items"].as_slice(), expected_items.as_slice());
            prop_assert_eq!(data["note"].as_slice(), expected_notes.as_slice());
        }
    }

    #[test]
    fn prop_all_or_nothing(samples in prop::collection::vec(sample(), 1..6), at in any::<prop::sample::Index>()) {
        let mut values: Vec<Value> = samples.iter().map(Reflect::reflect).collect();
        let bad = at.index(values.len() + 1);
        values.insert(bad, Value::Int(0));

        let err = to_structs(&values).unwrap_err();
        prop_assert!(err.is_not_a_struct());
        let rejected_at = match err {
            structmeta::Error::Collection { index, .. } => Some(index),
            _ => None,
        };
        prop_assert_eq!(rejected_at, Some(bad));
    }
}
