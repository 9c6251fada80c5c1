// Copyright 2015-2024 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::Data;
use crate::error::ConversionError;
use crate::expression::{BinaryOp, Expression, Operator};
use crate::field::Attr;
use crate::item::Item;
use crate::num::{Num, NumKind};
use crate::record::Record;
use crate::selector::Selector;
use crate::text::Text;
use crate::value::{type_order, Value, ValueKind};

fn random_value(rng: &mut StdRng, depth: usize) -> Value {
    let kind = if depth == 0 {
        rng.gen_range(0..6)
    } else {
        rng.gen_range(0..7)
    };
    match kind {
        0 => Value::Absent,
        1 => Value::Extant,
        2 => Value::Bool(rng.gen()),
        3 => match rng.gen_range(0..4) {
            0 => Value::from(rng.gen_range(-3..3)),
            1 => Value::from(rng.gen_range(0u32..3)),
            2 => Value::from(f64::NAN),
            _ => Value::from(rng.gen_range(-2.0..2.0)),
        },
        4 => Value::text(["a", "b", "ab", ""][rng.gen_range(0..4)]),
        5 => Value::data(vec![rng.gen_range(0u8..3); rng.gen_range(0..3)]),
        _ => {
            let len = rng.gen_range(0..3);
            let record: Record = (0..len)
                .map(|_| match rng.gen_range(0..3) {
                    0 => Item::attr("a", random_value(rng, depth - 1)),
                    1 => Item::slot(random_value(rng, depth - 1), random_value(rng, depth - 1)),
                    _ => Item::of(random_value(rng, depth - 1)),
                })
                .collect();
            Value::Record(record)
        }
    }
}

#[test]
fn kinds_and_predicates() {
    assert_eq!(Value::Absent.kind(), ValueKind::Absent);
    assert_eq!(Value::from(1).kind(), ValueKind::Num);
    assert_eq!(Value::text("a").kind().name(), "Text");

    assert!(!Value::Absent.is_defined());
    assert!(Value::Extant.is_defined());
    assert!(!Value::Extant.is_distinct());
    assert!(Value::from(0).is_distinct());

    assert!(Value::Bool(true).is_definite());
    assert!(!Value::Bool(false).is_definite());
    assert!(!Value::empty_record().is_definite());
    assert!(Value::from_vec(vec![1]).is_definite());
    assert!(Value::from(0).is_definite());
    assert!(!Value::Extant.is_definite());
}

#[test]
fn type_order_ranks() {
    assert_eq!(type_order(&Item::attr("a", 1)), 1);
    assert_eq!(type_order(&Item::slot("a", 1)), 2);
    assert_eq!(type_order(&Item::of(Value::empty_record())), 3);
    assert_eq!(type_order(&Item::of(Value::data(vec![1u8]))), 4);
    assert_eq!(type_order(&Item::of("a")), 5);
    assert_eq!(type_order(&Item::of(1)), 6);
    assert_eq!(type_order(&Item::of(true)), 7);
    assert_eq!(type_order(&Item::of(Selector::identity())), 10);
    assert_eq!(
        type_order(&Item::of(Operator::binary(BinaryOp::Plus, 1, 2))),
        20
    );
    assert_eq!(type_order(&Item::extant()), 98);
    assert_eq!(type_order(&Item::absent()), 99);

    assert!(Value::text("z") < Value::from(0));
    assert!(Value::from(10) < Value::Bool(false));
    assert!(Value::empty_record() < Value::data(vec![0u8]));
    assert!(Value::Extant < Value::Absent);
}

#[test]
fn nan_is_equal_to_itself() {
    let nan = Value::from(f64::NAN);
    assert_eq!(nan, Value::from(f64::NAN));
    assert_eq!(nan.hash_code(), Value::from(f64::NAN).hash_code());
    assert!(Value::from(f64::INFINITY) < nan);
    assert_eq!(Value::from(0.0), Value::from(-0.0));
    assert_eq!(Value::from(0.0).hash_code(), Value::from(-0.0).hash_code());
}

#[test]
fn numbers_of_different_kinds_compare_by_value() {
    assert_eq!(Value::from(3u32), Value::from(3.0));
    assert_eq!(Value::from(3u64).hash_code(), Value::from(3).hash_code());
    assert_eq!(Num::from(3u64).kind(), NumKind::UInt64);
}

#[test]
fn random_total_order() {
    let mut rng = StdRng::seed_from_u64(0x0dde);
    let values: Vec<Value> = (0..120).map(|_| random_value(&mut rng, 2)).collect();

    for a in &values {
        assert_eq!(a.compare(a), Ordering::Equal);
        for b in &values {
            let ab = a.compare(b);
            assert_eq!(ab, b.compare(a).reverse());
            if ab == Ordering::Equal {
                assert_eq!(a.hash_code(), b.hash_code());
            }
            for c in values.iter().take(30) {
                if ab != Ordering::Greater && b.compare(c) != Ordering::Greater {
                    assert_ne!(a.compare(c), Ordering::Greater);
                }
            }
        }
    }

    let mut sorted = values.clone();
    sorted.sort();
    for pair in sorted.windows(2) {
        assert_ne!(pair[0].compare(&pair[1]), Ordering::Greater);
    }
}

#[test]
fn hash_set_deduplicates_equal_values() {
    let mut set = HashSet::new();
    set.insert(Value::from_vec(vec![1, 2]));
    set.insert(Value::Record(Record::of([Value::from(1u32), Value::from(2.0)])));
    set.insert(Value::text("a"));
    set.insert(Value::Text(Text::from(String::from("a"))));
    assert_eq!(set.len(), 2);
}

#[test]
fn arithmetic() {
    assert_eq!(Value::from(2).plus(&Value::from(3)), Value::from(5));
    assert_eq!(Value::from(2) + Value::from(3), Value::from(5));
    assert_eq!(&Value::from(7) - &Value::from(2), Value::from(5));
    assert_eq!(Value::from(7) % Value::from(4), Value::from(3));
    assert_eq!(Value::from(1) / Value::from(4), Value::from(0.25));
    assert_eq!(Value::from(6) * Value::from(7), Value::from(42));
    assert_eq!(-Value::from(3), Value::from(-3));
    assert_eq!(Value::from(4).inverse(), Value::from(0.25));
    assert_eq!(Value::from(4).positive(), Value::from(4));
}

#[test]
fn meaningless_operations_are_absent() {
    assert_eq!(Value::text("x").plus(&Value::from(1)), Value::Absent);
    assert_eq!(Value::empty_record().times(&Value::from(2)), Value::Absent);
    assert_eq!(Value::text("x").negative(), Value::Absent);
    assert_eq!(Value::from(1).not(), Value::Absent);
    assert_eq!(Value::Absent.minus(&Value::Absent), Value::Absent);
}

#[test]
fn concatenation() {
    assert_eq!(Value::text("ab").plus(&Value::text("cd")), Value::text("abcd"));
    assert_eq!(
        Value::data(vec![1u8]).plus(&Value::data(vec![2u8])),
        Value::data(vec![1u8, 2])
    );
}

#[test]
fn logical_operators() {
    assert_eq!(Value::from(1).or(&Value::from(2)), Value::from(1));
    assert_eq!(Value::Bool(false).or(&Value::from(2)), Value::from(2));
    assert_eq!(Value::Bool(true).and(&Value::from(2)), Value::from(2));
    assert_eq!(Value::Absent.and(&Value::from(2)), Value::Absent);
    assert_eq!(Value::Absent.not(), Value::Bool(true));
    assert_eq!(Value::Bool(true).not(), Value::Bool(false));
    assert_eq!(
        Value::Bool(true).conditional(&Value::from(1), &Value::from(2)),
        Value::from(1)
    );
    assert_eq!(
        Value::Extant.conditional(&Value::from(1), &Value::from(2)),
        Value::from(2)
    );
}

#[test]
fn bitwise_operators() {
    assert_eq!(Value::from(6).bitwise_and(&Value::from(3)), Value::from(2));
    assert_eq!(Value::from(6) | Value::from(3), Value::from(7));
    assert_eq!(Value::from(6) ^ Value::from(3), Value::from(5));
    assert_eq!(Value::from(0).bitwise_not(), Value::from(-1));
    assert_eq!(Value::Bool(true) & Value::Bool(false), Value::Bool(false));
    assert_eq!(Value::Bool(true).bitwise_not(), Value::Bool(false));
    assert_eq!(Value::text("a") | Value::from(1), Value::Absent);
}

#[test]
fn comparison_operators() {
    assert_eq!(Value::from(1).less_than(&Value::from(2)), Value::Bool(true));
    assert_eq!(
        Value::from(2).less_than_or_equal(&Value::from(2)),
        Value::Bool(true)
    );
    assert_eq!(Value::from(2).greater_than(&Value::from(2)), Value::Bool(false));
    assert_eq!(
        Value::from(2).greater_than_or_equal(&Value::from(1)),
        Value::Bool(true)
    );
    assert_eq!(Value::text("a").equal_to(&Value::text("a")), Value::Bool(true));
    assert_eq!(Value::text("a").not_equal_to(&Value::from(1)), Value::Bool(true));
    assert_eq!(Value::text("a").less_than(&Value::from(1)), Value::Bool(true));
}

#[test]
fn extrema_follow_total_order() {
    assert_eq!(Value::from(2).max(Value::from(3)), Value::from(3));
    assert_eq!(Value::from(1).max(Value::text("a")), Value::from(1));
    assert_eq!(Value::Absent.min(Value::Extant), Value::Extant);
    assert_eq!(
        Item::slot("a", 1).min(Item::of(0)),
        Item::slot("a", 1)
    );
}

#[test]
fn operators_on_expressions_are_deferred() {
    let lhs = Value::from(Selector::identity().get("a"));
    let result = lhs.plus(&Value::from(1));
    assert_eq!(
        result,
        Value::from(Expression::Operator(Operator::binary(
            BinaryOp::Plus,
            lhs.clone(),
            Value::from(1)
        )))
    );
    assert!(result.is_expression());
    assert!(!result.is_constant());
}

#[test]
fn operators_on_fields_keep_keys() {
    let slot = Item::slot("a", 2);
    assert_eq!(slot.plus(&Item::of(3)), Item::slot("a", 5));
    assert_eq!(slot.plus(&Item::of("x")), Item::absent());
    assert_eq!(slot.plus(&Item::slot("b", 1)), Item::absent());
    assert_eq!(Item::attr("a", 2).negative(), Item::attr("a", -2));
    assert_eq!(Item::of(2).times(&Item::of(4)), Item::of(8));
}

#[test]
fn scalar_conversions() {
    assert_eq!(Value::text("42").int_value(), Some(42));
    assert_eq!(Value::text(" 2.5 ").float_value(), Some(2.5));
    assert_eq!(Value::text("x").int_value(), None);
    assert_eq!(Value::text("x").int_value_or(7), 7);
    assert_eq!(Value::Bool(true).long_value(), Some(1));
    assert_eq!(Value::from(0).boolean_value(), Some(false));
    assert_eq!(Value::text("true").boolean_value(), Some(true));
    assert_eq!(Value::text("yes").boolean_value_or(false), false);
    assert_eq!(Value::from(3).string_value(), Some("3".to_string()));
    assert_eq!(Value::from(7u32).uint32_value(), Some(7));
    assert_eq!(Value::from(7u64).uint64_value_or(0), 7);
    assert_eq!(Value::Absent.string_value_or("none"), "none");

    let tagged = Value::Record(Record::of([Item::from(Attr::of("tag")), Item::of("12")]));
    assert_eq!(tagged.int_value(), Some(12));
    assert_eq!(Value::from_vec(vec![1, 2]).int_value(), None);
}

#[test]
fn navigation_of_non_records() {
    let value = Value::from(5);
    assert_eq!(value.length(), 0);
    assert_eq!(value.get("a"), Value::Absent);
    assert_eq!(value.head(), Item::absent());
    assert_eq!(value.tail(), Value::Absent);
    assert_eq!(value.target(), Value::from(5));
    assert_eq!(value.flattened(), Value::from(5));
    assert_eq!(value.unflattened(), Record::of([5]));
    assert_eq!(Value::Absent.unflattened(), Record::new());
    assert_eq!(value.keys().count(), 0);
}

#[test]
fn persistent_updates_of_values() {
    let value = Value::from(5).updated("a", 1);
    assert_eq!(value, Value::Record(Record::of([Item::slot("a", 1)])));
    assert_eq!(value.appended(2).length(), 2);
    assert_eq!(value.prepended(Item::attr("t", 1)).tag(), Some(Text::new("t")));
    assert_eq!(value.removed("a"), Value::empty_record());
    assert_eq!(
        Value::from(1).concat(&Value::from(2)),
        Value::from_vec(vec![1, 2])
    );
    assert_eq!(value.get_slot("a"), Value::from(1));
    assert_eq!(value.updated_attr("b", 2).get_attr("b"), Value::from(2));
}

#[test]
fn display() {
    assert_eq!(Value::from(1).to_string(), "1");
    assert_eq!(Value::text("abc").to_string(), "abc");
    assert_eq!(Value::text("a b").to_string(), "\"a b\"");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::empty_record().to_string(), "{}");
    assert_eq!(Value::from_vec(vec![1, 2]).to_string(), "{1,2}");
    let shape = Value::Record(Record::of([
        Item::attr("shape", "circle"),
        Item::slot("r", 2),
    ]));
    assert_eq!(shape.to_string(), "@shape(circle){r:2}");
    let marker = Value::Record(Record::of([Item::from(Attr::of("marker"))]));
    assert_eq!(marker.to_string(), "@marker");
}

#[test]
fn conversion_from_native_values() {
    assert_eq!(Value::from(()), Value::Extant);
    assert_eq!(Value::from(None::<i32>), Value::Absent);
    assert_eq!(Value::from(Some(1)), Value::from(1));
    assert_eq!(Value::from('c'), Value::text("c"));
    assert_eq!(Value::from(vec!["a", "b"]), Value::from_vec(vec!["a", "b"]));

    assert_eq!(Value::from_any(&true), Ok(Value::Bool(true)));
    assert_eq!(Value::from_any(&"text"), Ok(Value::text("text")));
    assert_eq!(Value::from_any(&vec![1u8, 2]), Ok(Value::data(vec![1u8, 2])));
    assert_eq!(
        Value::from_any(&(Value::text("k"), Value::from(1))),
        Ok(Value::Record(Record::of([Item::slot("k", 1)])))
    );
    assert_eq!(
        Item::from_any(&(Value::text("k"), Value::from(1))),
        Ok(Item::slot("k", 1))
    );

    let mut map = BTreeMap::new();
    map.insert("a".to_string(), Value::from(1));
    map.insert("b".to_string(), Value::from(2));
    assert_eq!(
        Value::from_any(&map),
        Ok(Value::Record(Record::of([Item::slot("a", 1), Item::slot("b", 2)])))
    );

    struct Opaque;
    assert!(matches!(
        Value::from_any(&Opaque),
        Err(ConversionError::Unsupported { .. })
    ));
}

#[test]
fn conversion_to_native_values() {
    assert_eq!(i32::try_from(Value::from(4)), Ok(4));
    assert_eq!(String::try_from(Value::text("a")), Ok("a".to_string()));
    assert_eq!(bool::try_from(Value::Bool(true)), Ok(true));
    assert_eq!(
        Data::try_from(Value::data(vec![1u8])),
        Ok(Data::from(vec![1u8]))
    );
    assert_eq!(
        i64::try_from(Value::text("4")),
        Err(ConversionError::Mismatch {
            expected: "Num",
            found: "Text"
        })
    );
    assert!(Record::try_from(Value::from(1)).is_err());
}

#[cfg(feature = "json")]
#[test]
fn json_conversion() {
    let json = serde_json::json!({"a": [1, 2.5, true, null], "b": "x"});
    let value = Value::from(json.clone());
    assert_eq!(value.get("b"), Value::text("x"));
    assert_eq!(
        value.get("a"),
        Value::from_vec(vec![
            Value::from(1u64),
            Value::from(2.5),
            Value::Bool(true),
            Value::Extant
        ])
    );
    assert_eq!(value.to_json(), json);

    let tagged = Value::Record(Record::of([Item::attr("t", 1), Item::slot("x", 2)]));
    assert_eq!(tagged.to_json(), serde_json::json!({"@t": 1, "x": 2}));
    assert_eq!(Value::data(vec![1u8, 2]).to_json(), serde_json::json!("AQI="));
}
