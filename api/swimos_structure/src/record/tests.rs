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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::StructureError;
use crate::field::{Attr, Field, Slot};
use crate::item::Item;
use crate::record::{Record, RecordState};
use crate::text::Text;
use crate::value::Value;

fn shape() -> Record {
    Record::of([
        Item::from(Attr::new("shape", "circle")),
        Item::slot("r", 2),
        Item::slot("x", 0),
        Item::slot("y", 1),
    ])
}

#[test]
fn positional_and_keyed_access() {
    let record = shape();
    assert_eq!(record.len(), 4);
    assert_eq!(record.field_count(), 4);
    assert_eq!(record.attr_count(), 1);
    assert_eq!(record.value_count(), 0);
    assert!(record.is_object());
    assert!(!record.is_array());

    assert_eq!(record.get("r"), Some(&Value::from(2)));
    assert_eq!(record.get_attr("shape"), Some(&Value::text("circle")));
    assert_eq!(record.get_slot("shape"), None);
    assert_eq!(record.get_attr("r"), None);
    assert_eq!(record.get("z"), None);
    assert_eq!(record.index_of_key(&Value::text("y")), Some(3));
    assert_eq!(record.get_item(1), Some(&Item::slot("r", 2)));
    assert_eq!(record.get_item(4), None);
}

#[test]
fn head_tail_body_and_tag() {
    let record = shape();
    assert_eq!(record.tag(), Some(Text::new("shape")));
    assert_eq!(record.header("shape"), Value::text("circle"));
    assert_eq!(record.header("other"), Value::Absent);
    assert_eq!(record.head(), Item::from(Attr::new("shape", "circle")));
    assert_eq!(record.tail().len(), 3);
    assert_eq!(
        record.body(),
        Value::Record(Record::of([
            Item::slot("r", 2),
            Item::slot("x", 0),
            Item::slot("y", 1)
        ]))
    );

    let marker = Record::of([Item::from(Attr::of("shape")), Item::slot("r", 2)]);
    assert_eq!(marker.header("shape"), Value::Extant);
    assert_eq!(marker.headers("shape"), Some(Record::of([Value::Extant])));
    assert_eq!(marker.body(), Value::Record(Record::of([Item::slot("r", 2)])));
}

#[test]
fn target_and_flattened() {
    let record = Record::of([Item::from(Attr::of("tag")), Item::of(3)]);
    assert_eq!(record.target(), Value::from(3));
    assert_eq!(Record::new().flattened(), Value::Extant);
    assert_eq!(Record::of([Value::from(1)]).flattened(), Value::from(1));
    let pair = Record::of([1, 2]);
    assert_eq!(pair.flattened(), Value::Record(pair.clone()));
}

#[test]
fn duplicate_keys_resolve_to_last() {
    let mut record = Record::of([Item::slot("a", 1), Item::slot("b", 2), Item::slot("a", 3)]);
    assert_eq!(record.get("a"), Some(&Value::from(3)));
    assert_eq!(record.index_of_key(&Value::text("a")), Some(2));

    assert!(record.set("a", 4).is_ok());
    assert_eq!(record.len(), 3);
    assert_eq!(record.get_item(0), Some(&Item::slot("a", 1)));
    assert_eq!(record.get_item(2), Some(&Item::slot("a", 4)));

    assert_eq!(record.delete("a"), Ok(Some(Item::slot("a", 4))));
    assert_eq!(record.get("a"), Some(&Value::from(1)));
    assert_eq!(record.len(), 2);
}

#[test]
fn set_appends_missing_keys() {
    let mut record = Record::new();
    assert!(record.set("a", 1).is_ok());
    assert!(record.set_attr("b", 2).is_ok());
    assert!(record.set(3, "three").is_ok());
    assert_eq!(record.len(), 3);
    assert_eq!(record.get_item(1), Some(&Item::attr("b", 2)));
    assert_eq!(record.get(3), Some(&Value::text("three")));
}

#[test]
fn set_converts_between_field_kinds() {
    let mut record = Record::of([Item::attr("a", 1)]);
    assert!(record.set_slot("a", 2).is_ok());
    assert_eq!(record.get_item(0), Some(&Item::slot("a", 2)));
    assert!(record.set_attr("a", 3).is_ok());
    assert_eq!(record.get_item(0), Some(&Item::attr("a", 3)));
    assert!(record.set("a", 4).is_ok());
    assert_eq!(record.get_item(0), Some(&Item::attr("a", 4)));
}

#[test]
fn positional_updates() {
    let mut record = Record::of([1, 2, 3]);
    assert_eq!(record.set_item(1, Item::slot("k", 5)), Ok(Item::of(2)));
    assert_eq!(record.field_count(), 1);
    assert_eq!(record.get("k"), Some(&Value::from(5)));

    assert!(record.insert(0, Item::slot("j", 0)).is_ok());
    assert_eq!(record.index_of_key(&Value::text("k")), Some(2));
    assert_eq!(record.remove_item(0), Ok(Item::slot("j", 0)));
    assert_eq!(record.get("j"), None);

    assert_eq!(
        record.set_item(7, 1),
        Err(StructureError::IndexOutOfRange {
            index: 7,
            length: 3
        })
    );
    assert_eq!(
        record.insert(4, 1),
        Err(StructureError::IndexOutOfRange {
            index: 4,
            length: 3
        })
    );
}

#[test]
fn splice_replaces_a_range() {
    let mut record = Record::of([1, 2, 3, 4]);
    let removed = record.splice(1, 2, [Item::slot("a", 1)]);
    assert_eq!(removed, Ok(vec![Item::of(2), Item::of(3)]));
    assert_eq!(record, Record::of([Item::of(1), Item::slot("a", 1), Item::of(4)]));
    assert_eq!(record.field_count(), 1);

    let removed = record.splice(3, 10, [Item::of(9)]);
    assert_eq!(removed, Ok(vec![]));
    assert_eq!(record.len(), 4);
    assert_eq!(record.get_item(3), Some(&Item::of(9)));

    let removed = record.splice(2, 10, std::iter::empty::<Item>());
    assert_eq!(removed, Ok(vec![Item::of(4), Item::of(9)]));
    assert_eq!(record.len(), 2);
}

#[test]
fn splice_beyond_the_end_is_out_of_range() {
    let mut record = Record::of([1, 2]);
    assert_eq!(
        record.splice(3, 0, [Item::of(9)]),
        Err(StructureError::IndexOutOfRange {
            index: 3,
            length: 2
        })
    );
    assert_eq!(record, Record::of([1, 2]));

    let mut view = record.sub_record(0, 1).expect("valid bounds");
    assert_eq!(
        view.splice(2, 0, [Item::of(9)]),
        Err(StructureError::IndexOutOfRange {
            index: 2,
            length: 1
        })
    );
    assert_eq!(view.splice(1, 0, [Item::of(9)]), Ok(vec![]));
    assert_eq!(view.len(), 2);
}

#[test]
fn retain_and_clear() {
    let mut record = shape();
    assert!(record.retain(|item| !item.is_attr()).is_ok());
    assert_eq!(record.len(), 3);
    assert_eq!(record.tag(), None);
    assert_eq!(record.get("x"), Some(&Value::from(0)));
    assert!(record.clear().is_ok());
    assert!(record.is_empty());
    assert_eq!(record.get("x"), None);
}

#[test]
fn copy_on_write_isolation() {
    let mut original = shape();
    let mut copy = original.clone();
    assert_eq!(original.state(), RecordState::Shared);
    assert_eq!(copy.state(), RecordState::Shared);

    assert!(copy.set("r", 10).is_ok());
    assert_eq!(original.get("r"), Some(&Value::from(2)));
    assert_eq!(copy.get("r"), Some(&Value::from(10)));
    assert_eq!(copy.state(), RecordState::Exclusive);

    assert!(original.push(Item::slot("z", 3)).is_ok());
    assert_eq!(original.len(), 5);
    assert_eq!(copy.len(), 4);
    assert_eq!(copy.get("z"), None);
}

#[test]
fn commit_is_enforced() {
    let mut record = shape();
    record.commit();
    assert_eq!(record.state(), RecordState::Frozen);
    assert!(!record.is_mutable());

    assert_eq!(record.push(1), Err(StructureError::Immutable));
    assert_eq!(record.set("r", 3), Err(StructureError::Immutable));
    assert_eq!(record.set_item(0, 1), Err(StructureError::Immutable));
    assert_eq!(record.insert(0, 1), Err(StructureError::Immutable));
    assert_eq!(record.delete("r"), Err(StructureError::Immutable));
    assert_eq!(record.remove_item(0), Err(StructureError::Immutable));
    assert_eq!(record.clear(), Err(StructureError::Immutable));
    assert_eq!(record.get("r"), Some(&Value::from(2)));

    let clone = record.clone();
    assert!(!clone.is_mutable());
}

#[test]
fn commit_is_deep() {
    let inner = Record::of([Item::slot("b", 1)]);
    let mut outer = Record::of([Item::slot("a", Value::Record(inner))]);
    outer.commit();
    match outer.get_item(0) {
        Some(Item::Field(field)) => {
            assert!(!field.is_mutable());
            match field.value() {
                Value::Record(inner) => assert!(!inner.is_mutable()),
                other => panic!("Unexpected value: {:?}", other),
            }
        }
        other => panic!("Unexpected item: {:?}", other),
    }
}

#[test]
fn branch_of_committed_record() {
    let mut record = shape();
    record.commit();
    let mut branch = record.branch();
    assert!(branch.is_mutable());
    assert!(branch.set("r", 5).is_ok());
    assert!(branch.push(Item::slot("z", 1)).is_ok());
    assert_eq!(branch.get("r"), Some(&Value::from(5)));
    assert_eq!(record.get("r"), Some(&Value::from(2)));
    assert_eq!(record.len(), 4);
}

#[test]
fn immutable_field_cannot_be_set_directly() {
    let mut slot = Slot::new("a", 1);
    slot.commit();
    assert_eq!(slot.set_value(2), Err(StructureError::Immutable));
    let updated = slot.updated_value(2);
    assert!(updated.is_mutable());
    assert_eq!(updated.value(), &Value::from(2));
}

#[test]
fn persistent_updates_leave_original() {
    let mut record = shape();
    record.commit();
    let updated = record.updated("r", 5);
    let appended = record.appended(7);
    let prepended = record.prepended(Item::attr("first", 0));
    let removed = record.removed("x");

    assert_eq!(updated.get("r"), Some(&Value::from(5)));
    assert!(updated.is_mutable());
    assert_eq!(appended.len(), 5);
    assert_eq!(prepended.tag(), Some(Text::new("first")));
    assert_eq!(removed.get("x"), None);
    assert_eq!(removed.len(), 3);
    assert_eq!(record, shape());

    let attr = record.updated_attr("r", 1);
    assert_eq!(attr.get_attr("r"), Some(&Value::from(1)));
    let slot = attr.updated_slot("r", 2);
    assert_eq!(slot.get_slot("r"), Some(&Value::from(2)));
    assert_eq!(
        Record::of([1]).concat(&Record::of([2])),
        Record::of([1, 2])
    );
}

#[test]
fn index_survives_random_mutation() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut record = Record::new();
    let mut model: Vec<(i32, i32)> = vec![];

    for i in 0..2000 {
        let key = rng.gen_range(0..40);
        match rng.gen_range(0..4) {
            0 | 1 => {
                assert!(record.push(Item::slot(key, i)).is_ok());
                model.push((key, i));
            }
            2 => {
                assert!(record.set(key, i).is_ok());
                match model.iter_mut().rev().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = i,
                    None => model.push((key, i)),
                }
            }
            _ => {
                let deleted = record.delete(key);
                match model.iter().rposition(|(k, _)| *k == key) {
                    Some(pos) => {
                        let (k, v) = model.remove(pos);
                        assert_eq!(deleted, Ok(Some(Item::slot(k, v))));
                    }
                    None => assert_eq!(deleted, Ok(None)),
                }
            }
        }

        if i % 50 == 0 {
            let copy = record.clone();
            assert_eq!(copy, record);
        }
    }

    assert_eq!(record.len(), model.len());
    for key in 0..40 {
        let expected = model
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| Value::from(*v));
        assert_eq!(record.get(key).cloned(), expected);
    }
}

#[test]
fn sub_record_views() {
    let mut record = Record::of([
        Item::of(0),
        Item::slot("a", 1),
        Item::slot("b", 2),
        Item::slot("a", 3),
        Item::of(4),
    ]);
    {
        let mut view = record.sub_record(1, 3).expect("Valid bounds.");
        assert_eq!(view.len(), 2);
        assert_eq!(view.get("a"), Some(&Value::from(1)));
        assert!(!view.contains_key(4));
        assert!(view.push(Item::slot("c", 5)).is_ok());
        assert_eq!(view.bounds(), (1, 4));
        assert!(view.set("b", 20).is_ok());
        assert_eq!(view.delete("a"), Ok(Some(Item::slot("a", 1))));
        assert_eq!(view.bounds(), (1, 3));
        assert_eq!(
            view.to_record(),
            Record::of([Item::slot("b", 20), Item::slot("c", 5)])
        );
    }
    assert_eq!(
        record,
        Record::of([
            Item::of(0),
            Item::slot("b", 20),
            Item::slot("c", 5),
            Item::slot("a", 3),
            Item::of(4),
        ])
    );
    assert_eq!(record.get("a"), Some(&Value::from(3)));
    assert!(record.sub_record(3, 9).is_err());
    assert!(record.sub_record(3, 2).is_err());
}

#[test]
fn views_respect_commit() {
    let mut record = Record::of([1, 2, 3]);
    record.commit();
    let mut view = record.sub_record(0, 2).expect("Valid bounds.");
    assert!(!view.is_mutable());
    assert_eq!(view.push(4), Err(StructureError::Immutable));
    assert_eq!(view.bounds(), (0, 2));
}

#[test]
fn field_display() {
    assert_eq!(Field::Attr(Attr::of("a")).to_string(), "@a");
    assert_eq!(Field::Attr(Attr::new("a", 1)).to_string(), "@a(1)");
    assert_eq!(Field::Slot(Slot::new("a", 1)).to_string(), "a:1");
    assert_eq!(Field::Slot(Slot::of("a")).to_string(), "a:");
}

#[test]
fn into_items_and_iteration() {
    let record = shape();
    let keys: Vec<Value> = record.iter().map(Item::key).collect();
    assert_eq!(
        keys,
        vec![
            Value::text("shape"),
            Value::text("r"),
            Value::text("x"),
            Value::text("y")
        ]
    );
    let items = record.clone().into_items();
    assert_eq!(items.len(), 4);
    assert_eq!(Record::from(items), record);
}
