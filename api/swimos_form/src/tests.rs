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


use std::any::Any;
use std::time::Duration;

use swimos_structure::{record, Attr, Item, Num, Record, Value};

use crate::{
    AnyForm, BoolForm, Cast, F64Form, Form, FormError, I32Form, I64Form, ItemForm, NumForm,
    StringForm, U64Form, ValueForm,
};

#[derive(Clone, Debug, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

struct PointForm;

impl Form for PointForm {
    type Target = Point;

    fn name(&self) -> &'static str {
        "Point"
    }

    fn mold(&self, object: &Point) -> Item {
        Item::ValueItem(record!(("x", object.x), ("y", object.y)))
    }

    fn cast(&self, item: &Item) -> Option<Point> {
        let value = item.value();
        Some(Point {
            x: value.get("x").long_value()?,
            y: value.get("y").long_value()?,
        })
    }
}

#[test]
fn string_form() {
    let item = StringForm.mold(&"hello".to_string());
    assert_eq!(item, Item::of("hello"));
    assert_eq!(StringForm.cast(&item), Some("hello".to_string()));
    assert_eq!(StringForm.cast(&Item::of(12)), Some("12".to_string()));
    assert_eq!(StringForm.cast(&Item::of(true)), Some("true".to_string()));
    assert_eq!(StringForm.cast(&Item::absent()), None);
}

#[test]
fn numeric_forms() {
    assert_eq!(NumForm.mold(&Num::from(3)), Item::of(3));
    assert_eq!(NumForm.cast(&Item::of("2.5")), Some(Num::from(2.5)));
    assert_eq!(I32Form.cast(&Item::of(7.9)), Some(7));
    assert_eq!(I64Form.cast(&Item::of(-4)), Some(-4));
    assert_eq!(U64Form.cast(&Item::of(10u64)), Some(10));
    assert_eq!(F64Form.cast(&Item::of(true)), Some(1.0));
    assert_eq!(I32Form.cast(&Item::of("seven")), None);
}

#[test]
fn bool_form() {
    assert_eq!(BoolForm.mold(&false), Item::of(false));
    assert_eq!(BoolForm.cast(&Item::of("true")), Some(true));
    assert_eq!(BoolForm.cast(&Item::of(0)), Some(false));
    assert_eq!(BoolForm.cast(&Item::of("yes")), None);
}

#[test]
fn fields_cast_through_their_values() {
    let slot = Item::slot("a", 5);
    assert_eq!(I32Form.cast(&slot), Some(5));
    assert_eq!(ValueForm.cast(&slot), Some(Value::from(5)));
    assert_eq!(ItemForm.cast(&slot), Some(slot.clone()));
}

#[test]
fn records_cast_through_their_targets() {
    let value = record!(attrs => ["units"], items => [12]);
    assert_eq!(value.cast(&I32Form), Some(12));
    assert_eq!(record!(("a", 1), ("b", 2)).cast(&I32Form), None);
}

#[test]
fn value_and_item_forms_reject_absent() {
    assert_eq!(ValueForm.cast(&Item::absent()), None);
    assert_eq!(ItemForm.cast(&Item::absent()), None);
    assert_eq!(ValueForm.cast(&Item::extant()), Some(Value::Extant));
    let value = record!(1, 2);
    assert_eq!(ValueForm.mold(&value), Item::ValueItem(value));
}

#[test]
fn try_cast_reports_incorrect_type() {
    let result = Value::text("abc").try_cast(&NumForm);
    assert_eq!(
        result,
        Err(FormError::IncorrectType {
            expected: "Num",
            found: "Text",
        })
    );
    assert_eq!(
        I64Form.try_cast(&Item::absent()),
        Err(FormError::IncorrectType {
            expected: "i64",
            found: "Absent",
        })
    );
}

#[test]
fn custom_form() {
    let point = Point { x: 1, y: -2 };
    let item = PointForm.mold(&point);
    assert_eq!(item.value().get("y"), Value::from(-2i64));
    assert_eq!(PointForm.cast(&item), Some(point));
    assert_eq!(PointForm.cast(&Item::of(4)), None);
}

#[test]
fn tagged_form_mold() {
    let form = PointForm.tagged("point");
    assert_eq!(form.tag(), Some("point"));
    let item = form.mold(&Point { x: 3, y: 4 });
    let expected = record! {
        attrs => ["point"],
        items => [("x", 3i64), ("y", 4i64)]
    };
    assert_eq!(item, Item::ValueItem(expected));
}

#[test]
fn tagged_form_round_trip() {
    let form = PointForm.tagged("point");
    let point = Point { x: 10, y: 20 };
    let item = form.mold(&point);
    assert_eq!(form.cast(&item), Some(point));
}

#[test]
fn tagged_scalar_and_extant() {
    let form = I32Form.tagged("count");
    let item = form.mold(&5);
    assert_eq!(
        item,
        Item::ValueItem(Value::Record(Record::of([
            Item::from(Attr::of("count")),
            Item::of(5)
        ])))
    );
    assert_eq!(form.cast(&item), Some(5));

    let marker = ValueForm.tagged("marker");
    let item = marker.mold(&Value::Extant);
    assert_eq!(item, Item::ValueItem(record!(attrs => ["marker"])));
    assert_eq!(marker.cast(&item), Some(Value::Extant));
}

#[test]
fn tagged_form_rejects_other_tags() {
    let form = PointForm.tagged("point");
    let other = record! {
        attrs => ["vector"],
        items => [("x", 1), ("y", 2)]
    };
    let expected = Err(FormError::MismatchedTag {
        expected: "point".to_string(),
    });
    assert_eq!(other.try_cast(&form), expected);
    assert_eq!(record!(("x", 1), ("y", 2)).try_cast(&form), expected);
    assert_eq!(form.cast(&Item::of(1)), None);
}

#[test]
fn tagged_form_with_malformed_body() {
    let form = PointForm.tagged("point");
    let value = record! {
        attrs => ["point"],
        items => [("x", 1)]
    };
    assert_eq!(
        value.try_cast(&form),
        Err(FormError::IncorrectType {
            expected: "Point",
            found: "Record",
        })
    );
}

#[test]
fn unit_form() {
    let form = StringForm.with_unit("none".to_string());
    assert_eq!(form.unit(), Some("none".to_string()));
    assert_eq!(StringForm.unit(), None);
    assert_eq!(form.cast(&Item::absent()), Some("none".to_string()));
    assert_eq!(form.cast(&Item::extant()), Some("none".to_string()));
    assert_eq!(form.cast(&Item::of(3)), Some("3".to_string()));
    assert_eq!(form.try_cast(&Item::absent()), Ok("none".to_string()));
    assert_eq!(form.mold(&"a".to_string()), Item::of("a"));
}

#[test]
fn unit_form_does_not_mask_bad_values() {
    let form = I32Form.with_unit(0);
    assert_eq!(form.cast(&Item::of("many")), None);
    assert!(matches!(
        form.try_cast(&Item::of("many")),
        Err(FormError::IncorrectType { .. })
    ));
}

#[test]
fn combined_tag_and_unit() {
    let form = I64Form.with_unit(-1).tagged("level");
    let item = Item::ValueItem(record!(attrs => ["level"]));
    assert_eq!(form.cast(&item), Some(-1));
    assert_eq!(form.unit(), Some(-1));
}

#[test]
fn forms_by_reference() {
    fn cast_all<F: Form>(form: F, items: &[Item]) -> Vec<Option<F::Target>> {
        items.iter().map(|item| form.cast(item)).collect()
    }
    let form = I32Form;
    let items = [Item::of(1), Item::of("x"), Item::of(3)];
    assert_eq!(cast_all(&form, &items), vec![Some(1), None, Some(3)]);
}

#[test]
fn any_form() {
    let boxed: Box<dyn Any> = Box::new(5i32);
    assert_eq!(AnyForm.mold(&boxed), Item::of(5));

    let bytes: Box<dyn Any> = Box::new(vec![1u8, 2, 3]);
    assert_eq!(AnyForm.mold(&bytes), Item::of(Value::data(vec![1u8, 2, 3])));

    let unsupported: Box<dyn Any> = Box::new(Duration::from_secs(1));
    assert_eq!(AnyForm.mold(&unsupported), Item::absent());

    let cast = AnyForm.cast(&Item::of("hi"));
    let value = cast.and_then(|boxed| boxed.downcast::<Value>().ok());
    assert_eq!(value.as_deref(), Some(&Value::text("hi")));
    assert!(AnyForm.cast(&Item::absent()).is_none());
}

#[cfg(feature = "json")]
#[test]
fn json_form() {
    use crate::JsonForm;
    use serde_json::json;

    let document = json!({"name": "swim", "tags": [1, 2]});
    let item = JsonForm.mold(&document);
    assert_eq!(item.value().get("name"), Value::text("swim"));
    assert_eq!(JsonForm.cast(&item), Some(document));
    assert_eq!(JsonForm.cast(&Item::absent()), None);
}
