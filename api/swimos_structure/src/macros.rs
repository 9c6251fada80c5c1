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

/// Creates a value from the provided items.
///
/// ```
/// use swimos_structure::{value, Value};
///
/// assert_eq!(value!(), Value::Extant);
/// assert_eq!(value!(1), Value::from(1));
/// assert_eq!(value!(1, 2, 3), Value::from_vec(vec![1, 2, 3]));
/// ```
///
/// For multiple values the `record!` macro is used and the same syntax applies.
#[macro_export]
macro_rules! value {
    () => {
        $crate::Value::Extant
    };
    (items => [$($items:expr),+ $(,)?]) => (
        $crate::record!(items => [$($items),*])
    );
    (attrs => [$($attrs:expr),+ $(,)?]) => (
        $crate::record!(attrs => [$($attrs),*])
    );
    (attrs => [$($attrs:expr),+ $(,)?], items => [$($items:expr),+ $(,)?]) => (
        $crate::record!(attrs => [$($attrs),*], items => [$($items),*])
    );
    ($x:expr) => {
        $crate::Value::from($x)
    };
    ($($items:expr),+ $(,)?) => (
        $crate::record!($($items),*)
    );
}

/// Creates a record value from the provided items. Tuples become slots in the body and
/// attributes may be given either as tuples or as bare keys.
///
/// ```
/// use swimos_structure::{record, Attr, Item, Record, Value};
///
/// assert_eq!(record!(), Value::empty_record());
///
/// let value = record! {
///     attrs => [("shape", "circle"), "visible"],
///     items => [("r", 2), 7]
/// };
/// assert_eq!(value, Value::Record(Record::of([
///     Item::from(Attr::from(("shape", "circle"))),
///     Item::from(Attr::of("visible")),
///     Item::slot("r", 2),
///     Item::of(7),
/// ])));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Value::empty_record()
    };
    (items => [$($items:expr),+ $(,)?]) => (
        $crate::Value::Record($crate::Record::of([$($crate::Item::from($items)),+]))
    );
    (attrs => [$($attrs:expr),+ $(,)?]) => (
        $crate::Value::Record($crate::Record::of([$($crate::Item::from($crate::Attr::from($attrs))),+]))
    );
    (attrs => [$($attrs:expr),+ $(,)?], items => [$($items:expr),+ $(,)?]) => (
        $crate::Value::Record($crate::Record::of([
            $($crate::Item::from($crate::Attr::from($attrs)),)+
            $($crate::Item::from($items)),+
        ]))
    );
    ($($items:expr),+ $(,)?) => (
        $crate::Value::Record($crate::Record::of([$($crate::Item::from($items)),+]))
    );
}

#[cfg(test)]
mod tests {
    use crate::{Attr, Item, Record, Value};

    #[test]
    fn extant_value() {
        assert_eq!(value!(), Value::Extant);
    }

    #[test]
    fn scalar_value() {
        assert_eq!(value!(100i32), Value::from(100));
        assert_eq!(value!("hello"), Value::text("hello"));
    }

    #[test]
    fn record_of_values() {
        let expected = Value::from_vec(vec![100, 200, 300]);
        assert_eq!(value!(100, 200, 300), expected);
        assert_eq!(record!(100, 200, 300), expected);
        assert_eq!(record!(items => [100, 200, 300]), expected);
    }

    #[test]
    fn record_with_attrs() {
        let expected = Value::Record(Record::of([
            Item::from(Attr::from(("hello", 200))),
            Item::from(Attr::of("a")),
            Item::of(100i64),
            Item::of(Value::Extant),
        ]));
        assert_eq!(
            value! {
                attrs => [("hello", 200), "a"],
                items => [100i64, Value::Extant]
            },
            expected
        );
        assert_eq!(
            record! {
                attrs => [("hello", 200), "a"],
                items => [100i64, Value::Extant]
            },
            expected
        );
    }

    #[test]
    fn record_of_slots() {
        let value = record!(("a", 1), ("b", 2));
        assert_eq!(value.get("a"), Value::from(1));
        assert_eq!(value.get("b"), Value::from(2));
        assert_eq!(value.length(), 2);
    }

    #[test]
    fn attrs_only() {
        let value = record!(attrs => ["tag"]);
        assert_eq!(value.tag(), Some(crate::Text::new("tag")));
    }
}
