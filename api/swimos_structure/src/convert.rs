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

//! Conversions between native values and structural values.

use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;

use crate::data::Data;
use crate::error::ConversionError;
use crate::field::{Field, Slot};
use crate::item::Item;
use crate::num::Num;
use crate::record::Record;
use crate::text::Text;
use crate::value::Value;

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! value_from_num {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Num(Num::from(n))
                }
            }
        )*
    };
}

value_from_num!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, isize, usize);

impl From<Num> for Value {
    fn from(n: Num) -> Self {
        Value::Num(n)
    }
}

impl From<Text> for Value {
    fn from(text: Text) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(Text::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Text::from(s))
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(Text::from(s))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Text(Text::from(c))
    }
}

impl From<Data> for Value {
    fn from(data: Data) -> Self {
        Value::Data(data)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Data(Data::from(bytes))
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Extant
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Absent)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Record(values.into_iter().map(|v| Item::ValueItem(v.into())).collect())
    }
}

fn mismatch(expected: &'static str, found: &Value) -> ConversionError {
    ConversionError::Mismatch {
        expected,
        found: found.kind().name(),
    }
}

macro_rules! try_from_value {
    ($t:ty, $expected:literal, $pat:pat => $out:expr) => {
        impl TryFrom<Value> for $t {
            type Error = ConversionError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    $pat => Ok($out),
                    other => Err(mismatch($expected, &other)),
                }
            }
        }
    };
}

try_from_value!(bool, "Bool", Value::Bool(b) => b);
try_from_value!(Num, "Num", Value::Num(n) => n);
try_from_value!(f64, "Num", Value::Num(n) => n.value());
try_from_value!(i32, "Num", Value::Num(n) => n.int_value());
try_from_value!(i64, "Num", Value::Num(n) => n.long_value());
try_from_value!(u32, "Num", Value::Num(n) => n.uint32_value());
try_from_value!(u64, "Num", Value::Num(n) => n.uint64_value());
try_from_value!(Text, "Text", Value::Text(t) => t);
try_from_value!(String, "Text", Value::Text(t) => t.to_string());
try_from_value!(Data, "Data", Value::Data(d) => d);
try_from_value!(Record, "Record", Value::Record(r) => r);

fn record_of_slots<'a, I>(entries: I) -> Value
where
    I: Iterator<Item = (&'a String, &'a Value)>,
{
    Value::Record(
        entries
            .map(|(k, v)| Item::Field(Field::Slot(Slot::new(k.as_str(), v.clone()))))
            .collect(),
    )
}

impl Value {
    /// Convert a native value into a structural value. Structural values are returned as they
    /// are (a field becomes a record containing it) and `(key, value)` pairs, vectors, maps with
    /// string keys, byte buffers, strings, numbers, booleans, `()` and optional values are
    /// converted. Anything else is rejected.
    ///
    /// ```
    /// use swimos_structure::{ConversionError, Value};
    ///
    /// assert_eq!(Value::from_any(&3u32), Ok(Value::from(3u32)));
    /// assert_eq!(Value::from_any(&Some(Value::from("a"))), Ok(Value::text("a")));
    /// assert!(matches!(
    ///     Value::from_any(&std::time::Duration::ZERO),
    ///     Err(ConversionError::Unsupported { .. })
    /// ));
    /// ```
    pub fn from_any<T: Any>(value: &T) -> Result<Value, ConversionError> {
        let any: &dyn Any = value;
        match Item::from_dyn(any) {
            Some(Item::Field(field)) => Ok(Value::Record(Record::of([field]))),
            Some(Item::ValueItem(value)) => Ok(value),
            None => Err(ConversionError::Unsupported {
                type_name: type_name::<T>(),
            }),
        }
    }
}

impl Item {
    /// As [`Value::from_any`] except that fields and `(key, value)` pairs become fields.
    pub fn from_any<T: Any>(value: &T) -> Result<Item, ConversionError> {
        Item::from_dyn(value).ok_or(ConversionError::Unsupported {
            type_name: type_name::<T>(),
        })
    }

    /// Builds an item from a type-erased native value, if its type has a structural
    /// representation.
    pub fn from_dyn(any: &dyn Any) -> Option<Item> {
        macro_rules! downcast {
            ($($t:ty),*) => {
                $(
                    if let Some(v) = any.downcast_ref::<$t>() {
                        return Some(Item::from(v.clone()));
                    }
                )*
            };
        }

        if let Some(item) = any.downcast_ref::<Item>() {
            return Some(item.clone());
        }
        if let Some(field) = any.downcast_ref::<Field>() {
            return Some(Item::Field(field.clone()));
        }
        downcast!(
            Value, Record, Text, Num, Data, String, &'static str, char, bool, (), i8, i16, i32,
            i64, u8, u16, u32, u64, f32, f64, isize, usize, Bytes, Option<Value>, Vec<Value>
        );
        if let Some((key, value)) = any.downcast_ref::<(Value, Value)>() {
            return Some(Item::slot(key.clone(), value.clone()));
        }
        if let Some(items) = any.downcast_ref::<Vec<Item>>() {
            return Some(Item::from(Record::of(items.iter().cloned())));
        }
        if let Some(bytes) = any.downcast_ref::<Vec<u8>>() {
            return Some(Item::from(Data::from(bytes.clone())));
        }
        if let Some(map) = any.downcast_ref::<BTreeMap<String, Value>>() {
            return Some(Item::from(record_of_slots(map.iter())));
        }
        if let Some(map) = any.downcast_ref::<HashMap<String, Value>>() {
            return Some(Item::from(record_of_slots(map.iter())));
        }
        None
    }
}

#[cfg(feature = "json")]
mod json {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::{Map, Number};

    use crate::field::Field;
    use crate::item::Item;
    use crate::num::{Num, NumKind};
    use crate::record::Record;
    use crate::value::Value;

    impl From<serde_json::Value> for Value {
        fn from(json: serde_json::Value) -> Self {
            match json {
                serde_json::Value::Null => Value::Extant,
                serde_json::Value::Bool(b) => Value::Bool(b),
                serde_json::Value::Number(n) => match n.as_u64() {
                    Some(n) => Value::Num(Num::from(n)),
                    None => Value::Num(Num::new(n.as_f64().unwrap_or(f64::NAN))),
                },
                serde_json::Value::String(s) => Value::from(s),
                serde_json::Value::Array(values) => {
                    Value::Record(values.into_iter().map(Value::from).collect())
                }
                serde_json::Value::Object(entries) => Value::Record(
                    entries
                        .into_iter()
                        .map(|(k, v)| Item::slot(k, Value::from(v)))
                        .collect(),
                ),
            }
        }
    }

    fn num_to_json(num: &Num) -> serde_json::Value {
        match num.kind() {
            NumKind::UInt32 | NumKind::UInt64 => serde_json::Value::from(num.uint64_value()),
            NumKind::Float if num.is_integral() && num.value().abs() < 9.007_199_254_740_992e15 => {
                serde_json::Value::from(num.long_value())
            }
            NumKind::Float => Number::from_f64(num.value())
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }

    fn record_to_json(record: &Record) -> serde_json::Value {
        if !record.is_empty() && record.is_object() {
            let mut map = Map::new();
            for item in record {
                if let Item::Field(field) = item {
                    let key = match field {
                        Field::Attr(attr) => format!("@{}", attr.key()),
                        Field::Slot(slot) => match slot.key() {
                            Value::Text(text) => text.to_string(),
                            key => key.to_string(),
                        },
                    };
                    map.insert(key, field.value().to_json());
                }
            }
            serde_json::Value::Object(map)
        } else {
            serde_json::Value::Array(
                record
                    .iter()
                    .map(|item| match item {
                        Item::Field(_) => record_to_json(&Record::of([item.clone()])),
                        Item::ValueItem(value) => value.to_json(),
                    })
                    .collect(),
            )
        }
    }

    impl Value {
        /// Render the value as JSON. Records of fields become objects (attribute keys are
        /// prefixed with `@`), other records become arrays and data is encoded in base-64.
        pub fn to_json(&self) -> serde_json::Value {
            match self {
                Value::Absent | Value::Extant | Value::Func(_) => serde_json::Value::Null,
                Value::Bool(b) => serde_json::Value::Bool(*b),
                Value::Num(num) => num_to_json(num),
                Value::Text(text) => serde_json::Value::String(text.to_string()),
                Value::Data(data) => serde_json::Value::String(STANDARD.encode(data.as_bytes())),
                Value::Record(record) => record_to_json(record),
                Value::Expression(expr) => serde_json::Value::String(expr.to_string()),
            }
        }
    }
}
