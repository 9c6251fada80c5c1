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

use std::fmt::{Display, Formatter};

use crate::field::{Attr, Field, Slot};
use crate::text::Text;
use crate::value::Value;

/// A member of a record: either a keyed [`Field`] or a bare [`Value`].
#[derive(Clone, Debug)]
pub enum Item {
    Field(Field),
    ValueItem(Value),
}

impl Item {
    /// Create an [`Item`] from anything that can be converted to one.
    ///
    /// ```
    /// use swimos_structure::{Item, Slot, Value};
    ///
    /// assert_eq!(Item::of("name"), Item::ValueItem(Value::text("name")));
    /// assert_eq!(Item::of(("key", 1)), Item::from(Slot::new("key", 1)));
    /// ```
    pub fn of<I: Into<Item>>(item: I) -> Item {
        item.into()
    }

    pub fn absent() -> Item {
        Item::ValueItem(Value::Absent)
    }

    pub fn extant() -> Item {
        Item::ValueItem(Value::Extant)
    }

    pub fn attr(key: impl Into<Text>, value: impl Into<Value>) -> Item {
        Item::Field(Field::Attr(Attr::new(key, value)))
    }

    pub fn slot(key: impl Into<Value>, value: impl Into<Value>) -> Item {
        Item::Field(Field::Slot(Slot::new(key, value)))
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Item::Field(_))
    }

    pub fn is_attr(&self) -> bool {
        matches!(self, Item::Field(Field::Attr(_)))
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, Item::Field(Field::Slot(_)))
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Item::Field(field) => Some(field),
            Item::ValueItem(_) => None,
        }
    }

    /// The key of a field, or [`Value::Absent`] for a bare value.
    pub fn key(&self) -> Value {
        match self {
            Item::Field(field) => field.key(),
            Item::ValueItem(_) => Value::Absent,
        }
    }

    /// The value of a field, or the item itself for a bare value.
    pub fn value(&self) -> &Value {
        match self {
            Item::Field(field) => field.value(),
            Item::ValueItem(value) => value,
        }
    }

    pub fn to_value(&self) -> Value {
        self.value().clone()
    }

    pub fn into_value(self) -> Value {
        match self {
            Item::Field(field) => field.into_value(),
            Item::ValueItem(value) => value,
        }
    }

    /// Anything other than [`Value::Absent`]. A field is defined iff its value is defined.
    pub fn is_defined(&self) -> bool {
        self.value().is_defined()
    }

    /// Neither [`Value::Absent`] nor [`Value::Extant`].
    pub fn is_distinct(&self) -> bool {
        self.value().is_distinct()
    }

    /// Whether the item counts as "true" for the logical operators.
    pub fn is_definite(&self) -> bool {
        match self {
            Item::Field(field) => field.value().is_definite(),
            Item::ValueItem(value) => value.is_definite(),
        }
    }

    pub fn is_mutable(&self) -> bool {
        match self {
            Item::Field(field) => field.is_mutable(),
            Item::ValueItem(value) => value.is_mutable(),
        }
    }

    /// Make the item permanently immutable (recursively).
    pub fn commit(&mut self) {
        match self {
            Item::Field(field) => field.commit(),
            Item::ValueItem(value) => value.commit(),
        }
    }

    /// Rebuild the item, keeping the key of a field, with a new value. An undefined value
    /// collapses a field to [`Value::Absent`].
    pub(crate) fn with_value(&self, value: Value) -> Item {
        match self {
            Item::Field(_) if !value.is_defined() => Item::absent(),
            Item::Field(field) => Item::Field(field.updated_value(value)),
            Item::ValueItem(_) => Item::ValueItem(value),
        }
    }
}

impl Default for Item {
    fn default() -> Self {
        Item::absent()
    }
}

impl<V: Into<Value>> From<V> for Item {
    fn from(value: V) -> Self {
        Item::ValueItem(value.into())
    }
}

impl From<Field> for Item {
    fn from(field: Field) -> Self {
        Item::Field(field)
    }
}

impl From<Attr> for Item {
    fn from(attr: Attr) -> Self {
        Item::Field(Field::Attr(attr))
    }
}

impl From<Slot> for Item {
    fn from(slot: Slot) -> Self {
        Item::Field(Field::Slot(slot))
    }
}

impl<K: Into<Value>, V: Into<Value>> From<(K, V)> for Item {
    fn from(pair: (K, V)) -> Self {
        let (key, value) = pair;
        Item::slot(key, value)
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Item::Field(field) => Display::fmt(field, f),
            Item::ValueItem(value) => Display::fmt(value, f),
        }
    }
}
