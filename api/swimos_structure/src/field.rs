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

use crate::error::StructureError;
use crate::text::Text;
use crate::value::Value;

/// Lifecycle of a field. A committed field can no longer have its value replaced in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Mutable,
    Immutable,
}

/// An attribute: a field with a textual key. Attributes that occur at the start of a record form
/// its header and the key of the first attribute is the tag of the record.
#[derive(Clone, Debug)]
pub struct Attr {
    key: Text,
    value: Value,
    state: FieldState,
}

/// A slot: a field that may have any value as its key.
#[derive(Clone, Debug)]
pub struct Slot {
    key: Value,
    value: Value,
    state: FieldState,
}

/// A key/value member of a record.
#[derive(Clone, Debug)]
pub enum Field {
    Attr(Attr),
    Slot(Slot),
}

impl Attr {
    pub fn new(key: impl Into<Text>, value: impl Into<Value>) -> Self {
        Attr {
            key: key.into(),
            value: value.into(),
            state: FieldState::Mutable,
        }
    }

    /// An attribute with an [`Value::Extant`] value.
    pub fn of(key: impl Into<Text>) -> Self {
        Attr::new(key, Value::Extant)
    }

    pub fn key(&self) -> &Text {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn into_parts(self) -> (Text, Value) {
        (self.key, self.value)
    }

    pub fn is_mutable(&self) -> bool {
        self.state == FieldState::Mutable
    }

    /// Replace the value in place, returning the previous value.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<Value, StructureError> {
        if self.is_mutable() {
            Ok(std::mem::replace(&mut self.value, value.into()))
        } else {
            Err(StructureError::Immutable)
        }
    }

    /// A new (mutable) attribute with the same key and a different value.
    pub fn updated_value(&self, value: impl Into<Value>) -> Attr {
        Attr::new(self.key.clone(), value)
    }

    /// Make the attribute (and its value) permanently immutable.
    pub fn commit(&mut self) {
        self.state = FieldState::Immutable;
        self.value.commit();
    }
}

impl Slot {
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Slot {
            key: key.into(),
            value: value.into(),
            state: FieldState::Mutable,
        }
    }

    /// A slot with an [`Value::Extant`] value.
    pub fn of(key: impl Into<Value>) -> Self {
        Slot::new(key, Value::Extant)
    }

    pub fn key(&self) -> &Value {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn into_parts(self) -> (Value, Value) {
        (self.key, self.value)
    }

    pub fn is_mutable(&self) -> bool {
        self.state == FieldState::Mutable
    }

    /// Replace the value in place, returning the previous value.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<Value, StructureError> {
        if self.is_mutable() {
            Ok(std::mem::replace(&mut self.value, value.into()))
        } else {
            Err(StructureError::Immutable)
        }
    }

    /// A new (mutable) slot with the same key and a different value.
    pub fn updated_value(&self, value: impl Into<Value>) -> Slot {
        Slot::new(self.key.clone(), value)
    }

    /// Make the slot (and its key and value) permanently immutable.
    pub fn commit(&mut self) {
        self.state = FieldState::Immutable;
        self.key.commit();
        self.value.commit();
    }
}

impl Field {
    pub fn key(&self) -> Value {
        match self {
            Field::Attr(attr) => Value::Text(attr.key.clone()),
            Field::Slot(slot) => slot.key.clone(),
        }
    }

    /// Whether the key of this field is equal to `key` (without cloning the key).
    pub fn key_matches(&self, key: &Value) -> bool {
        match (self, key) {
            (Field::Attr(attr), Value::Text(text)) => &attr.key == text,
            (Field::Attr(_), _) => false,
            (Field::Slot(slot), key) => &slot.key == key,
        }
    }

    /// The hash code of the key; consistent with [`Value::hash_code`] on the key.
    pub fn key_hash(&self) -> u32 {
        match self {
            Field::Attr(attr) => attr.key.hash_code(),
            Field::Slot(slot) => slot.key.hash_code(),
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Field::Attr(attr) => &attr.value,
            Field::Slot(slot) => &slot.value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Field::Attr(attr) => attr.value,
            Field::Slot(slot) => slot.value,
        }
    }

    pub fn is_attr(&self) -> bool {
        matches!(self, Field::Attr(_))
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, Field::Slot(_))
    }

    pub fn is_mutable(&self) -> bool {
        match self {
            Field::Attr(attr) => attr.is_mutable(),
            Field::Slot(slot) => slot.is_mutable(),
        }
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<Value, StructureError> {
        match self {
            Field::Attr(attr) => attr.set_value(value),
            Field::Slot(slot) => slot.set_value(value),
        }
    }

    pub fn updated_value(&self, value: impl Into<Value>) -> Field {
        match self {
            Field::Attr(attr) => Field::Attr(attr.updated_value(value)),
            Field::Slot(slot) => Field::Slot(slot.updated_value(value)),
        }
    }

    /// A field with a new key. Attributes stay attributes only if the new key is textual.
    pub fn updated_key(&self, key: Value) -> Field {
        let value = self.value().clone();
        match (self, key) {
            (Field::Attr(_), Value::Text(text)) => Field::Attr(Attr::new(text, value)),
            (_, key) => Field::Slot(Slot::new(key, value)),
        }
    }

    pub fn commit(&mut self) {
        match self {
            Field::Attr(attr) => attr.commit(),
            Field::Slot(slot) => slot.commit(),
        }
    }
}

impl PartialEq for Attr {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl Eq for Attr {}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl Eq for Slot {}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Field::Attr(a), Field::Attr(b)) => a == b,
            (Field::Slot(a), Field::Slot(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Field {}

impl From<Attr> for Field {
    fn from(attr: Attr) -> Self {
        Field::Attr(attr)
    }
}

impl From<Slot> for Field {
    fn from(slot: Slot) -> Self {
        Field::Slot(slot)
    }
}

impl<K: Into<Text>, V: Into<Value>> From<(K, V)> for Attr {
    fn from(pair: (K, V)) -> Self {
        let (key, value) = pair;
        Attr::new(key, value)
    }
}

impl From<&str> for Attr {
    fn from(key: &str) -> Self {
        Attr::of(key)
    }
}

impl From<String> for Attr {
    fn from(key: String) -> Self {
        Attr::of(key)
    }
}

impl Display for Attr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("@")?;
        crate::identifier::write_string_literal(&self.key, f)?;
        match &self.value {
            Value::Extant => Ok(()),
            Value::Record(record) if !record.is_empty() => {
                f.write_str("(")?;
                crate::value::write_items(record.items(), f)?;
                f.write_str(")")
            }
            value => write!(f, "({})", value),
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Value::Extant => write!(f, "{}:", self.key),
            value => write!(f, "{}:{}", self.key, value),
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Attr(attr) => Display::fmt(attr, f),
            Field::Slot(slot) => Display::fmt(slot, f),
        }
    }
}
