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

//! A total order, equality and hashing across every kind of item. Items of different kinds are
//! ordered by [`type_order`] and items of the same kind by their contents. Equality is defined as
//! comparing equal and the hash code is consistent with it.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use swimos_utilities::hash::murmur3::{mash, mix};

use crate::expression::{Expression, Operator};
use crate::field::{Attr, Field, Slot};
use crate::func::Func;
use crate::item::Item;
use crate::record::Record;
use crate::selector::Selector;
use crate::value::Value;

const ABSENT_HASH: u32 = 0xa65e_0001;
const EXTANT_HASH: u32 = 0xe7a7_0001;
const BOOL_SEED: u32 = 0xb001_0001;
const RECORD_SEED: u32 = 0x4ec0_4d01;
const ATTR_SEED: u32 = 0xa774_0001;
const SLOT_SEED: u32 = 0x5107_0001;

/// The rank of each kind of item in the total order.
pub fn type_order(item: &Item) -> u8 {
    match item {
        Item::Field(Field::Attr(_)) => 1,
        Item::Field(Field::Slot(_)) => 2,
        Item::ValueItem(value) => value.type_order(),
    }
}

impl Value {
    pub fn type_order(&self) -> u8 {
        match self {
            Value::Record(_) => 3,
            Value::Data(_) => 4,
            Value::Text(_) => 5,
            Value::Num(_) => 6,
            Value::Bool(_) => 7,
            Value::Expression(expr) => expr.type_order(),
            Value::Func(_) => 50,
            Value::Extant => 98,
            Value::Absent => 99,
        }
    }

    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Record(a), Value::Record(b)) => a.compare(b),
            (Value::Data(a), Value::Data(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Num(a), Value::Num(b)) => a.compare(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Expression(a), Value::Expression(b)) => a.compare(b),
            (Value::Func(a), Value::Func(b)) => a.compare(b),
            _ => self.type_order().cmp(&other.type_order()),
        }
    }

    /// A hash code consistent with [`Value::compare`].
    pub fn hash_code(&self) -> u32 {
        match self {
            Value::Absent => ABSENT_HASH,
            Value::Extant => EXTANT_HASH,
            Value::Bool(b) => mash(mix(BOOL_SEED, u32::from(*b))),
            Value::Num(num) => num.hash_code(),
            Value::Text(text) => text.hash_code(),
            Value::Data(data) => data.hash_code(),
            Value::Record(record) => record.hash_code(),
            Value::Expression(expr) => expr.hash_code(),
            Value::Func(func) => func.hash_code(),
        }
    }
}

impl Record {
    pub fn compare(&self, other: &Record) -> Ordering {
        self.iter().cmp(other.iter())
    }

    pub fn hash_code(&self) -> u32 {
        mash(
            self.iter()
                .fold(RECORD_SEED, |code, item| mix(code, item.hash_code())),
        )
    }
}

impl Field {
    pub fn compare(&self, other: &Field) -> Ordering {
        match (self, other) {
            (Field::Attr(a), Field::Attr(b)) => a
                .key()
                .cmp(b.key())
                .then_with(|| a.value().compare(b.value())),
            (Field::Slot(a), Field::Slot(b)) => a
                .key()
                .compare(b.key())
                .then_with(|| a.value().compare(b.value())),
            (Field::Attr(_), Field::Slot(_)) => Ordering::Less,
            (Field::Slot(_), Field::Attr(_)) => Ordering::Greater,
        }
    }

    pub fn hash_code(&self) -> u32 {
        let seed = match self {
            Field::Attr(_) => ATTR_SEED,
            Field::Slot(_) => SLOT_SEED,
        };
        mash(mix(mix(seed, self.key_hash()), self.value().hash_code()))
    }
}

impl Item {
    pub fn compare(&self, other: &Item) -> Ordering {
        match (self, other) {
            (Item::Field(a), Item::Field(b)) => a.compare(b),
            (Item::ValueItem(a), Item::ValueItem(b)) => a.compare(b),
            _ => type_order(self).cmp(&type_order(other)),
        }
    }

    pub fn hash_code(&self) -> u32 {
        match self {
            Item::Field(field) => field.hash_code(),
            Item::ValueItem(value) => value.hash_code(),
        }
    }
}

macro_rules! total_order {
    ($($t:ty),*) => {
        $(
            impl PartialEq for $t {
                fn eq(&self, other: &Self) -> bool {
                    self.compare(other) == Ordering::Equal
                }
            }

            impl Eq for $t {}

            impl PartialOrd for $t {
                fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                    Some(self.cmp(other))
                }
            }

            impl Ord for $t {
                fn cmp(&self, other: &Self) -> Ordering {
                    self.compare(other)
                }
            }

            impl Hash for $t {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    state.write_u32(self.hash_code());
                }
            }
        )*
    };
}

total_order!(Value, Item, Record, Expression, Operator, Selector, Func);

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl Hash for Attr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Field::Attr(self.clone()).hash(state)
    }
}

impl Hash for Slot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Field::Slot(self.clone()).hash(state)
    }
}

impl PartialEq<Value> for Item {
    fn eq(&self, other: &Value) -> bool {
        matches!(self, Item::ValueItem(value) if value == other)
    }
}
