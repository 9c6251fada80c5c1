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

use crate::data::Data;
use crate::expression::Expression;
use crate::field::Field;
use crate::func::Func;
use crate::item::Item;
use crate::num::Num;
use crate::record::Record;
use crate::text::Text;

mod display;
mod ops;
mod order;
#[cfg(test)]
mod tests;

pub(crate) use display::write_items;
pub use order::type_order;

/// A structural value: either a scalar, a record of items, an unevaluated expression or a
/// function.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// No value at all. Produced (rather than an error) whenever an operation is not meaningful
    /// for its operands.
    #[default]
    Absent,
    /// A value that is present but empty.
    Extant,
    Bool(bool),
    Num(Num),
    Text(Text),
    Data(Data),
    Record(Record),
    Expression(Box<Expression>),
    Func(Func),
}

/// The kinds of [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Absent,
    Extant,
    Bool,
    Num,
    Text,
    Data,
    Record,
    Expression,
    Func,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Absent => "Absent",
            ValueKind::Extant => "Extant",
            ValueKind::Bool => "Bool",
            ValueKind::Num => "Num",
            ValueKind::Text => "Text",
            ValueKind::Data => "Data",
            ValueKind::Record => "Record",
            ValueKind::Expression => "Expression",
            ValueKind::Func => "Func",
        }
    }
}

impl Value {
    pub fn text(value: impl Into<Text>) -> Value {
        Value::Text(value.into())
    }

    pub fn num(value: impl Into<Num>) -> Value {
        Value::Num(value.into())
    }

    pub fn data(bytes: impl Into<Data>) -> Value {
        Value::Data(bytes.into())
    }

    pub fn empty_record() -> Value {
        Value::Record(Record::new())
    }

    /// A record containing each of the values, in order.
    pub fn from_vec<T: Into<Item>>(items: Vec<T>) -> Value {
        Value::Record(Record::of(items))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Absent => ValueKind::Absent,
            Value::Extant => ValueKind::Extant,
            Value::Bool(_) => ValueKind::Bool,
            Value::Num(_) => ValueKind::Num,
            Value::Text(_) => ValueKind::Text,
            Value::Data(_) => ValueKind::Data,
            Value::Record(_) => ValueKind::Record,
            Value::Expression(_) => ValueKind::Expression,
            Value::Func(_) => ValueKind::Func,
        }
    }

    /// Anything other than [`Value::Absent`].
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Absent)
    }

    /// Neither [`Value::Absent`] nor [`Value::Extant`].
    pub fn is_distinct(&self) -> bool {
        !matches!(self, Value::Absent | Value::Extant)
    }

    /// Whether the value counts as "true" for the logical operators: booleans are definite iff they
    /// are true and records iff they are non-empty. Absent and extant values are never definite.
    pub fn is_definite(&self) -> bool {
        match self {
            Value::Absent | Value::Extant => false,
            Value::Bool(b) => *b,
            Value::Record(record) => !record.is_empty(),
            _ => true,
        }
    }

    /// Whether the value contains no expressions (and so evaluates to itself).
    pub fn is_constant(&self) -> bool {
        match self {
            Value::Expression(_) => false,
            Value::Record(record) => record.is_constant(),
            _ => true,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Value::Expression(_))
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self, Value::Record(record) if record.is_mutable())
    }

    /// Permanently freeze any records within the value.
    pub fn commit(&mut self) {
        if let Value::Record(record) = self {
            record.commit();
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The number of items in a record (0 for other values).
    pub fn length(&self) -> usize {
        self.as_record().map(Record::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        match self {
            Value::Record(record) => record.iter(),
            _ => (&[] as &[Item]).iter(),
        }
    }

    /// The keys of the fields of a record.
    pub fn keys(&self) -> impl Iterator<Item = Value> + '_ {
        self.iter().filter_map(|item| item.as_field().map(Field::key))
    }

    /// The values of the items of a record.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().map(Item::value)
    }

    pub fn contains_key(&self, key: impl Into<Value>) -> bool {
        matches!(self, Value::Record(record) if record.contains_key(key))
    }

    /// The value of the last field with the given key ([`Value::Absent`] if there is none).
    pub fn get(&self, key: impl Into<Value>) -> Value {
        self.as_record()
            .and_then(|record| record.get(key))
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_attr(&self, key: impl Into<Text>) -> Value {
        self.as_record()
            .and_then(|record| record.get_attr(key))
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_slot(&self, key: impl Into<Value>) -> Value {
        self.as_record()
            .and_then(|record| record.get_slot(key))
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_field(&self, key: impl Into<Value>) -> Option<Field> {
        self.as_record()
            .and_then(|record| record.get_field(key))
            .cloned()
    }

    pub fn get_item(&self, index: usize) -> Item {
        self.as_record()
            .and_then(|record| record.get_item(index))
            .cloned()
            .unwrap_or_default()
    }

    pub fn head(&self) -> Item {
        match self {
            Value::Record(record) => record.head(),
            _ => Item::absent(),
        }
    }

    pub fn tail(&self) -> Value {
        match self {
            Value::Record(record) => Value::Record(record.tail()),
            _ => Value::Absent,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            Value::Record(record) => record.body(),
            _ => Value::Absent,
        }
    }

    pub fn header(&self, tag: &str) -> Value {
        match self {
            Value::Record(record) => record.header(tag),
            _ => Value::Absent,
        }
    }

    pub fn headers(&self, tag: &str) -> Option<Record> {
        self.as_record().and_then(|record| record.headers(tag))
    }

    /// The key of the leading attribute of a record.
    pub fn tag(&self) -> Option<Text> {
        self.as_record().and_then(Record::tag)
    }

    /// The value without the attributes of a record.
    pub fn target(&self) -> Value {
        match self {
            Value::Record(record) => record.target(),
            value => value.clone(),
        }
    }

    pub fn flattened(&self) -> Value {
        match self {
            Value::Record(record) => record.flattened(),
            value => value.clone(),
        }
    }

    /// The value as a record: records are unchanged, [`Value::Absent`] becomes an empty record and
    /// anything else a record with a single item.
    pub fn unflattened(&self) -> Record {
        match self {
            Value::Record(record) => record.clone(),
            Value::Absent => Record::new(),
            value => Record::of([value.clone()]),
        }
    }

    /// A copy with the value of `key` set. Values that are not records are treated as empty
    /// records.
    pub fn updated(&self, key: impl Into<Value>, value: impl Into<Value>) -> Value {
        Value::Record(self.unflattened_record().updated(key, value))
    }

    pub fn updated_attr(&self, key: impl Into<Text>, value: impl Into<Value>) -> Value {
        Value::Record(self.unflattened_record().updated_attr(key, value))
    }

    pub fn updated_slot(&self, key: impl Into<Value>, value: impl Into<Value>) -> Value {
        Value::Record(self.unflattened_record().updated_slot(key, value))
    }

    pub fn appended(&self, item: impl Into<Item>) -> Value {
        Value::Record(self.unflattened().appended(item))
    }

    pub fn prepended(&self, item: impl Into<Item>) -> Value {
        Value::Record(self.unflattened().prepended(item))
    }

    pub fn concat(&self, other: &Value) -> Value {
        Value::Record(self.unflattened().concat(&other.unflattened()))
    }

    /// A copy without the last field with the given key.
    pub fn removed(&self, key: impl Into<Value>) -> Value {
        match self {
            Value::Record(record) => Value::Record(record.removed(key)),
            value => value.clone(),
        }
    }

    fn unflattened_record(&self) -> Record {
        match self {
            Value::Record(record) => record.clone(),
            _ => Record::new(),
        }
    }

    /// The textual form of a scalar (or of the target of a record).
    pub fn string_value(&self) -> Option<String> {
        match self {
            Value::Text(text) => Some(text.to_string()),
            Value::Num(num) => Some(num.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Record(_) => self.scalar_target()?.string_value(),
            _ => None,
        }
    }

    pub fn string_value_or(&self, default: impl Into<String>) -> String {
        self.string_value().unwrap_or_else(|| default.into())
    }

    /// The numeric form of a scalar. Text is parsed and booleans become 0 or 1.
    pub fn number_value(&self) -> Option<Num> {
        match self {
            Value::Num(num) => Some(*num),
            Value::Text(text) => parse_num(text),
            Value::Bool(b) => Some(Num::from(u8::from(*b))),
            Value::Record(_) => self.scalar_target()?.number_value(),
            _ => None,
        }
    }

    pub fn number_value_or(&self, default: impl Into<Num>) -> Num {
        self.number_value().unwrap_or_else(|| default.into())
    }

    /// The boolean form of a scalar. Only the text `true` and `false` are recognized and numbers
    /// are true if they are non-zero.
    pub fn boolean_value(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Text(text) => match text.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Value::Num(num) => Some(num.value() != 0.0 && !num.is_nan()),
            Value::Record(_) => self.scalar_target()?.boolean_value(),
            _ => None,
        }
    }

    pub fn boolean_value_or(&self, default: bool) -> bool {
        self.boolean_value().unwrap_or(default)
    }

    pub fn int_value(&self) -> Option<i32> {
        self.number_value().map(|num| num.int_value())
    }

    pub fn int_value_or(&self, default: i32) -> i32 {
        self.int_value().unwrap_or(default)
    }

    pub fn long_value(&self) -> Option<i64> {
        self.number_value().map(|num| num.long_value())
    }

    pub fn long_value_or(&self, default: i64) -> i64 {
        self.long_value().unwrap_or(default)
    }

    pub fn uint32_value(&self) -> Option<u32> {
        self.number_value().map(|num| num.uint32_value())
    }

    pub fn uint32_value_or(&self, default: u32) -> u32 {
        self.uint32_value().unwrap_or(default)
    }

    pub fn uint64_value(&self) -> Option<u64> {
        self.number_value().map(|num| num.uint64_value())
    }

    pub fn uint64_value_or(&self, default: u64) -> u64 {
        self.uint64_value().unwrap_or(default)
    }

    pub fn float_value(&self) -> Option<f64> {
        self.number_value().map(|num| num.value())
    }

    pub fn float_value_or(&self, default: f64) -> f64 {
        self.float_value().unwrap_or(default)
    }

    /// The target of a record, if it is not itself a record.
    fn scalar_target(&self) -> Option<Value> {
        match self.target() {
            Value::Record(_) => None,
            target => Some(target),
        }
    }
}

fn parse_num(text: &str) -> Option<Num> {
    text.trim().parse::<f64>().ok().map(Num::new)
}
