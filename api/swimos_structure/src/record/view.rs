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

use crate::error::StructureError;
use crate::field::{Field, Slot};
use crate::item::Item;
use crate::record::Record;
use crate::text::Text;
use crate::value::Value;

/// A window onto the items `[lower, upper)` of a record. Writes go through to the underlying
/// record (subject to its copy-on-write and commit rules) and the upper bound of the window moves
/// as items are added or removed within it.
///
/// Keyed lookups scan the window linearly and, as for records, find the last matching field.
#[derive(Debug)]
pub struct RecordMapView<'a> {
    record: &'a mut Record,
    lower: usize,
    upper: usize,
}

impl<'a> RecordMapView<'a> {
    pub(super) fn new(record: &'a mut Record, lower: usize, upper: usize) -> Self {
        RecordMapView {
            record,
            lower,
            upper,
        }
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.lower, self.upper)
    }

    pub fn len(&self) -> usize {
        self.upper - self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.upper == self.lower
    }

    pub fn is_mutable(&self) -> bool {
        self.record.is_mutable()
    }

    pub fn items(&self) -> &[Item] {
        &self.record.items()[self.lower..self.upper]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items().iter()
    }

    pub fn field_count(&self) -> usize {
        self.iter().filter(|item| item.is_field()).count()
    }

    fn check_index(&self, index: usize, inclusive: bool) -> Result<usize, StructureError> {
        let length = self.len();
        if index < length || (inclusive && index == length) {
            Ok(self.lower + index)
        } else {
            Err(StructureError::IndexOutOfRange { index, length })
        }
    }

    fn position_of_key(&self, key: &Value) -> Option<usize> {
        self.items()
            .iter()
            .rposition(|item| matches!(item, Item::Field(field) if field.key_matches(key)))
    }

    pub fn get_item(&self, index: usize) -> Option<&Item> {
        self.items().get(index)
    }

    pub fn get_field(&self, key: impl Into<Value>) -> Option<&Field> {
        let index = self.position_of_key(&key.into())?;
        self.items()[index].as_field()
    }

    pub fn get(&self, key: impl Into<Value>) -> Option<&Value> {
        self.get_field(key).map(Field::value)
    }

    pub fn get_attr(&self, key: impl Into<Text>) -> Option<&Value> {
        match self.get_field(Value::Text(key.into()))? {
            Field::Attr(attr) => Some(attr.value()),
            Field::Slot(_) => None,
        }
    }

    pub fn get_slot(&self, key: impl Into<Value>) -> Option<&Value> {
        match self.get_field(key)? {
            Field::Slot(slot) => Some(slot.value()),
            Field::Attr(_) => None,
        }
    }

    pub fn contains_key(&self, key: impl Into<Value>) -> bool {
        self.position_of_key(&key.into()).is_some()
    }

    pub fn push(&mut self, item: impl Into<Item>) -> Result<(), StructureError> {
        self.record.insert(self.upper, item)?;
        self.upper += 1;
        Ok(())
    }

    pub fn insert(&mut self, index: usize, item: impl Into<Item>) -> Result<(), StructureError> {
        let at = self.check_index(index, true)?;
        self.record.insert(at, item)?;
        self.upper += 1;
        Ok(())
    }

    pub fn set_item(&mut self, index: usize, item: impl Into<Item>) -> Result<Item, StructureError> {
        let at = self.check_index(index, false)?;
        self.record.set_item(at, item)
    }

    /// Update the last field in the window with a matching key or append a slot to the window.
    pub fn set(
        &mut self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<(), StructureError> {
        let key = key.into();
        let value = value.into();
        match self.position_of_key(&key) {
            Some(index) => {
                let updated = match &self.items()[index] {
                    Item::Field(field) => field.updated_value(value),
                    Item::ValueItem(_) => Field::Slot(Slot::new(key, value)),
                };
                self.set_item(index, updated).map(|_| ())
            }
            None => self.push(Slot::new(key, value)),
        }
    }

    /// Splice within the window. `start` may be at most the length of the window; `delete_count`
    /// is clamped to the window.
    pub fn splice<I, T>(
        &mut self,
        start: usize,
        delete_count: usize,
        items: I,
    ) -> Result<Vec<Item>, StructureError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        let at = self.check_index(start, true)?;
        let delete_count = delete_count.min(self.len() - start);
        let before = self.record.len();
        let removed = self.record.splice(at, delete_count, items)?;
        self.upper = self.upper + self.record.len() - before;
        Ok(removed)
    }

    pub fn remove_item(&mut self, index: usize) -> Result<Item, StructureError> {
        let at = self.check_index(index, false)?;
        let removed = self.record.remove_item(at)?;
        self.upper -= 1;
        Ok(removed)
    }

    /// Remove the last field in the window with a matching key.
    pub fn delete(&mut self, key: impl Into<Value>) -> Result<Option<Item>, StructureError> {
        if !self.is_mutable() {
            return Err(StructureError::Immutable);
        }
        match self.position_of_key(&key.into()) {
            Some(index) => self.remove_item(index).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear(&mut self) -> Result<(), StructureError> {
        let length = self.len();
        self.record.splice(self.lower, length, std::iter::empty::<Item>())?;
        self.upper = self.lower;
        Ok(())
    }

    /// Copy the items of the window into a new record.
    pub fn to_record(&self) -> Record {
        self.iter().cloned().collect()
    }
}
