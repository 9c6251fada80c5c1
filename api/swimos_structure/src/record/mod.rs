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

use std::cell::Cell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::StructureError;
use crate::field::Field;
use crate::item::Item;
use crate::text::Text;
use crate::value::Value;

mod storage;
#[cfg(test)]
mod tests;
mod view;

use storage::RecordStorage;
pub use view::RecordMapView;

/// Ownership state of the storage behind a [`Record`] handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordState {
    /// The handle is the only owner of its storage and may write to it directly.
    #[default]
    Exclusive,
    /// The storage may be shared with another handle and is copied before the next write.
    Shared,
    /// The record has been committed and can no longer be modified.
    Frozen,
}

impl RecordState {
    /// The state of a handle after it has been cloned (applies to both handles).
    pub const fn on_branch(self) -> RecordState {
        match self {
            RecordState::Frozen => RecordState::Frozen,
            _ => RecordState::Shared,
        }
    }

    /// The state after storage has been written to, or an error if writes are not permitted.
    pub const fn on_write(self) -> Result<RecordState, StructureError> {
        match self {
            RecordState::Frozen => Err(StructureError::Immutable),
            _ => Ok(RecordState::Exclusive),
        }
    }

    pub const fn on_commit(self) -> RecordState {
        RecordState::Frozen
    }
}

/// An ordered sequence of items that is simultaneously list-like (positional access) and map-like
/// (lookup of fields by key). Keys are not required to be unique: keyed lookups find the last
/// matching field.
///
/// Cloning a record is cheap: the clones share storage until one of them is written to, at which
/// point the writer takes a private copy. Once committed, a record (and everything within it) can
/// no longer be modified.
pub struct Record {
    storage: Rc<RecordStorage>,
    state: Cell<RecordState>,
}

impl Default for Record {
    fn default() -> Self {
        Record::new()
    }
}

impl Clone for Record {
    fn clone(&self) -> Self {
        let state = self.state.get().on_branch();
        self.state.set(state);
        Record {
            storage: self.storage.clone(),
            state: Cell::new(state),
        }
    }
}

impl Debug for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("state", &self.state.get())
            .field("items", &self.storage.items())
            .finish()
    }
}

impl Record {
    pub fn new() -> Self {
        Record::from_storage(RecordStorage::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Record::from_storage(RecordStorage::with_capacity(capacity))
    }

    /// Create a record from a sequence of items.
    ///
    /// ```
    /// use swimos_structure::{Item, Record, Value};
    ///
    /// let record = Record::of([Item::slot("a", 1), Item::of(2)]);
    /// assert_eq!(record.len(), 2);
    /// assert_eq!(record.get("a"), Some(&Value::from(1)));
    /// ```
    pub fn of<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        items.into_iter().map(Into::into).collect()
    }

    fn from_storage(storage: RecordStorage) -> Self {
        Record {
            storage: Rc::new(storage),
            state: Cell::new(RecordState::Exclusive),
        }
    }

    pub fn state(&self) -> RecordState {
        self.state.get()
    }

    pub fn is_mutable(&self) -> bool {
        self.state.get() != RecordState::Frozen
    }

    /// Whether the storage is (potentially) shared with another handle.
    pub fn is_aliased(&self) -> bool {
        self.state.get() == RecordState::Shared
    }

    /// A new handle onto the same items that is always mutable, even if this record is committed.
    /// Storage is copied lazily, on the first write to either handle.
    pub fn branch(&self) -> Record {
        let state = self.state.get();
        if state != RecordState::Frozen {
            self.state.set(RecordState::Shared);
        }
        Record {
            storage: self.storage.clone(),
            state: Cell::new(RecordState::Shared),
        }
    }

    /// Permanently freeze the record and everything within it.
    pub fn commit(&mut self) {
        if self.state.get() == RecordState::Frozen {
            return;
        }
        Rc::make_mut(&mut self.storage).commit();
        self.state.set(self.state.get().on_commit());
        debug!(length = self.storage.len(), "Committed a record.");
    }

    fn storage_mut(&mut self) -> Result<&mut RecordStorage, StructureError> {
        let state = self.state.get();
        let next = state.on_write()?;
        if state == RecordState::Shared && Rc::strong_count(&self.storage) > 1 {
            trace!(
                length = self.storage.len(),
                "Copying shared record storage on write."
            );
        }
        self.state.set(next);
        Ok(Rc::make_mut(&mut self.storage))
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    pub fn field_count(&self) -> usize {
        self.storage.field_count()
    }

    pub fn value_count(&self) -> usize {
        self.len() - self.field_count()
    }

    pub fn attr_count(&self) -> usize {
        self.iter().filter(|item| item.is_attr()).count()
    }

    pub fn items(&self) -> &[Item] {
        self.storage.items()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.storage.items().iter()
    }

    /// A record is array-like if it contains no fields.
    pub fn is_array(&self) -> bool {
        self.field_count() == 0
    }

    /// A record is object-like if it contains only fields.
    pub fn is_object(&self) -> bool {
        self.field_count() == self.len()
    }

    /// The position of the last field with the given key.
    pub fn index_of_key(&self, key: &Value) -> Option<usize> {
        self.storage.find_field(key)
    }

    pub fn index_of(&self, item: &Item) -> Option<usize> {
        self.iter().position(|other| other == item)
    }

    pub fn contains_key(&self, key: impl Into<Value>) -> bool {
        self.index_of_key(&key.into()).is_some()
    }

    pub fn get_field(&self, key: impl Into<Value>) -> Option<&Field> {
        let index = self.index_of_key(&key.into())?;
        self.storage.items()[index].as_field()
    }

    /// The value of the last field with the given key.
    pub fn get(&self, key: impl Into<Value>) -> Option<&Value> {
        self.get_field(key).map(Field::value)
    }

    /// The value of the last field with the given key if that field is an attribute.
    pub fn get_attr(&self, key: impl Into<Text>) -> Option<&Value> {
        match self.get_field(Value::Text(key.into()))? {
            Field::Attr(attr) => Some(attr.value()),
            Field::Slot(_) => None,
        }
    }

    /// The value of the last field with the given key if that field is a slot.
    pub fn get_slot(&self, key: impl Into<Value>) -> Option<&Value> {
        match self.get_field(key)? {
            Field::Slot(slot) => Some(slot.value()),
            Field::Attr(_) => None,
        }
    }

    pub fn get_item(&self, index: usize) -> Option<&Item> {
        self.storage.items().get(index)
    }

    pub fn push(&mut self, item: impl Into<Item>) -> Result<(), StructureError> {
        self.storage_mut()?.push(item.into());
        Ok(())
    }

    pub fn push_all<I, T>(&mut self, items: I) -> Result<(), StructureError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        let storage = self.storage_mut()?;
        for item in items {
            storage.push(item.into());
        }
        Ok(())
    }

    /// Update the last field with a matching key (in place if it is still mutable) or append a
    /// new slot.
    pub fn set(
        &mut self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<(), StructureError> {
        self.storage_mut()?.set(key.into(), value.into())
    }

    pub fn set_attr(
        &mut self,
        key: impl Into<Text>,
        value: impl Into<Value>,
    ) -> Result<(), StructureError> {
        self.storage_mut()?.set_attr(key.into(), value.into())
    }

    pub fn set_slot(
        &mut self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<(), StructureError> {
        self.storage_mut()?.set_slot(key.into(), value.into())
    }

    /// Replace the item at an index, returning the previous item.
    pub fn set_item(&mut self, index: usize, item: impl Into<Item>) -> Result<Item, StructureError> {
        let length = self.len();
        if index >= length {
            return Err(StructureError::IndexOutOfRange { index, length });
        }
        self.storage_mut()?.set_item(index, item.into())
    }

    pub fn insert(&mut self, index: usize, item: impl Into<Item>) -> Result<(), StructureError> {
        let length = self.len();
        if index > length {
            return Err(StructureError::IndexOutOfRange { index, length });
        }
        self.storage_mut()?.insert(index, item.into())
    }

    /// Replace `delete_count` items starting at `start` with new items, returning the removed
    /// items. `start` may be at most the length of the record; `delete_count` is clamped to the
    /// items that follow it.
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
        let length = self.len();
        if start > length {
            return Err(StructureError::IndexOutOfRange {
                index: start,
                length,
            });
        }
        Ok(self
            .storage_mut()?
            .splice(start, delete_count, items.into_iter().map(Into::into)))
    }

    /// Remove the last field with the given key.
    pub fn delete(&mut self, key: impl Into<Value>) -> Result<Option<Item>, StructureError> {
        let key = key.into();
        if !self.is_mutable() {
            return Err(StructureError::Immutable);
        }
        if self.index_of_key(&key).is_none() {
            return Ok(None);
        }
        Ok(self.storage_mut()?.delete(&key))
    }

    pub fn remove_item(&mut self, index: usize) -> Result<Item, StructureError> {
        let length = self.len();
        if index >= length {
            return Err(StructureError::IndexOutOfRange { index, length });
        }
        self.storage_mut()?.remove_item(index)
    }

    pub fn clear(&mut self) -> Result<(), StructureError> {
        self.storage_mut()?.clear();
        Ok(())
    }

    pub fn retain<F>(&mut self, f: F) -> Result<(), StructureError>
    where
        F: FnMut(&Item) -> bool,
    {
        self.storage_mut()?.retain(f);
        Ok(())
    }

    /// A mutable window onto the items in `[lower, upper)`.
    pub fn sub_record(
        &mut self,
        lower: usize,
        upper: usize,
    ) -> Result<RecordMapView<'_>, StructureError> {
        let length = self.len();
        if upper > length {
            Err(StructureError::IndexOutOfRange {
                index: upper,
                length,
            })
        } else if lower > upper {
            Err(StructureError::IndexOutOfRange {
                index: lower,
                length,
            })
        } else {
            Ok(RecordMapView::new(self, lower, upper))
        }
    }

    /// The first item of the record ([`Item::absent`] if it is empty).
    pub fn head(&self) -> Item {
        self.get_item(0).cloned().unwrap_or_default()
    }

    /// Everything after the first item.
    pub fn tail(&self) -> Record {
        self.iter().skip(1).cloned().collect()
    }

    /// Everything after the first item, flattened.
    pub fn body(&self) -> Value {
        match self.len() {
            0 | 1 => Value::Extant,
            2 => match &self.items()[1] {
                Item::ValueItem(value) => value.clone(),
                field => Value::Record(Record::of([field.clone()])),
            },
            _ => Value::Record(self.tail()),
        }
    }

    /// The value of the first item if it is an attribute with the given key.
    pub fn header(&self, tag: &str) -> Value {
        match self.get_item(0) {
            Some(Item::Field(Field::Attr(attr))) if attr.key() == tag => attr.value().clone(),
            _ => Value::Absent,
        }
    }

    /// The value of the leading attribute with the given key, as a record.
    pub fn headers(&self, tag: &str) -> Option<Record> {
        match self.header(tag) {
            Value::Absent => None,
            Value::Record(record) => Some(record),
            value => Some(Record::of([value])),
        }
    }

    /// The key of the first item if it is an attribute.
    pub fn tag(&self) -> Option<Text> {
        match self.get_item(0) {
            Some(Item::Field(Field::Attr(attr))) => Some(attr.key().clone()),
            _ => None,
        }
    }

    /// The record without its attributes, flattened.
    pub fn target(&self) -> Value {
        if self.iter().all(|item| !item.is_attr()) {
            return self.flattened();
        }
        let rest: Record = self.iter().filter(|item| !item.is_attr()).cloned().collect();
        rest.flattened()
    }

    /// An empty record flattens to [`Value::Extant`] and a record containing a single value to
    /// that value.
    pub fn flattened(&self) -> Value {
        match self.items() {
            [] => Value::Extant,
            [Item::ValueItem(value)] => value.clone(),
            _ => Value::Record(self.clone()),
        }
    }

    /// A copy with the items of `other` appended.
    pub fn concat(&self, other: &Record) -> Record {
        self.iter().chain(other.iter()).cloned().collect()
    }

    pub fn appended(&self, item: impl Into<Item>) -> Record {
        let mut storage = (*self.storage).clone();
        storage.push(item.into());
        Record::from_storage(storage)
    }

    pub fn prepended(&self, item: impl Into<Item>) -> Record {
        std::iter::once(item.into())
            .chain(self.iter().cloned())
            .collect()
    }

    /// A copy with the value of `key` set.
    pub fn updated(&self, key: impl Into<Value>, value: impl Into<Value>) -> Record {
        self.copy_with(|storage| storage.set(key.into(), value.into()))
    }

    pub fn updated_attr(&self, key: impl Into<Text>, value: impl Into<Value>) -> Record {
        self.copy_with(|storage| storage.set_attr(key.into(), value.into()))
    }

    pub fn updated_slot(&self, key: impl Into<Value>, value: impl Into<Value>) -> Record {
        self.copy_with(|storage| storage.set_slot(key.into(), value.into()))
    }

    /// A copy with the last field with a matching key removed.
    pub fn removed(&self, key: impl Into<Value>) -> Record {
        let key = key.into();
        self.copy_with(|storage| {
            storage.delete(&key);
            Ok(())
        })
    }

    fn copy_with<F>(&self, f: F) -> Record
    where
        F: FnOnce(&mut RecordStorage) -> Result<(), StructureError>,
    {
        let mut storage = (*self.storage).clone();
        // Copied storage is never committed so updates of immutable fields replace them.
        let _ = f(&mut storage);
        Record::from_storage(storage)
    }

    pub fn into_items(self) -> Vec<Item> {
        match Rc::try_unwrap(self.storage) {
            Ok(storage) => storage.into_items(),
            Err(shared) => shared.items().to_vec(),
        }
    }
}

impl<T: Into<Item>> FromIterator<T> for Record {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Record::from_storage(RecordStorage::from_items(
            iter.into_iter().map(Into::into).collect(),
        ))
    }
}

impl From<Vec<Item>> for Record {
    fn from(items: Vec<Item>) -> Self {
        Record::from_storage(RecordStorage::from_items(items))
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Record {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_items().into_iter()
    }
}
