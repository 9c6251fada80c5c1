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

use std::cell::OnceCell;

use tracing::trace;

use crate::error::StructureError;
use crate::field::{Attr, Field, Slot};
use crate::item::Item;
use crate::text::Text;
use crate::value::Value;

const MIN_TABLE_SIZE: usize = 8;

/// Size of the hash index for `field_count` fields (a load factor of roughly 70%, with at least one
/// empty bucket so that probing always terminates).
fn table_size(field_count: usize) -> usize {
    (field_count * 10 / 7)
        .max(field_count + 1)
        .max(MIN_TABLE_SIZE)
        .next_power_of_two()
}

/// Dense item storage for a record with a lazily built open-addressing index over its fields.
///
/// The index maps the hash code of a key to the position of the *last* field in the record with
/// that key. Buckets are probed linearly (with wrap-around) from `hash % size`.
#[derive(Clone, Default, Debug)]
pub(crate) struct RecordStorage {
    items: Vec<Item>,
    field_count: usize,
    table: OnceCell<Box<[Option<usize>]>>,
}

impl RecordStorage {
    pub fn with_capacity(capacity: usize) -> Self {
        RecordStorage {
            items: Vec::with_capacity(capacity),
            field_count: 0,
            table: OnceCell::new(),
        }
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        let field_count = items.iter().filter(|item| item.is_field()).count();
        RecordStorage {
            items,
            field_count,
            table: OnceCell::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    fn invalidate(&mut self) {
        self.table.take();
    }

    fn index(&self) -> &[Option<usize>] {
        self.table.get_or_init(|| {
            let size = table_size(self.field_count);
            let mut table = vec![None; size].into_boxed_slice();
            for (i, item) in self.items.iter().enumerate() {
                if let Item::Field(field) = item {
                    insert_into(&mut table, &self.items, i, field);
                }
            }
            trace!(
                field_count = self.field_count,
                size,
                "Rebuilt the field index of a record."
            );
            table
        })
    }

    /// The position of the last field with the given key.
    pub fn find_field(&self, key: &Value) -> Option<usize> {
        if self.field_count == 0 {
            return None;
        }
        let table = self.index();
        let mask = table.len() - 1;
        let mut bucket = (key.hash_code() as usize) & mask;
        for _ in 0..table.len() {
            match table[bucket] {
                None => return None,
                Some(i) => match &self.items[i] {
                    Item::Field(field) if field.key_matches(key) => return Some(i),
                    _ => bucket = (bucket + 1) & mask,
                },
            }
        }
        None
    }

    pub fn push(&mut self, item: Item) {
        let index = self.items.len();
        let is_field = item.is_field();
        self.items.push(item);
        if is_field {
            self.field_count += 1;
            let RecordStorage {
                items,
                field_count,
                table,
            } = self;
            let fits = matches!(table.get(), Some(t) if *field_count * 10 / 7 < t.len());
            if !fits {
                table.take();
            } else if let (Some(index_table), Item::Field(field)) = (table.get_mut(), &items[index]) {
                insert_into(index_table, items, index, field);
            }
        }
    }

    /// Set the value of the last field with a matching key or append a new slot.
    pub fn set(&mut self, key: Value, value: Value) -> Result<(), StructureError> {
        match self.find_field(&key) {
            Some(i) => {
                if let Item::Field(field) = &mut self.items[i] {
                    set_field_value(field, value)?;
                }
                Ok(())
            }
            None => {
                self.push(Item::Field(Field::Slot(Slot::new(key, value))));
                Ok(())
            }
        }
    }

    /// As [`RecordStorage::set`] but the field is left as (or converted to) an attribute.
    pub fn set_attr(&mut self, key: Text, value: Value) -> Result<(), StructureError> {
        match self.find_field(&Value::Text(key.clone())) {
            Some(i) => {
                if let Item::Field(field) = &mut self.items[i] {
                    match field {
                        Field::Attr(_) => set_field_value(field, value)?,
                        Field::Slot(_) => *field = Field::Attr(Attr::new(key, value)),
                    }
                }
                Ok(())
            }
            None => {
                self.push(Item::Field(Field::Attr(Attr::new(key, value))));
                Ok(())
            }
        }
    }

    /// As [`RecordStorage::set`] but the field is left as (or converted to) a slot.
    pub fn set_slot(&mut self, key: Value, value: Value) -> Result<(), StructureError> {
        match self.find_field(&key) {
            Some(i) => {
                if let Item::Field(field) = &mut self.items[i] {
                    match field {
                        Field::Slot(_) => set_field_value(field, value)?,
                        Field::Attr(_) => *field = Field::Slot(Slot::new(key, value)),
                    }
                }
                Ok(())
            }
            None => {
                self.push(Item::Field(Field::Slot(Slot::new(key, value))));
                Ok(())
            }
        }
    }

    pub fn set_item(&mut self, index: usize, item: Item) -> Result<Item, StructureError> {
        let length = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(StructureError::IndexOutOfRange { index, length })?;
        let old = std::mem::replace(slot, item);
        let new_is_field = self.items[index].is_field();
        if old.is_field() || new_is_field {
            self.field_count = self.field_count + usize::from(new_is_field) - usize::from(old.is_field());
            self.invalidate();
        }
        Ok(old)
    }

    pub fn insert(&mut self, index: usize, item: Item) -> Result<(), StructureError> {
        let length = self.items.len();
        if index > length {
            return Err(StructureError::IndexOutOfRange { index, length });
        }
        if index == length {
            self.push(item);
        } else {
            if item.is_field() {
                self.field_count += 1;
            }
            self.items.insert(index, item);
            self.invalidate();
        }
        Ok(())
    }

    /// Replace the range `[start, start + delete_count)` (clamped to the record) with new items,
    /// returning the removed items.
    pub fn splice<I>(&mut self, start: usize, delete_count: usize, items: I) -> Vec<Item>
    where
        I: IntoIterator<Item = Item>,
    {
        let start = start.min(self.items.len());
        let end = start.saturating_add(delete_count).min(self.items.len());
        let removed: Vec<Item> = self.items.splice(start..end, items).collect();
        self.field_count = self.items.iter().filter(|item| item.is_field()).count();
        self.invalidate();
        removed
    }

    pub fn remove_item(&mut self, index: usize) -> Result<Item, StructureError> {
        let length = self.items.len();
        if index >= length {
            return Err(StructureError::IndexOutOfRange { index, length });
        }
        let removed = self.items.remove(index);
        if removed.is_field() {
            self.field_count -= 1;
            self.invalidate();
        } else if self.field_count > 0 {
            self.invalidate();
        }
        Ok(removed)
    }

    /// Remove the last field with a matching key.
    pub fn delete(&mut self, key: &Value) -> Option<Item> {
        let index = self.find_field(key)?;
        self.remove_item(index).ok()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.field_count = 0;
        self.invalidate();
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Item) -> bool,
    {
        self.items.retain(f);
        self.field_count = self.items.iter().filter(|item| item.is_field()).count();
        self.invalidate();
    }

    pub fn commit(&mut self) {
        for item in &mut self.items {
            item.commit();
        }
    }
}

fn set_field_value(field: &mut Field, value: Value) -> Result<(), StructureError> {
    if field.is_mutable() {
        field.set_value(value)?;
    } else {
        *field = field.updated_value(value);
    }
    Ok(())
}

fn insert_into(table: &mut [Option<usize>], items: &[Item], index: usize, field: &Field) {
    let mask = table.len() - 1;
    let mut bucket = (field.key_hash() as usize) & mask;
    loop {
        match table[bucket] {
            None => {
                table[bucket] = Some(index);
                return;
            }
            Some(other) => match &items[other] {
                Item::Field(existing) if existing.key_matches(&field.key()) => {
                    table[bucket] = Some(index);
                    return;
                }
                _ => bucket = (bucket + 1) & mask,
            },
        }
    }
}
