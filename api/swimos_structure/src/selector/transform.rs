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

use crate::error::InterpreterError;
use crate::interpreter::Interpreter;
use crate::item::Item;
use crate::record::Record;
use crate::selector::{predicate_holds, to_index, Selector};
use crate::value::Value;

pub(crate) type TransformCallback<'a> =
    dyn FnMut(&mut Interpreter) -> Result<Item, InterpreterError> + 'a;

impl Selector {
    /// Rewrite each selection with `transform`, which is called with the selected item at the top
    /// of the scope stack. A selection is replaced if the transformed item differs from it and
    /// removed if the transformed item is [`Value::Absent`].
    ///
    /// The rewritten scope is returned (and left at the top of the stack in place of the original).
    ///
    /// ```
    /// use swimos_structure::{Interpreter, Item, Record, Selector, Value};
    ///
    /// let mut interpreter = Interpreter::from_scope(Record::of([("a", 1), ("b", 2)]));
    /// let selector = Selector::identity().get("a");
    /// let result = selector
    ///     .map_selected(&mut interpreter, |interpreter| {
    ///         let value = interpreter.peek_scope()?.value().clone();
    ///         Ok(Item::from(value.times(&Value::from(10))))
    ///     })
    ///     .unwrap();
    /// assert_eq!(result, Item::from(Record::of([("a", 10), ("b", 2)])));
    /// ```
    pub fn map_selected<F>(
        &self,
        interpreter: &mut Interpreter,
        mut transform: F,
    ) -> Result<Item, InterpreterError>
    where
        F: FnMut(&mut Interpreter) -> Result<Item, InterpreterError>,
    {
        self.map_step(interpreter, &mut transform)
    }

    pub(crate) fn map_step(
        &self,
        interpreter: &mut Interpreter,
        transform: &mut TransformCallback<'_>,
    ) -> Result<Item, InterpreterError> {
        interpreter.will_transform(self);
        let result = self.transform_step(interpreter, transform)?;
        interpreter.did_transform(self, &result);
        Ok(result)
    }

    fn transform_step(
        &self,
        interpreter: &mut Interpreter,
        transform: &mut TransformCallback<'_>,
    ) -> Result<Item, InterpreterError> {
        match self {
            Selector::Identity => {
                if interpreter.scope_depth() == 0 {
                    return Ok(Item::absent());
                }
                let old_scope = interpreter.pop_scope()?;
                let new_scope = match old_scope.evaluate(interpreter) {
                    Ok(scope) => scope,
                    Err(err) => {
                        interpreter.push_scope(old_scope)?;
                        return Err(err);
                    }
                };
                interpreter.push_scope(new_scope)?;
                let result = transform(interpreter);
                interpreter.swap_scope(old_scope)?;
                result
            }
            Selector::Literal { item, then } => {
                let literal = item.evaluate(interpreter)?;
                interpreter.with_scope(literal, |interpreter| then.map_step(interpreter, transform))
            }
            Selector::Get { key, then } => {
                let key = key.evaluate(interpreter)?.into_value();
                transform_record(interpreter, |record, interpreter| {
                    if let Some(i) = record.index_of_key(&key) {
                        let old_value = record.items()[i].to_value();
                        let new_value = interpreter
                            .with_scope(old_value.clone(), |interpreter| {
                                then.map_step(interpreter, transform)
                            })?
                            .into_value();
                        if !new_value.is_defined() {
                            record.delete(key)?;
                        } else if new_value != old_value {
                            record.set(key, new_value)?;
                        }
                    }
                    Ok(())
                })
            }
            Selector::GetAttr { key, then } => transform_record(interpreter, |record, interpreter| {
                let index = record
                    .index_of_key(&Value::Text(key.clone()))
                    .filter(|i| record.items()[*i].is_attr());
                if let Some(i) = index {
                    let old_value = record.items()[i].to_value();
                    let new_value = interpreter
                        .with_scope(old_value.clone(), |interpreter| {
                            then.map_step(interpreter, transform)
                        })?
                        .into_value();
                    if !new_value.is_defined() {
                        record.remove_item(i)?;
                    } else if new_value != old_value {
                        record.set_attr(key.clone(), new_value)?;
                    }
                }
                Ok(())
            }),
            Selector::GetItem { index, then } => {
                let index = to_index(index);
                transform_record(interpreter, |record, interpreter| {
                    if let Some(i) = index.filter(|i| *i < record.len()) {
                        let old_item = record.items()[i].clone();
                        let new_item = interpreter.with_scope(old_item.clone(), |interpreter| {
                            then.map_step(interpreter, transform)
                        })?;
                        replace_or_remove(record, i, &old_item, new_item)?;
                    }
                    Ok(())
                })
            }
            Selector::Keys(then) => {
                if let Some(Item::Field(field)) = peek_field(interpreter)? {
                    let key = field.key();
                    let new_key = interpreter
                        .with_scope(key.clone(), |interpreter| then.map_step(interpreter, transform))?
                        .into_value();
                    let result = if !new_key.is_defined() {
                        Item::absent()
                    } else if new_key != key {
                        Item::Field(field.updated_key(new_key))
                    } else {
                        Item::Field(field)
                    };
                    return replace_scope(interpreter, result);
                }
                transform_record(interpreter, |record, interpreter| {
                    let mut i = 0;
                    while i < record.len() {
                        let field = match &record.items()[i] {
                            Item::Field(field) => field.clone(),
                            Item::ValueItem(_) => {
                                i += 1;
                                continue;
                            }
                        };
                        let key = field.key();
                        let new_key = interpreter
                            .with_scope(key.clone(), |interpreter| {
                                then.map_step(interpreter, transform)
                            })?
                            .into_value();
                        if !new_key.is_defined() {
                            record.remove_item(i)?;
                            continue;
                        }
                        if new_key != key {
                            record.set_item(i, field.updated_key(new_key))?;
                        }
                        i += 1;
                    }
                    Ok(())
                })
            }
            Selector::Values(then) => {
                if let Some(Item::Field(field)) = peek_field(interpreter)? {
                    let value = field.value().clone();
                    let new_value = interpreter
                        .with_scope(value.clone(), |interpreter| then.map_step(interpreter, transform))?
                        .into_value();
                    let result = if !new_value.is_defined() {
                        Item::absent()
                    } else if new_value != value {
                        Item::Field(field.updated_value(new_value))
                    } else {
                        Item::Field(field)
                    };
                    return replace_scope(interpreter, result);
                }
                transform_record(interpreter, |record, interpreter| {
                    let mut i = 0;
                    while i < record.len() {
                        let old_item = record.items()[i].clone();
                        let old_value = old_item.to_value();
                        let new_value = interpreter
                            .with_scope(old_value.clone(), |interpreter| {
                                then.map_step(interpreter, transform)
                            })?
                            .into_value();
                        if !new_value.is_defined() {
                            record.remove_item(i)?;
                            continue;
                        }
                        if new_value != old_value {
                            let new_item = match &old_item {
                                Item::Field(field) => Item::Field(field.updated_value(new_value)),
                                Item::ValueItem(_) => Item::ValueItem(new_value),
                            };
                            record.set_item(i, new_item)?;
                        }
                        i += 1;
                    }
                    Ok(())
                })
            }
            Selector::Children(then) => transform_record(interpreter, |record, interpreter| {
                let mut i = 0;
                while i < record.len() {
                    let old_item = record.items()[i].clone();
                    let new_item = interpreter.with_scope(old_item.clone(), |interpreter| {
                        then.map_step(interpreter, transform)
                    })?;
                    if replace_or_remove(record, i, &old_item, new_item)? {
                        i += 1;
                    }
                }
                Ok(())
            }),
            Selector::Descendants(then) => transform_record(interpreter, |record, interpreter| {
                let mut i = 0;
                while i < record.len() {
                    let old_item = record.items()[i].clone();
                    let mut new_item = interpreter.with_scope(old_item.clone(), |interpreter| {
                        then.map_step(interpreter, transform)
                    })?;
                    if new_item.is_defined() {
                        new_item = interpreter.descend(|interpreter| {
                            interpreter.with_scope(new_item, |interpreter| {
                                self.map_step(interpreter, transform)
                            })
                        })?;
                    }
                    if replace_or_remove(record, i, &old_item, new_item)? {
                        i += 1;
                    }
                }
                Ok(())
            }),
            Selector::Filter { predicate, then } => {
                if predicate_holds(predicate, interpreter)? {
                    then.map_step(interpreter, transform)
                } else if interpreter.scope_depth() == 0 {
                    Ok(Item::absent())
                } else {
                    Ok(interpreter.peek_scope()?.clone())
                }
            }
        }
    }
}

/// Replace the item at `index` if it has changed or remove it if it is undefined. Returns whether
/// the item remains in the record.
fn replace_or_remove(
    record: &mut Record,
    index: usize,
    old_item: &Item,
    new_item: Item,
) -> Result<bool, InterpreterError> {
    if !new_item.is_defined() {
        record.remove_item(index)?;
        Ok(false)
    } else {
        if &new_item != old_item {
            record.set_item(index, new_item)?;
        }
        Ok(true)
    }
}

/// The current scope, if it is a field.
fn peek_field(interpreter: &mut Interpreter) -> Result<Option<Item>, InterpreterError> {
    if interpreter.scope_depth() == 0 {
        return Ok(None);
    }
    match interpreter.peek_scope()? {
        field @ Item::Field(_) => Ok(Some(field.clone())),
        _ => Ok(None),
    }
}

fn replace_scope(interpreter: &mut Interpreter, scope: Item) -> Result<Item, InterpreterError> {
    interpreter.swap_scope(scope.clone())?;
    Ok(scope)
}

/// Apply `f` to the record in (or in the value of a field in) the current scope, replacing the
/// scope with the result. Scopes that do not contain records are left unchanged.
fn transform_record<F>(interpreter: &mut Interpreter, f: F) -> Result<Item, InterpreterError>
where
    F: FnOnce(&mut Record, &mut Interpreter) -> Result<(), InterpreterError>,
{
    if interpreter.scope_depth() == 0 {
        return Ok(Item::absent());
    }
    let scope = interpreter.pop_scope()?;
    let (mut record, field) = match scope {
        Item::ValueItem(Value::Record(record)) => (record, None),
        Item::Field(field) => match field.value().as_record().cloned() {
            Some(record) => (record, Some(field)),
            None => return replace_scope_pushed(interpreter, Item::Field(field)),
        },
        other => return replace_scope_pushed(interpreter, other),
    };
    let outcome = f(&mut record, interpreter);
    let result = match field {
        None => Item::ValueItem(Value::Record(record)),
        Some(field) => {
            if matches!(field.value(), Value::Record(original) if original == &record) {
                Item::Field(field)
            } else {
                Item::Field(field.updated_value(record))
            }
        }
    };
    interpreter.push_scope(result.clone())?;
    outcome.map(|_| result)
}

fn replace_scope_pushed(interpreter: &mut Interpreter, scope: Item) -> Result<Item, InterpreterError> {
    interpreter.push_scope(scope.clone())?;
    Ok(scope)
}
