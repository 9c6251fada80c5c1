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

pub(crate) type SelectCallback<'a, T> =
    dyn FnMut(&mut Interpreter) -> Result<Option<T>, InterpreterError> + 'a;

impl Selector {
    /// Enumerate the selections, depth-first. For each selection, the selected item is pushed onto
    /// the scope stack of the interpreter and `callback` is called. Traversal stops at the first
    /// callback to return a result, which is returned. The scope stack is left as it was found.
    pub fn for_selected<T, F>(
        &self,
        interpreter: &mut Interpreter,
        mut callback: F,
    ) -> Result<Option<T>, InterpreterError>
    where
        F: FnMut(&mut Interpreter) -> Result<Option<T>, InterpreterError>,
    {
        self.select(interpreter, &mut callback)
    }

    pub(crate) fn select<T>(
        &self,
        interpreter: &mut Interpreter,
        callback: &mut SelectCallback<'_, T>,
    ) -> Result<Option<T>, InterpreterError> {
        interpreter.will_select(self);
        let selected = self.select_step(interpreter, callback)?;
        interpreter.did_select(self, selected.is_some());
        Ok(selected)
    }

    fn select_step<T>(
        &self,
        interpreter: &mut Interpreter,
        callback: &mut SelectCallback<'_, T>,
    ) -> Result<Option<T>, InterpreterError> {
        match self {
            Selector::Identity => {
                if interpreter.scope_depth() == 0 {
                    return Ok(None);
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
                let selected = callback(interpreter);
                interpreter.swap_scope(old_scope)?;
                selected
            }
            Selector::Literal { item, then } => {
                let literal = item.evaluate(interpreter)?;
                interpreter.with_scope(literal, |interpreter| then.select(interpreter, callback))
            }
            Selector::Get { key, then } => {
                let key = key.evaluate(interpreter)?.into_value();
                self.select_field(interpreter, callback, then, |record| {
                    record.index_of_key(&key)
                })
            }
            Selector::GetAttr { key, then } => {
                let key = Value::Text(key.clone());
                self.select_field(interpreter, callback, then, |record| {
                    record
                        .index_of_key(&key)
                        .filter(|i| record.items()[*i].is_attr())
                })
            }
            Selector::GetItem { index, then } => {
                let index = to_index(index);
                select_each(interpreter, callback, then, |scope| match scope.value() {
                    Value::Record(record) => index
                        .and_then(|i| record.get_item(i))
                        .cloned()
                        .into_iter()
                        .collect(),
                    _ => vec![],
                })
            }
            Selector::Keys(then) => select_each(interpreter, callback, then, |scope| match scope {
                Item::Field(field) => vec![Item::ValueItem(field.key())],
                Item::ValueItem(Value::Record(record)) => record
                    .iter()
                    .filter_map(Item::as_field)
                    .map(|field| Item::ValueItem(field.key()))
                    .collect(),
                _ => vec![],
            }),
            Selector::Values(then) => {
                select_each(interpreter, callback, then, |scope| match scope {
                    Item::Field(field) => vec![Item::ValueItem(field.value().clone())],
                    Item::ValueItem(Value::Record(record)) => {
                        record.iter().map(|item| Item::ValueItem(item.to_value())).collect()
                    }
                    _ => vec![],
                })
            }
            Selector::Children(then) => {
                select_each(interpreter, callback, then, |scope| children(scope))
            }
            Selector::Descendants(then) => {
                if interpreter.scope_depth() == 0 {
                    return Ok(None);
                }
                let scope = interpreter.pop_scope()?;
                let mut selected = Ok(None);
                for child in children(&scope) {
                    selected = interpreter.with_scope(child, |interpreter| {
                        match then.select(interpreter, callback)? {
                            Some(found) => Ok(Some(found)),
                            None => interpreter
                                .descend(|interpreter| self.select(interpreter, callback)),
                        }
                    });
                    if !matches!(selected, Ok(None)) {
                        break;
                    }
                }
                interpreter.push_scope(scope)?;
                selected
            }
            Selector::Filter { predicate, then } => {
                if predicate_holds(predicate, interpreter)? {
                    then.select(interpreter, callback)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Select the value of the field found by `find` in the current scope. If no field is found,
    /// the same selector is tried against the enclosing scopes.
    fn select_field<T, F>(
        &self,
        interpreter: &mut Interpreter,
        callback: &mut SelectCallback<'_, T>,
        then: &Selector,
        find: F,
    ) -> Result<Option<T>, InterpreterError>
    where
        F: Fn(&Record) -> Option<usize>,
    {
        if interpreter.scope_depth() == 0 {
            return Ok(None);
        }
        let scope = interpreter.pop_scope()?;
        let field_value = match scope.value() {
            Value::Record(record) => find(record).map(|i| record.items()[i].to_value()),
            _ => None,
        };
        let selected = match field_value {
            Some(value) => interpreter.with_scope(value, |interpreter| then.select(interpreter, callback)),
            None if interpreter.scope_depth() != 0 => self.select(interpreter, callback),
            None => Ok(None),
        };
        interpreter.push_scope(scope)?;
        selected
    }
}

/// The items of the record in (or in the value of) a scope.
pub(super) fn children(scope: &Item) -> Vec<Item> {
    match scope.value() {
        Value::Record(record) => record.iter().cloned().collect(),
        _ => vec![],
    }
}

/// Run the continuation against each candidate derived from the current scope, stopping at the
/// first to produce a result.
fn select_each<T, F>(
    interpreter: &mut Interpreter,
    callback: &mut SelectCallback<'_, T>,
    then: &Selector,
    candidates: F,
) -> Result<Option<T>, InterpreterError>
where
    F: FnOnce(&Item) -> Vec<Item>,
{
    if interpreter.scope_depth() == 0 {
        return Ok(None);
    }
    let scope = interpreter.pop_scope()?;
    let mut selected = Ok(None);
    for candidate in candidates(&scope) {
        selected = interpreter.with_scope(candidate, |interpreter| then.select(interpreter, callback));
        if !matches!(selected, Ok(None)) {
            break;
        }
    }
    interpreter.push_scope(scope)?;
    selected
}
