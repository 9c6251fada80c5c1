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

//! Path selectors over structural values.
//!
//! A selector is a chain of steps, each with a continuation (`then`), terminated by
//! [`Selector::Identity`]. Selectors are driven by an [`Interpreter`]: the current selection is the
//! scope at the top of its stack. Selecting ([`Selector::for_selected`]) enumerates matches
//! depth-first and stops at the first match for which the callback produces a result.
//! Transforming ([`Selector::map_selected`]) rewrites the matches in place and leaves the
//! rewritten scope at the top of the stack.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use swimos_utilities::hash::murmur3::{mash, mix};

use crate::error::InterpreterError;
use crate::expression::Operator;
use crate::func::Func;
use crate::interpreter::Interpreter;
use crate::item::Item;
use crate::num::Num;
use crate::record::Record;
use crate::text::Text;
use crate::value::Value;

mod select;
mod transform;

#[derive(Clone, Debug, Default)]
pub enum Selector {
    /// The current selection (after evaluation).
    #[default]
    Identity,
    /// A fixed item, evaluated in the current scope, in place of the current selection.
    Literal { item: Box<Item>, then: Box<Selector> },
    /// The value of the last field with a key.
    Get { key: Value, then: Box<Selector> },
    /// The value of the last field with a key if it is an attribute.
    GetAttr { key: Text, then: Box<Selector> },
    /// The item at an index.
    GetItem { index: Num, then: Box<Selector> },
    /// The keys of each field.
    Keys(Box<Selector>),
    /// The value of each item.
    Values(Box<Selector>),
    /// Each item.
    Children(Box<Selector>),
    /// Each item, at every depth, in pre-order.
    Descendants(Box<Selector>),
    /// The current selection if the predicate holds for it.
    Filter {
        predicate: Box<Value>,
        then: Box<Selector>,
    },
}

impl Selector {
    pub fn identity() -> Selector {
        Selector::Identity
    }

    pub fn literal(item: impl Into<Item>) -> Selector {
        Selector::Literal {
            item: Box::new(item.into()),
            then: Box::default(),
        }
    }

    /// The continuation of this step (`None` for [`Selector::Identity`]).
    pub fn then(&self) -> Option<&Selector> {
        match self {
            Selector::Identity => None,
            Selector::Literal { then, .. }
            | Selector::Get { then, .. }
            | Selector::GetAttr { then, .. }
            | Selector::GetItem { then, .. }
            | Selector::Filter { then, .. }
            | Selector::Keys(then)
            | Selector::Values(then)
            | Selector::Children(then)
            | Selector::Descendants(then) => Some(then),
        }
    }

    /// Append a selector to the end of this chain.
    pub fn and_then(self, next: Selector) -> Selector {
        fn chain(then: Box<Selector>, next: Selector) -> Box<Selector> {
            Box::new(then.and_then(next))
        }
        match self {
            Selector::Identity => next,
            Selector::Literal { item, then } => Selector::Literal {
                item,
                then: chain(then, next),
            },
            Selector::Get { key, then } => Selector::Get {
                key,
                then: chain(then, next),
            },
            Selector::GetAttr { key, then } => Selector::GetAttr {
                key,
                then: chain(then, next),
            },
            Selector::GetItem { index, then } => Selector::GetItem {
                index,
                then: chain(then, next),
            },
            Selector::Filter { predicate, then } => Selector::Filter {
                predicate,
                then: chain(then, next),
            },
            Selector::Keys(then) => Selector::Keys(chain(then, next)),
            Selector::Values(then) => Selector::Values(chain(then, next)),
            Selector::Children(then) => Selector::Children(chain(then, next)),
            Selector::Descendants(then) => Selector::Descendants(chain(then, next)),
        }
    }

    /// Select the value of the last field with `key`.
    ///
    /// ```
    /// use swimos_structure::{Interpreter, Item, Record, Selector};
    ///
    /// let inner = Record::of([("b", 42)]);
    /// let mut interpreter = Interpreter::from_scope(Record::of([("a", inner)]));
    ///
    /// let selector = Selector::identity().get("a").get("b");
    /// assert_eq!(selector.evaluate(&mut interpreter), Ok(Item::from(42)));
    /// ```
    pub fn get(self, key: impl Into<Value>) -> Selector {
        self.and_then(Selector::Get {
            key: key.into(),
            then: Box::default(),
        })
    }

    pub fn get_attr(self, key: impl Into<Text>) -> Selector {
        self.and_then(Selector::GetAttr {
            key: key.into(),
            then: Box::default(),
        })
    }

    pub fn get_item(self, index: impl Into<Num>) -> Selector {
        self.and_then(Selector::GetItem {
            index: index.into(),
            then: Box::default(),
        })
    }

    pub fn keys(self) -> Selector {
        self.and_then(Selector::Keys(Box::default()))
    }

    pub fn values(self) -> Selector {
        self.and_then(Selector::Values(Box::default()))
    }

    pub fn children(self) -> Selector {
        self.and_then(Selector::Children(Box::default()))
    }

    pub fn descendants(self) -> Selector {
        self.and_then(Selector::Descendants(Box::default()))
    }

    pub fn filter(self, predicate: impl Into<Value>) -> Selector {
        self.and_then(Selector::Filter {
            predicate: Box::new(predicate.into()),
            then: Box::default(),
        })
    }

    /// An operator invoking the function that this selector resolves to.
    pub fn invoke(self, args: impl Into<Value>) -> Operator {
        Operator::invoke(self, args)
    }

    /// A lambda binding this selector (as a parameter pattern) to a template.
    pub fn lambda(self, template: impl Into<Value>) -> Func {
        Func::lambda(self, template)
    }

    /// Every selection collected into a record and flattened ([`Value::Absent`] if nothing is
    /// selected).
    pub fn evaluate(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        let mut selected = Record::new();
        self.for_selected(interpreter, |interpreter| {
            let scope = interpreter.peek_scope()?;
            if scope.is_defined() {
                selected.push(scope.clone())?;
            }
            Ok(None::<()>)
        })?;
        if selected.is_empty() {
            Ok(Item::absent())
        } else {
            Ok(Item::ValueItem(selected.flattened()))
        }
    }

    /// The evaluated selection if anything is selected and the selector itself otherwise.
    pub fn substitute(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        let result = self.evaluate(interpreter)?;
        if result.is_defined() {
            Ok(result)
        } else {
            Ok(Item::from(self.clone()))
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Selector::Identity => 0,
            Selector::Literal { .. } => 1,
            Selector::Get { .. } => 2,
            Selector::GetAttr { .. } => 3,
            Selector::GetItem { .. } => 4,
            Selector::Keys(_) => 5,
            Selector::Values(_) => 6,
            Selector::Children(_) => 7,
            Selector::Descendants(_) => 8,
            Selector::Filter { .. } => 9,
        }
    }

    pub fn compare(&self, other: &Selector) -> Ordering {
        let head = match (self, other) {
            (Selector::Literal { item: a, .. }, Selector::Literal { item: b, .. }) => a.cmp(b),
            (Selector::Get { key: a, .. }, Selector::Get { key: b, .. }) => a.cmp(b),
            (Selector::GetAttr { key: a, .. }, Selector::GetAttr { key: b, .. }) => a.cmp(b),
            (Selector::GetItem { index: a, .. }, Selector::GetItem { index: b, .. }) => a.cmp(b),
            (
                Selector::Filter { predicate: a, .. },
                Selector::Filter { predicate: b, .. },
            ) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        };
        head.then_with(|| match (self.then(), other.then()) {
            (Some(a), Some(b)) => a.compare(b),
            _ => Ordering::Equal,
        })
    }

    pub fn hash_code(&self) -> u32 {
        let code = mix(0, u32::from(self.rank()));
        let code = match self {
            Selector::Literal { item, .. } => mix(code, item.hash_code()),
            Selector::Get { key, .. } => mix(code, key.hash_code()),
            Selector::GetAttr { key, .. } => mix(code, key.hash_code()),
            Selector::GetItem { index, .. } => mix(code, index.hash_code()),
            Selector::Filter { predicate, .. } => mix(code, predicate.hash_code()),
            _ => code,
        };
        match self.then() {
            Some(then) => mash(mix(code, then.hash_code())),
            None => mash(code),
        }
    }

    fn write_path(&self, f: &mut Formatter<'_>, first: bool) -> std::fmt::Result {
        let sep = if first { "" } else { "." };
        match self {
            Selector::Identity => return Ok(()),
            Selector::Literal { item, .. } => write!(f, "({})", item)?,
            Selector::Get { key, .. } => write!(f, "{}{}", sep, key)?,
            Selector::GetAttr { key, .. } => {
                write!(f, "{}@", sep)?;
                crate::identifier::write_string_literal(key, f)?;
            }
            Selector::GetItem { index, .. } => write!(f, "{}#{}", sep, index)?,
            Selector::Keys(_) => write!(f, "{}*:", sep)?,
            Selector::Values(_) => write!(f, "{}:*", sep)?,
            Selector::Children(_) => write!(f, "{}*", sep)?,
            Selector::Descendants(_) => write!(f, "{}**", sep)?,
            Selector::Filter { predicate, .. } => write!(f, "[{}]", predicate)?,
        }
        match self.then() {
            Some(then) => then.write_path(f, false),
            None => Ok(()),
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Literal { .. } => self.write_path(f, true),
            _ => {
                f.write_str("$")?;
                self.write_path(f, true)
            }
        }
    }
}

/// A non-negative integral index.
fn to_index(index: &Num) -> Option<usize> {
    if index.is_integral() && index.value() >= 0.0 {
        usize::try_from(index.long_value()).ok()
    } else {
        None
    }
}

/// Whether a filter predicate holds in the current scope. A selector predicate holds if it selects
/// anything defined; any other predicate holds if it evaluates to something defined other than
/// `false`.
fn predicate_holds(predicate: &Value, interpreter: &mut Interpreter) -> Result<bool, InterpreterError> {
    if let Value::Expression(expr) = predicate {
        if let crate::expression::Expression::Selector(selector) = expr.as_ref() {
            let found = selector.for_selected(interpreter, |interpreter| {
                Ok(interpreter.peek_scope()?.is_defined().then_some(()))
            })?;
            return Ok(found.is_some());
        }
    }
    let result = predicate.evaluate(interpreter)?;
    Ok(result.is_defined() && !matches!(result.value(), Value::Bool(false)))
}
