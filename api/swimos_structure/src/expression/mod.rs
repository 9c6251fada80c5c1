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

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use swimos_utilities::hash::murmur3::{mash, mix};

use crate::error::InterpreterError;
use crate::field::{Attr, Field, Slot};
use crate::interpreter::Interpreter;
use crate::item::Item;
use crate::record::Record;
use crate::selector::Selector;
use crate::value::Value;

mod operator;

pub use operator::{BinaryOp, InvokeOperator, Operator, UnaryOp};

/// Precedence of anything that is not an operator (never parenthesized).
pub const PRIMARY_PRECEDENCE: u8 = 12;

const SELECTOR_SEED: u32 = 0x5e1e_c701;
const OPERATOR_SEED: u32 = 0x09e4_a701;

/// An unevaluated value.
#[derive(Clone, Debug)]
pub enum Expression {
    Operator(Operator),
    Selector(Selector),
}

impl Expression {
    /// Evaluate the expression against the scopes of the interpreter.
    pub fn evaluate(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        match self {
            Expression::Operator(operator) => operator.evaluate(interpreter),
            Expression::Selector(selector) => selector.evaluate(interpreter),
        }
    }

    /// Evaluate as much of the expression as possible, returning a new expression for any part
    /// that cannot yet be resolved.
    pub fn substitute(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        match self {
            Expression::Operator(operator) => operator.substitute(interpreter),
            Expression::Selector(selector) => selector.substitute(interpreter),
        }
    }

    /// Binding strength, used only when rendering expressions.
    pub fn precedence(&self) -> u8 {
        match self {
            Expression::Operator(operator) => operator.precedence(),
            Expression::Selector(_) => 11,
        }
    }

    pub(crate) fn type_order(&self) -> u8 {
        match self {
            Expression::Selector(_) => 10,
            Expression::Operator(_) => 20,
        }
    }

    pub fn compare(&self, other: &Expression) -> Ordering {
        match (self, other) {
            (Expression::Operator(a), Expression::Operator(b)) => a.compare(b),
            (Expression::Selector(a), Expression::Selector(b)) => a.compare(b),
            _ => self.type_order().cmp(&other.type_order()),
        }
    }

    pub fn hash_code(&self) -> u32 {
        match self {
            Expression::Operator(operator) => mash(mix(OPERATOR_SEED, operator.hash_code())),
            Expression::Selector(selector) => mash(mix(SELECTOR_SEED, selector.hash_code())),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Operator(operator) => Display::fmt(operator, f),
            Expression::Selector(selector) => Display::fmt(selector, f),
        }
    }
}

impl From<Expression> for Value {
    fn from(expr: Expression) -> Self {
        Value::Expression(Box::new(expr))
    }
}

impl From<Operator> for Value {
    fn from(operator: Operator) -> Self {
        Value::from(Expression::Operator(operator))
    }
}

impl From<Selector> for Value {
    fn from(selector: Selector) -> Self {
        Value::from(Expression::Selector(selector))
    }
}

pub(crate) fn item_precedence(item: &Item) -> u8 {
    match item {
        Item::ValueItem(Value::Expression(expr)) => expr.precedence(),
        _ => PRIMARY_PRECEDENCE,
    }
}

impl Item {
    /// Evaluate the item against the scopes of the interpreter. Fields evaluate their key and
    /// value; constants evaluate to themselves.
    pub fn evaluate(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        match self {
            Item::Field(field) => evaluate_field(field, interpreter, Value::evaluate),
            Item::ValueItem(value) => value.evaluate(interpreter),
        }
    }

    pub fn substitute(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        match self {
            Item::Field(field) => evaluate_field(field, interpreter, Value::substitute),
            Item::ValueItem(value) => value.substitute(interpreter),
        }
    }
}

fn evaluate_field<F>(
    field: &Field,
    interpreter: &mut Interpreter,
    mut eval: F,
) -> Result<Item, InterpreterError>
where
    F: FnMut(&Value, &mut Interpreter) -> Result<Item, InterpreterError>,
{
    match field {
        Field::Attr(attr) => {
            let value = eval(attr.value(), interpreter)?.into_value();
            if value.is_defined() {
                Ok(Item::from(Attr::new(attr.key().clone(), value)))
            } else {
                Ok(Item::absent())
            }
        }
        Field::Slot(slot) => {
            let key = eval(slot.key(), interpreter)?.into_value();
            let value = eval(slot.value(), interpreter)?.into_value();
            if key.is_defined() && value.is_defined() {
                Ok(Item::from(Slot::new(key, value)))
            } else {
                Ok(Item::absent())
            }
        }
    }
}

impl Value {
    /// Evaluate the value against the scopes of the interpreter.
    ///
    /// The items of a record are evaluated in order inside a new scope to which each defined
    /// result is appended, so later items can refer to earlier ones.
    pub fn evaluate(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        match self {
            Value::Expression(expr) => expr.evaluate(interpreter),
            Value::Record(record) if !record.is_constant() => {
                evaluate_record(record, interpreter, Item::evaluate)
            }
            value => Ok(Item::ValueItem(value.clone())),
        }
    }

    pub fn substitute(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        match self {
            Value::Expression(expr) => expr.substitute(interpreter),
            Value::Record(record) if !record.is_constant() => {
                evaluate_record(record, interpreter, Item::substitute)
            }
            value => Ok(Item::ValueItem(value.clone())),
        }
    }
}

impl Record {
    pub fn is_constant(&self) -> bool {
        self.iter().all(|item| match item {
            Item::Field(field) => field.key().is_constant() && field.value().is_constant(),
            Item::ValueItem(value) => value.is_constant(),
        })
    }
}

fn evaluate_record<F>(
    record: &Record,
    interpreter: &mut Interpreter,
    mut eval: F,
) -> Result<Item, InterpreterError>
where
    F: FnMut(&Item, &mut Interpreter) -> Result<Item, InterpreterError>,
{
    interpreter.push_scope(Record::with_capacity(record.len()))?;
    for item in record {
        let result = match eval(item, interpreter) {
            Ok(result) => result,
            Err(err) => {
                interpreter.pop_scope()?;
                return Err(err);
            }
        };
        if result.is_defined() {
            if let Item::ValueItem(Value::Record(scope)) = interpreter.peek_scope_mut()? {
                scope.push(result)?;
            }
        }
    }
    interpreter.pop_scope()
}
