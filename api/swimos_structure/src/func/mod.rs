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
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use swimos_utilities::hash::murmur3::{hash_str, mash, mix};

use crate::error::InterpreterError;
use crate::expression::{Expression, InvokeOperator};
use crate::field::{Field, Slot};
use crate::interpreter::Interpreter;
use crate::item::Item;
use crate::record::Record;
use crate::selector::Selector;
use crate::value::Value;

pub mod math;
#[cfg(test)]
mod tests;

pub use math::global_scope;

const LAMBDA_SEED: u32 = 0x1a3b_da01;
const BRIDGE_SEED: u32 = 0xb41d_9e01;

/// A function implemented natively.
pub trait BridgeFunc {
    /// The name of the function, used for rendering, ordering and hashing.
    fn name(&self) -> &str;

    /// Invoke the function. The arguments are passed unevaluated. When invoked through an operator
    /// node, `operator` gives access to the state stored on that node.
    fn invoke(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        operator: Option<&InvokeOperator>,
    ) -> Result<Item, InterpreterError>;

    /// Optionally replace an invocation with an equivalent expression during substitution.
    fn expand(
        &self,
        _args: &Value,
        _interpreter: &mut Interpreter,
        _operator: Option<&InvokeOperator>,
    ) -> Result<Option<Item>, InterpreterError> {
        Ok(None)
    }
}

/// A function defined by a parameter pattern and a template.
///
/// The bindings are either a single parameter (a name or a `$name` selector) or a record of
/// parameters. A parameter may be given a default (for when the argument is missing) by binding
/// it as a slot: `name: default`.
#[derive(Clone, Debug)]
pub struct LambdaFunc {
    bindings: Value,
    template: Value,
}

impl LambdaFunc {
    pub fn new(bindings: impl Into<Value>, template: impl Into<Value>) -> Self {
        LambdaFunc {
            bindings: bindings.into(),
            template: template.into(),
        }
    }

    pub fn bindings(&self) -> &Value {
        &self.bindings
    }

    pub fn template(&self) -> &Value {
        &self.template
    }

    fn bind(&self, args: &Value, interpreter: &mut Interpreter) -> Result<Record, InterpreterError> {
        let mut params = Record::new();
        match &self.bindings {
            Value::Record(bindings) => {
                let args = match args {
                    Value::Record(args) => args.clone(),
                    Value::Absent => Record::new(),
                    arg => Record::of([arg.clone()]),
                };
                for (i, binding) in bindings.iter().enumerate() {
                    let arg = match args.get_item(i) {
                        Some(arg) => arg.evaluate(interpreter)?.into_value(),
                        None => Value::Absent,
                    };
                    bind_param(&mut params, binding, arg)?;
                }
            }
            binding => {
                let arg = args.evaluate(interpreter)?.into_value();
                bind_param(&mut params, &Item::ValueItem(binding.clone()), arg)?;
            }
        }
        Ok(params)
    }

    fn invoke(&self, args: &Value, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        let params = self.bind(args, interpreter)?;
        interpreter.push_scope(params)?;
        let result = self.template.evaluate(interpreter);
        interpreter.pop_scope()?;
        result
    }
}

fn bind_param(params: &mut Record, binding: &Item, arg: Value) -> Result<(), InterpreterError> {
    match binding {
        Item::ValueItem(Value::Text(name)) => {
            params.push(Slot::new(name.clone(), arg))?;
        }
        Item::ValueItem(Value::Expression(expr)) => {
            if let Some(name) = param_name(expr) {
                params.push(Slot::new(name, arg))?;
            }
        }
        Item::Field(Field::Slot(slot)) => {
            let value = if arg.is_defined() {
                arg
            } else {
                slot.value().clone()
            };
            params.push(Slot::new(slot.key().clone(), value))?;
        }
        _ => {}
    }
    Ok(())
}

/// A parameter written as a selector of a single key (`$x`).
fn param_name(expr: &Expression) -> Option<Value> {
    match expr {
        Expression::Selector(Selector::Get { key, then }) if then.then().is_none() => {
            Some(key.clone())
        }
        _ => None,
    }
}

/// A callable value.
#[derive(Clone)]
pub enum Func {
    Lambda(Rc<LambdaFunc>),
    Bridge(Rc<dyn BridgeFunc>),
}

impl Func {
    pub fn lambda(bindings: impl Into<Value>, template: impl Into<Value>) -> Self {
        Func::Lambda(Rc::new(LambdaFunc::new(bindings, template)))
    }

    pub fn bridge<F: BridgeFunc + 'static>(func: F) -> Self {
        Func::Bridge(Rc::new(func))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Func::Lambda(_) => None,
            Func::Bridge(func) => Some(func.name()),
        }
    }

    pub fn invoke(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        operator: Option<&InvokeOperator>,
    ) -> Result<Item, InterpreterError> {
        match self {
            Func::Lambda(lambda) => lambda.invoke(args, interpreter),
            Func::Bridge(func) => func.invoke(args, interpreter, operator),
        }
    }

    pub fn expand(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        operator: Option<&InvokeOperator>,
    ) -> Result<Option<Item>, InterpreterError> {
        match self {
            Func::Lambda(_) => Ok(None),
            Func::Bridge(func) => func.expand(args, interpreter, operator),
        }
    }

    /// Lambdas are ordered structurally; native functions by name and then by identity.
    pub fn compare(&self, other: &Func) -> Ordering {
        match (self, other) {
            (Func::Lambda(a), Func::Lambda(b)) => a
                .bindings
                .cmp(&b.bindings)
                .then_with(|| a.template.cmp(&b.template)),
            (Func::Bridge(a), Func::Bridge(b)) => a.name().cmp(b.name()).then_with(|| {
                (Rc::as_ptr(a) as *const () as usize).cmp(&(Rc::as_ptr(b) as *const () as usize))
            }),
            (Func::Lambda(_), Func::Bridge(_)) => Ordering::Less,
            (Func::Bridge(_), Func::Lambda(_)) => Ordering::Greater,
        }
    }

    pub fn hash_code(&self) -> u32 {
        match self {
            Func::Lambda(lambda) => mash(mix(
                mix(LAMBDA_SEED, lambda.bindings.hash_code()),
                lambda.template.hash_code(),
            )),
            Func::Bridge(func) => hash_str(BRIDGE_SEED, func.name()),
        }
    }
}

impl Debug for Func {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Func::Lambda(lambda) => f.debug_tuple("Lambda").field(lambda).finish(),
            Func::Bridge(func) => f.debug_tuple("Bridge").field(&func.name()).finish(),
        }
    }
}

impl Display for Func {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Func::Lambda(lambda) => write!(f, "{} => {}", lambda.bindings, lambda.template),
            Func::Bridge(func) => f.write_str(func.name()),
        }
    }
}

impl From<Func> for Value {
    fn from(func: Func) -> Self {
        Value::Func(func)
    }
}

impl From<LambdaFunc> for Func {
    fn from(lambda: LambdaFunc) -> Self {
        Func::Lambda(Rc::new(lambda))
    }
}
