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

//! The `math` module of the global scope.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use tracing::debug;

use crate::error::InterpreterError;
use crate::expression::InvokeOperator;
use crate::func::{BridgeFunc, Func};
use crate::interpreter::Interpreter;
use crate::item::Item;
use crate::num::Num;
use crate::record::Record;
use crate::value::Value;

/// Default period, in milliseconds, over which `rate` is measured.
pub const DEFAULT_RATE_PERIOD: f64 = 1000.0;

thread_local! {
    static GLOBAL_SCOPE: Record = {
        let mut scope = Record::of([Item::slot("math", math_module())]);
        scope.commit();
        scope
    };
}

/// The (committed) global scope, containing the `math` module.
pub fn global_scope() -> Record {
    GLOBAL_SCOPE.with(Record::clone)
}

/// A record of the math functions, keyed by name.
pub fn math_module() -> Record {
    let funcs = [
        Func::bridge(Extremum::Max),
        Func::bridge(Extremum::Min),
        Func::bridge(UnaryMathFunc::new("abs", Num::abs)),
        Func::bridge(UnaryMathFunc::new("ceil", Num::ceil)),
        Func::bridge(UnaryMathFunc::new("floor", Num::floor)),
        Func::bridge(UnaryMathFunc::new("round", Num::round)),
        Func::bridge(UnaryMathFunc::new("sqrt", Num::sqrt)),
        Func::bridge(PowFunc),
        Func::bridge(RateFunc::default()),
        Func::bridge(RandomFunc),
    ];
    funcs
        .into_iter()
        .filter_map(|func| {
            let name = func.name()?.to_string();
            Some(Item::slot(name, func))
        })
        .collect()
}

/// Evaluate the arguments, producing a list of values.
fn evaluate_args(args: &Value, interpreter: &mut Interpreter) -> Result<Vec<Value>, InterpreterError> {
    Ok(match args.evaluate(interpreter)?.into_value() {
        Value::Record(record) => record.into_iter().map(Item::into_value).collect(),
        Value::Absent => vec![],
        value => vec![value],
    })
}

/// `max` and `min`. With two arguments, the greater (or lesser) of the two under the total order.
/// With a single argument, invoked through an operator, a running extremum over every value the
/// operator has seen.
#[derive(Clone, Copy, Debug)]
pub enum Extremum {
    Max,
    Min,
}

impl Extremum {
    fn choose(&self, current: Value, candidate: Value) -> Value {
        match self {
            Extremum::Max if candidate > current => candidate,
            Extremum::Min if candidate < current => candidate,
            _ => current,
        }
    }
}

impl BridgeFunc for Extremum {
    fn name(&self) -> &str {
        match self {
            Extremum::Max => "max",
            Extremum::Min => "min",
        }
    }

    fn invoke(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        operator: Option<&InvokeOperator>,
    ) -> Result<Item, InterpreterError> {
        let mut args = evaluate_args(args, interpreter)?.into_iter();
        let result = match (args.next(), args.next(), operator) {
            (Some(x), Some(y), _) => self.choose(x, y),
            (Some(x), None, Some(operator)) if x.is_defined() => {
                let next = match operator.state() {
                    Some(current) => self.choose(current, x),
                    None => x,
                };
                debug!(func = self.name(), accumulator = %next, "Updated a running extremum.");
                operator.set_state(next.clone());
                next
            }
            (Some(x), None, _) => x,
            (None, _, _) => Value::Absent,
        };
        Ok(Item::ValueItem(result))
    }
}

/// A function of a single number.
pub struct UnaryMathFunc {
    name: &'static str,
    f: fn(&Num) -> Num,
}

impl UnaryMathFunc {
    pub fn new(name: &'static str, f: fn(&Num) -> Num) -> Self {
        UnaryMathFunc { name, f }
    }
}

impl BridgeFunc for UnaryMathFunc {
    fn name(&self) -> &str {
        self.name
    }

    fn invoke(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        _operator: Option<&InvokeOperator>,
    ) -> Result<Item, InterpreterError> {
        let result = match evaluate_args(args, interpreter)?.first() {
            Some(Value::Num(n)) => Value::Num((self.f)(n)),
            _ => Value::Absent,
        };
        Ok(Item::ValueItem(result))
    }
}

/// `pow(base, exponent)`.
pub struct PowFunc;

impl BridgeFunc for PowFunc {
    fn name(&self) -> &str {
        "pow"
    }

    fn invoke(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        _operator: Option<&InvokeOperator>,
    ) -> Result<Item, InterpreterError> {
        let result = match evaluate_args(args, interpreter)?.as_slice() {
            [Value::Num(base), Value::Num(exponent), ..] => Value::Num(base.pow(exponent)),
            _ => Value::Absent,
        };
        Ok(Item::ValueItem(result))
    }
}

/// `random(lower, upper)`: a number chosen uniformly from `[lower, upper)` (by default `[0, 1)`).
/// Absent if the width of the range is not finite.
pub struct RandomFunc;

impl BridgeFunc for RandomFunc {
    fn name(&self) -> &str {
        "random"
    }

    fn invoke(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        _operator: Option<&InvokeOperator>,
    ) -> Result<Item, InterpreterError> {
        let args = evaluate_args(args, interpreter)?;
        let lower = args.first().map(|v| v.float_value_or(0.0)).unwrap_or(0.0);
        let upper = args.get(1).map(|v| v.float_value_or(1.0)).unwrap_or(1.0);
        if !(upper - lower).is_finite() {
            return Ok(Item::absent());
        }
        let value = if lower < upper {
            rand::thread_rng().gen_range(lower..upper)
        } else {
            lower
        };
        Ok(Item::ValueItem(Value::Num(Num::new(value))))
    }
}

fn system_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// `rate(value, period)`: the rate of change of a value between successive evaluations of the
/// same operator, per `period` milliseconds. The first evaluation yields 0.
pub struct RateFunc {
    clock: fn() -> f64,
}

impl Default for RateFunc {
    fn default() -> Self {
        RateFunc {
            clock: system_millis,
        }
    }
}

impl RateFunc {
    /// Use an alternative source of the current time (in milliseconds).
    pub fn with_clock(clock: fn() -> f64) -> Self {
        RateFunc { clock }
    }
}

impl BridgeFunc for RateFunc {
    fn name(&self) -> &str {
        "rate"
    }

    fn invoke(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        operator: Option<&InvokeOperator>,
    ) -> Result<Item, InterpreterError> {
        let args = evaluate_args(args, interpreter)?;
        let (value, operator) = match (args.first().and_then(Value::float_value), operator) {
            (Some(value), Some(operator)) => (value, operator),
            _ => return Ok(Item::absent()),
        };
        let period = args
            .get(1)
            .map(|v| v.float_value_or(DEFAULT_RATE_PERIOD))
            .unwrap_or(DEFAULT_RATE_PERIOD);
        let now = (self.clock)();
        let rate = match operator.state() {
            Some(state) => {
                let t0 = state.get("t").float_value_or(now);
                let v0 = state.get("v").float_value_or(value);
                let dt = now - t0;
                if dt > 0.0 {
                    period * (value - v0) / dt
                } else {
                    state.get("rate").float_value_or(0.0)
                }
            }
            None => {
                debug!("Reset the accumulator of a rate function.");
                0.0
            }
        };
        let state = Record::of([
            Item::slot("t", now),
            Item::slot("v", value),
            Item::slot("rate", rate),
        ]);
        operator.set_state(Value::Record(state));
        Ok(Item::ValueItem(Value::Num(Num::new(rate))))
    }
}
