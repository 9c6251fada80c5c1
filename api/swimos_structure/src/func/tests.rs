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

use crate::error::InterpreterError;
use crate::expression::{BinaryOp, InvokeOperator, Operator};
use crate::func::math::{math_module, Extremum, RateFunc};
use crate::func::{global_scope, BridgeFunc, Func};
use crate::interpreter::Interpreter;
use crate::item::Item;
use crate::record::Record;
use crate::selector::Selector;
use crate::value::Value;

fn get(key: &str) -> Selector {
    Selector::identity().get(key)
}

fn math(name: &str) -> Selector {
    get("math").get(name)
}

fn call(func: impl Into<Value>, args: impl Into<Value>) -> Result<Item, InterpreterError> {
    let mut interpreter = Interpreter::of(std::iter::empty::<Item>())?;
    Operator::invoke(func, args).evaluate(&mut interpreter)
}

thread_local! {
    static NOW: Cell<f64> = const { Cell::new(0.0) };
}

fn fake_clock() -> f64 {
    NOW.with(Cell::get)
}

struct Twice;

impl BridgeFunc for Twice {
    fn name(&self) -> &str {
        "twice"
    }

    fn invoke(
        &self,
        args: &Value,
        interpreter: &mut Interpreter,
        _operator: Option<&InvokeOperator>,
    ) -> Result<Item, InterpreterError> {
        let arg = args.evaluate(interpreter)?.into_value();
        Ok(Item::from(arg.times(&Value::from(2))))
    }

    fn expand(
        &self,
        args: &Value,
        _interpreter: &mut Interpreter,
        _operator: Option<&InvokeOperator>,
    ) -> Result<Option<Item>, InterpreterError> {
        Ok(Some(Item::from(Operator::binary(
            BinaryOp::Plus,
            args.clone(),
            args.clone(),
        ))))
    }
}

#[test]
fn global_scope_is_committed() {
    let scope = global_scope();
    assert!(!scope.is_mutable());
    let module = scope.get("math").cloned().unwrap_or_default();
    for name in [
        "max", "min", "abs", "ceil", "floor", "round", "sqrt", "pow", "rate", "random",
    ] {
        assert!(
            matches!(module.get(name), Value::Func(_)),
            "Missing math function: {}",
            name
        );
    }
    assert_eq!(math_module().len(), 10);
}

#[test]
fn unary_math_functions() {
    assert_eq!(call(math("abs"), -3), Ok(Item::of(3)));
    assert_eq!(call(math("ceil"), 2.2), Ok(Item::of(3)));
    assert_eq!(call(math("floor"), 2.7), Ok(Item::of(2)));
    assert_eq!(call(math("round"), 2.5), Ok(Item::of(3)));
    assert_eq!(call(math("round"), -2.5), Ok(Item::of(-2)));
    assert_eq!(call(math("round"), 0.49999999999999994), Ok(Item::of(0)));
    assert_eq!(call(math("round"), -0.5), Ok(Item::of(0)));
    assert_eq!(call(math("round"), -2.6), Ok(Item::of(-3)));
    assert_eq!(call(math("sqrt"), 16), Ok(Item::of(4)));
    assert_eq!(call(math("sqrt"), "x"), Ok(Item::absent()));
    assert_eq!(
        call(math("pow"), Value::from_vec(vec![2, 10])),
        Ok(Item::of(1024))
    );
}

#[test]
fn binary_extrema() {
    let args = Value::from_vec(vec![2, 9]);
    assert_eq!(call(math("max"), args.clone()), Ok(Item::of(9)));
    assert_eq!(call(math("min"), args), Ok(Item::of(2)));
    assert_eq!(call(math("max"), Value::Absent), Ok(Item::absent()));
}

#[test]
fn running_extremum() {
    let mut interpreter = Interpreter::from_scope(Record::of([("x", 3)]));
    let max = Operator::invoke(math("max"), get("x"));

    assert_eq!(max.evaluate(&mut interpreter), Ok(Item::of(3)));
    assert!(interpreter.swap_scope(Record::of([("x", 1)])).is_ok());
    assert_eq!(max.evaluate(&mut interpreter), Ok(Item::of(3)));
    assert!(interpreter.swap_scope(Record::of([("x", 7)])).is_ok());
    assert_eq!(max.evaluate(&mut interpreter), Ok(Item::of(7)));

    match &max {
        Operator::Invoke(invoke) => {
            assert_eq!(invoke.state(), Some(Value::from(7)));
            assert_eq!(invoke.clone().state(), None);
        }
        other => panic!("Unexpected operator: {:?}", other),
    }
}

#[test]
fn rate_of_change() {
    NOW.with(|now| now.set(1000.0));
    let rate = Func::bridge(RateFunc::with_clock(fake_clock));
    let mut interpreter = Interpreter::from_scope(Record::of([("x", 10)]));
    let op = Operator::invoke(rate, get("x"));

    assert_eq!(op.evaluate(&mut interpreter), Ok(Item::of(0)));

    NOW.with(|now| now.set(1500.0));
    assert!(interpreter.swap_scope(Record::of([("x", 20)])).is_ok());
    assert_eq!(op.evaluate(&mut interpreter), Ok(Item::of(20)));

    assert!(interpreter.swap_scope(Record::of([("x", 30)])).is_ok());
    assert_eq!(op.evaluate(&mut interpreter), Ok(Item::of(20)));

    NOW.with(|now| now.set(2500.0));
    let per_second = Operator::invoke(
        Func::bridge(RateFunc::with_clock(fake_clock)),
        Value::from_vec(vec![Value::from(get("x")), Value::from(100)]),
    );
    assert_eq!(per_second.evaluate(&mut interpreter), Ok(Item::of(0)));
}

#[test]
fn rate_requires_an_operator() {
    let mut interpreter = Interpreter::new();
    let rate = Func::bridge(RateFunc::with_clock(fake_clock));
    assert_eq!(
        rate.invoke(&Value::from(1), &mut interpreter, None),
        Ok(Item::absent())
    );
}

#[test]
fn random_within_bounds() {
    for _ in 0..50 {
        let result = call(math("random"), Value::from_vec(vec![5, 6]))
            .map(Item::into_value)
            .ok()
            .and_then(|value| value.float_value());
        assert!(matches!(result, Some(x) if (5.0..6.0).contains(&x)));
    }
    let unit = call(math("random"), Value::Absent)
        .map(Item::into_value)
        .ok()
        .and_then(|value| value.float_value());
    assert!(matches!(unit, Some(x) if (0.0..1.0).contains(&x)));
}

#[test]
fn random_with_unbounded_range_is_absent() {
    let bounds = [
        (0.0, f64::INFINITY),
        (f64::NEG_INFINITY, 0.0),
        (-1e308, 1e308),
        (f64::NAN, 1.0),
    ];
    for (lower, upper) in bounds {
        let result = call(math("random"), Value::from_vec(vec![lower, upper]));
        assert_eq!(result, Ok(Item::absent()));
    }
}

#[test]
fn lambda_with_named_parameter() {
    let double = Func::lambda("x", Operator::binary(BinaryOp::Times, get("x"), 2));
    assert_eq!(call(double.clone(), 21), Ok(Item::of(42)));
    assert_eq!(double.to_string(), "x => $x * 2");
    assert_eq!(double.name(), None);
}

#[test]
fn lambda_with_selector_parameter() {
    let square = get("x").lambda(Operator::binary(BinaryOp::Times, get("x"), get("x")));
    assert_eq!(call(square, 4), Ok(Item::of(16)));
}

#[test]
fn lambda_with_defaults() {
    let bindings = Record::of([Item::of("a"), Item::slot("b", 10)]);
    let sum = Func::lambda(bindings, Operator::binary(BinaryOp::Plus, get("a"), get("b")));
    assert_eq!(call(sum.clone(), Value::from_vec(vec![1])), Ok(Item::of(11)));
    assert_eq!(call(sum, Value::from_vec(vec![1, 2])), Ok(Item::of(3)));
}

#[test]
fn lambda_arguments_are_evaluated_in_caller_scope() {
    let mut interpreter = Interpreter::from_scope(Record::of([("y", 5)]));
    let inc = Func::lambda("x", Operator::binary(BinaryOp::Plus, get("x"), 1));
    let op = Operator::invoke(inc, get("y"));
    assert_eq!(op.evaluate(&mut interpreter), Ok(Item::of(6)));
    assert_eq!(interpreter.scope_depth(), 2);
}

#[test]
fn invoking_a_non_function_is_absent() {
    assert_eq!(call(get("nothing"), 1), Ok(Item::absent()));
    assert_eq!(call(3, 1), Ok(Item::absent()));
}

#[test]
fn native_functions_may_expand() {
    let mut interpreter = Interpreter::new();
    let op = Operator::invoke(Func::bridge(Twice), 4);
    assert_eq!(op.evaluate(&mut interpreter), Ok(Item::of(8)));
    assert_eq!(
        op.substitute(&mut interpreter),
        Ok(Item::from(Operator::binary(BinaryOp::Plus, 4, 4)))
    );
}

#[test]
fn substitution_without_expansion() {
    let mut interpreter = Interpreter::from_scope(Record::of([("y", 5)]));
    let op = Operator::invoke(math("abs"), get("y"));
    assert_eq!(
        op.substitute(&mut interpreter),
        Ok(Item::from(Operator::invoke(math("abs"), 5)))
    );
}

#[test]
fn function_identity() {
    let max = Func::bridge(Extremum::Max);
    let other_max = Func::bridge(Extremum::Max);
    assert_eq!(Value::from(max.clone()), Value::from(max.clone()));
    assert_ne!(Value::from(max.clone()), Value::from(other_max.clone()));
    assert_eq!(max.hash_code(), other_max.hash_code());
    assert_eq!(max.to_string(), "max");
    assert_eq!(max.name(), Some("max"));

    let a = Func::lambda("x", get("x"));
    let b = Func::lambda("x", get("x"));
    assert_eq!(Value::from(a), Value::from(b));
    assert!(Value::from(Func::lambda("x", 1)) < Value::from(max));
}
