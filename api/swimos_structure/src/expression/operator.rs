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

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use swimos_utilities::hash::murmur3::{mash, mix};

use crate::error::InterpreterError;
use crate::expression::item_precedence;
use crate::interpreter::Interpreter;
use crate::item::Item;
use crate::value::Value;

/// Binary operators, in increasing order of precedence (operators within a group share one).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    LessThan,
    LessThanOrEqual,
    EqualTo,
    NotEqualTo,
    GreaterThanOrEqual,
    GreaterThan,
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitwiseOr => "|",
            BinaryOp::BitwiseXor => "^",
            BinaryOp::BitwiseAnd => "&",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::EqualTo => "==",
            BinaryOp::NotEqualTo => "!=",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 3,
            BinaryOp::And => 4,
            BinaryOp::BitwiseOr => 5,
            BinaryOp::BitwiseXor => 6,
            BinaryOp::BitwiseAnd => 7,
            BinaryOp::LessThan
            | BinaryOp::LessThanOrEqual
            | BinaryOp::EqualTo
            | BinaryOp::NotEqualTo
            | BinaryOp::GreaterThanOrEqual
            | BinaryOp::GreaterThan => 8,
            BinaryOp::Plus | BinaryOp::Minus => 9,
            BinaryOp::Times | BinaryOp::Divide | BinaryOp::Modulo => 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnaryOp {
    Not,
    BitwiseNot,
    Negative,
    Positive,
    Inverse,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitwiseNot => "~",
            UnaryOp::Negative => "-",
            UnaryOp::Positive => "+",
            UnaryOp::Inverse => "/",
        }
    }
}

const CONDITIONAL_PRECEDENCE: u8 = 2;
const UNARY_PRECEDENCE: u8 = 11;

/// An operator node of an expression tree.
#[derive(Clone, Debug)]
pub enum Operator {
    Conditional {
        condition: Item,
        then: Item,
        otherwise: Item,
    },
    Binary {
        op: BinaryOp,
        lhs: Item,
        rhs: Item,
    },
    Unary {
        op: UnaryOp,
        operand: Item,
    },
    Invoke(InvokeOperator),
}

impl Operator {
    pub fn binary(op: BinaryOp, lhs: impl Into<Item>, rhs: impl Into<Item>) -> Self {
        Operator::Binary {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn unary(op: UnaryOp, operand: impl Into<Item>) -> Self {
        Operator::Unary {
            op,
            operand: operand.into(),
        }
    }

    pub fn conditional(
        condition: impl Into<Item>,
        then: impl Into<Item>,
        otherwise: impl Into<Item>,
    ) -> Self {
        Operator::Conditional {
            condition: condition.into(),
            then: then.into(),
            otherwise: otherwise.into(),
        }
    }

    pub fn invoke(func: impl Into<Value>, args: impl Into<Value>) -> Self {
        Operator::Invoke(InvokeOperator::new(func, args))
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Conditional { .. } => CONDITIONAL_PRECEDENCE,
            Operator::Binary { op, .. } => op.precedence(),
            Operator::Unary { .. } | Operator::Invoke(_) => UNARY_PRECEDENCE,
        }
    }

    /// Evaluate the operands and apply the operator. The logical operators and the conditional
    /// only evaluate the operands that they need.
    pub fn evaluate(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        interpreter.will_operate(self);
        let result = match self {
            Operator::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if condition.evaluate(interpreter)?.is_definite() {
                    then.evaluate(interpreter)?
                } else {
                    otherwise.evaluate(interpreter)?
                }
            }
            Operator::Binary {
                op: BinaryOp::Or,
                lhs,
                rhs,
            } => {
                let lhs = lhs.evaluate(interpreter)?;
                if lhs.is_definite() {
                    lhs
                } else {
                    rhs.evaluate(interpreter)?
                }
            }
            Operator::Binary {
                op: BinaryOp::And,
                lhs,
                rhs,
            } => {
                let lhs = lhs.evaluate(interpreter)?;
                if lhs.is_definite() {
                    rhs.evaluate(interpreter)?
                } else {
                    lhs
                }
            }
            Operator::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(interpreter)?;
                let rhs = rhs.evaluate(interpreter)?;
                lhs.binary(*op, &rhs)
            }
            Operator::Unary { op, operand } => operand.evaluate(interpreter)?.unary(*op),
            Operator::Invoke(invoke) => invoke.evaluate(interpreter)?,
        };
        interpreter.did_operate(self, &result);
        Ok(result)
    }

    /// Substitute the operands, folding the operator away if they are all resolved.
    pub fn substitute(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        match self {
            Operator::Conditional {
                condition,
                then,
                otherwise,
            } => {
                let condition = condition.substitute(interpreter)?;
                let then = then.substitute(interpreter)?;
                let otherwise = otherwise.substitute(interpreter)?;
                Ok(condition.conditional(&then, &otherwise))
            }
            Operator::Binary { op, lhs, rhs } => {
                let lhs = lhs.substitute(interpreter)?;
                let rhs = rhs.substitute(interpreter)?;
                Ok(lhs.binary(*op, &rhs))
            }
            Operator::Unary { op, operand } => {
                Ok(operand.substitute(interpreter)?.unary(*op))
            }
            Operator::Invoke(invoke) => invoke.substitute(interpreter),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Operator::Conditional { .. } => 0,
            Operator::Binary { .. } => 1,
            Operator::Unary { .. } => 2,
            Operator::Invoke(_) => 3,
        }
    }

    pub fn compare(&self, other: &Operator) -> Ordering {
        match (self, other) {
            (
                Operator::Conditional {
                    condition: c1,
                    then: t1,
                    otherwise: o1,
                },
                Operator::Conditional {
                    condition: c2,
                    then: t2,
                    otherwise: o2,
                },
            ) => c1.cmp(c2).then_with(|| t1.cmp(t2)).then_with(|| o1.cmp(o2)),
            (
                Operator::Binary {
                    op: op1,
                    lhs: l1,
                    rhs: r1,
                },
                Operator::Binary {
                    op: op2,
                    lhs: l2,
                    rhs: r2,
                },
            ) => op1
                .cmp(op2)
                .then_with(|| l1.cmp(l2))
                .then_with(|| r1.cmp(r2)),
            (
                Operator::Unary {
                    op: op1,
                    operand: o1,
                },
                Operator::Unary {
                    op: op2,
                    operand: o2,
                },
            ) => op1.cmp(op2).then_with(|| o1.cmp(o2)),
            (Operator::Invoke(a), Operator::Invoke(b)) => a
                .func
                .cmp(&b.func)
                .then_with(|| a.args.cmp(&b.args)),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn hash_code(&self) -> u32 {
        let code = match self {
            Operator::Conditional {
                condition,
                then,
                otherwise,
            } => mix(
                mix(mix(0, condition.hash_code()), then.hash_code()),
                otherwise.hash_code(),
            ),
            Operator::Binary { op, lhs, rhs } => mix(
                mix(mix(1, *op as u32), lhs.hash_code()),
                rhs.hash_code(),
            ),
            Operator::Unary { op, operand } => mix(mix(2, *op as u32), operand.hash_code()),
            Operator::Invoke(invoke) => {
                mix(mix(3, invoke.func.hash_code()), invoke.args.hash_code())
            }
        };
        mash(code)
    }
}

/// Application of a function to arguments.
///
/// Unlike every other node, an invocation carries mutable state that persists between
/// evaluations of the same node. Stateful functions (such as `rate` or a running `max`) keep
/// their accumulators here. Cloning the node produces a fresh, empty state.
#[derive(Debug)]
pub struct InvokeOperator {
    func: Value,
    args: Value,
    state: RefCell<Option<Value>>,
}

impl Clone for InvokeOperator {
    fn clone(&self) -> Self {
        InvokeOperator::new(self.func.clone(), self.args.clone())
    }
}

impl InvokeOperator {
    pub fn new(func: impl Into<Value>, args: impl Into<Value>) -> Self {
        InvokeOperator {
            func: func.into(),
            args: args.into(),
            state: RefCell::new(None),
        }
    }

    pub fn func(&self) -> &Value {
        &self.func
    }

    pub fn args(&self) -> &Value {
        &self.args
    }

    pub fn state(&self) -> Option<Value> {
        self.state.borrow().clone()
    }

    pub fn set_state(&self, state: Value) {
        self.state.replace(Some(state));
    }

    pub fn clear_state(&self) {
        self.state.replace(None);
    }

    /// Resolve the function and invoke it; anything that does not resolve to a function
    /// evaluates to [`Value::Absent`].
    pub fn evaluate(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        match self.func.evaluate(interpreter)?.into_value() {
            Value::Func(func) => func.invoke(&self.args, interpreter, Some(self)),
            _ => Ok(Item::absent()),
        }
    }

    /// Allow the function to expand itself in place; otherwise substitute the arguments.
    pub fn substitute(&self, interpreter: &mut Interpreter) -> Result<Item, InterpreterError> {
        if let Value::Func(func) = self.func.evaluate(interpreter)?.into_value() {
            if let Some(expanded) = func.expand(&self.args, interpreter, Some(self))? {
                return Ok(expanded);
            }
        }
        let args = self.args.substitute(interpreter)?.into_value();
        Ok(Item::from(Operator::invoke(self.func.clone(), args)))
    }
}

fn write_operand(item: &Item, precedence: u8, f: &mut Formatter<'_>) -> std::fmt::Result {
    if item_precedence(item) < precedence {
        write!(f, "({})", item)
    } else {
        Display::fmt(item, f)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let precedence = self.precedence();
        match self {
            Operator::Conditional {
                condition,
                then,
                otherwise,
            } => {
                write_operand(condition, precedence + 1, f)?;
                f.write_str(" ? ")?;
                write_operand(then, precedence, f)?;
                f.write_str(" : ")?;
                write_operand(otherwise, precedence, f)
            }
            Operator::Binary { op, lhs, rhs } => {
                write_operand(lhs, precedence, f)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(rhs, precedence + 1, f)
            }
            Operator::Unary { op, operand } => {
                f.write_str(op.symbol())?;
                write_operand(operand, precedence, f)
            }
            Operator::Invoke(invoke) => {
                write!(f, "{}(", invoke.func)?;
                match &invoke.args {
                    Value::Record(record) => crate::value::write_items(record.items(), f)?,
                    args => Display::fmt(args, f)?,
                }
                f.write_str(")")
            }
        }
    }
}
