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

//! Operators on values and items. Operations that are not meaningful for their operands produce
//! [`Value::Absent`]. If either operand is an unevaluated expression, a deferred operator node is
//! built instead.

use std::cmp::Ordering;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Rem, Sub};

use crate::expression::{BinaryOp, Expression, Operator, UnaryOp};
use crate::item::Item;
use crate::num::Num;
use crate::value::Value;

impl Value {
    /// Apply a binary operator.
    pub fn binary(&self, op: BinaryOp, that: &Value) -> Value {
        if self.is_expression() || that.is_expression() {
            return Value::from(Expression::Operator(Operator::binary(
                op,
                self.clone(),
                that.clone(),
            )));
        }
        match op {
            BinaryOp::Or => {
                if self.is_definite() {
                    self.clone()
                } else {
                    that.clone()
                }
            }
            BinaryOp::And => {
                if self.is_definite() {
                    that.clone()
                } else {
                    self.clone()
                }
            }
            BinaryOp::BitwiseOr => match (self, that) {
                (Value::Num(a), Value::Num(b)) => Value::Num(a.bitwise_or(b)),
                (Value::Bool(a), Value::Bool(b)) => Value::Bool(*a | *b),
                _ => Value::Absent,
            },
            BinaryOp::BitwiseXor => match (self, that) {
                (Value::Num(a), Value::Num(b)) => Value::Num(a.bitwise_xor(b)),
                (Value::Bool(a), Value::Bool(b)) => Value::Bool(*a ^ *b),
                _ => Value::Absent,
            },
            BinaryOp::BitwiseAnd => match (self, that) {
                (Value::Num(a), Value::Num(b)) => Value::Num(a.bitwise_and(b)),
                (Value::Bool(a), Value::Bool(b)) => Value::Bool(*a & *b),
                _ => Value::Absent,
            },
            BinaryOp::LessThan => Value::Bool(self.compare(that) == Ordering::Less),
            BinaryOp::LessThanOrEqual => Value::Bool(self.compare(that) != Ordering::Greater),
            BinaryOp::EqualTo => Value::Bool(self.compare(that) == Ordering::Equal),
            BinaryOp::NotEqualTo => Value::Bool(self.compare(that) != Ordering::Equal),
            BinaryOp::GreaterThanOrEqual => Value::Bool(self.compare(that) != Ordering::Less),
            BinaryOp::GreaterThan => Value::Bool(self.compare(that) == Ordering::Greater),
            BinaryOp::Plus => match (self, that) {
                (Value::Num(a), Value::Num(b)) => Value::Num(a.plus(b)),
                (Value::Text(a), Value::Text(b)) => Value::Text(a.concat(b)),
                (Value::Data(a), Value::Data(b)) => Value::Data(a.concat(b)),
                _ => Value::Absent,
            },
            BinaryOp::Minus => numeric(self, that, |a, b| a.minus(b)),
            BinaryOp::Times => numeric(self, that, |a, b| a.times(b)),
            BinaryOp::Divide => numeric(self, that, |a, b| a.divide(b)),
            BinaryOp::Modulo => numeric(self, that, |a, b| a.modulo(b)),
        }
    }

    /// Apply a unary operator.
    pub fn unary(&self, op: UnaryOp) -> Value {
        if self.is_expression() {
            return Value::from(Expression::Operator(Operator::unary(op, self.clone())));
        }
        match (op, self) {
            (UnaryOp::Not, Value::Absent | Value::Extant | Value::Bool(_)) => {
                Value::Bool(!self.is_definite())
            }
            (UnaryOp::BitwiseNot, Value::Num(n)) => Value::Num(n.bitwise_not()),
            (UnaryOp::BitwiseNot, Value::Bool(b)) => Value::Bool(!*b),
            (UnaryOp::Negative, Value::Num(n)) => Value::Num(n.negative()),
            (UnaryOp::Positive, Value::Num(n)) => Value::Num(*n),
            (UnaryOp::Inverse, Value::Num(n)) => Value::Num(n.inverse()),
            _ => Value::Absent,
        }
    }

    /// `if self then then else otherwise`, choosing on [`Value::is_definite`].
    pub fn conditional(&self, then: &Value, otherwise: &Value) -> Value {
        if self.is_expression() {
            return Value::from(Expression::Operator(Operator::conditional(
                self.clone(),
                then.clone(),
                otherwise.clone(),
            )));
        }
        if self.is_definite() {
            then.clone()
        } else {
            otherwise.clone()
        }
    }

    pub fn plus(&self, that: &Value) -> Value {
        self.binary(BinaryOp::Plus, that)
    }

    pub fn minus(&self, that: &Value) -> Value {
        self.binary(BinaryOp::Minus, that)
    }

    pub fn times(&self, that: &Value) -> Value {
        self.binary(BinaryOp::Times, that)
    }

    pub fn divide(&self, that: &Value) -> Value {
        self.binary(BinaryOp::Divide, that)
    }

    pub fn modulo(&self, that: &Value) -> Value {
        self.binary(BinaryOp::Modulo, that)
    }

    pub fn bitwise_or(&self, that: &Value) -> Value {
        self.binary(BinaryOp::BitwiseOr, that)
    }

    pub fn bitwise_xor(&self, that: &Value) -> Value {
        self.binary(BinaryOp::BitwiseXor, that)
    }

    pub fn bitwise_and(&self, that: &Value) -> Value {
        self.binary(BinaryOp::BitwiseAnd, that)
    }

    pub fn or(&self, that: &Value) -> Value {
        self.binary(BinaryOp::Or, that)
    }

    pub fn and(&self, that: &Value) -> Value {
        self.binary(BinaryOp::And, that)
    }

    pub fn less_than(&self, that: &Value) -> Value {
        self.binary(BinaryOp::LessThan, that)
    }

    pub fn less_than_or_equal(&self, that: &Value) -> Value {
        self.binary(BinaryOp::LessThanOrEqual, that)
    }

    pub fn equal_to(&self, that: &Value) -> Value {
        self.binary(BinaryOp::EqualTo, that)
    }

    pub fn not_equal_to(&self, that: &Value) -> Value {
        self.binary(BinaryOp::NotEqualTo, that)
    }

    pub fn greater_than_or_equal(&self, that: &Value) -> Value {
        self.binary(BinaryOp::GreaterThanOrEqual, that)
    }

    pub fn greater_than(&self, that: &Value) -> Value {
        self.binary(BinaryOp::GreaterThan, that)
    }

    pub fn bitwise_not(&self) -> Value {
        self.unary(UnaryOp::BitwiseNot)
    }

    pub fn not(&self) -> Value {
        self.unary(UnaryOp::Not)
    }

    pub fn negative(&self) -> Value {
        self.unary(UnaryOp::Negative)
    }

    pub fn positive(&self) -> Value {
        self.unary(UnaryOp::Positive)
    }

    pub fn inverse(&self) -> Value {
        self.unary(UnaryOp::Inverse)
    }
}

fn numeric<F>(lhs: &Value, rhs: &Value, f: F) -> Value
where
    F: FnOnce(&Num, &Num) -> Num,
{
    match (lhs, rhs) {
        (Value::Num(a), Value::Num(b)) => Value::Num(f(a, b)),
        _ => Value::Absent,
    }
}

fn is_expression_item(item: &Item) -> bool {
    matches!(item, Item::ValueItem(value) if value.is_expression())
}

impl Item {
    /// Apply a binary operator. An operator applied to a field acts on its value and keeps its
    /// key (collapsing to [`Value::Absent`] if the result is undefined).
    pub fn binary(&self, op: BinaryOp, that: &Item) -> Item {
        if is_expression_item(self) || is_expression_item(that) {
            return Item::from(Expression::Operator(Operator::binary(
                op,
                self.clone(),
                that.clone(),
            )));
        }
        match (self, that) {
            (Item::Field(field), Item::ValueItem(rhs)) => {
                self.with_value(field.value().binary(op, rhs))
            }
            (Item::ValueItem(lhs), Item::ValueItem(rhs)) => Item::ValueItem(lhs.binary(op, rhs)),
            _ => Item::absent(),
        }
    }

    pub fn unary(&self, op: UnaryOp) -> Item {
        match self {
            Item::Field(field) => self.with_value(field.value().unary(op)),
            Item::ValueItem(value) => Item::ValueItem(value.unary(op)),
        }
    }

    pub fn conditional(&self, then: &Item, otherwise: &Item) -> Item {
        if is_expression_item(self) {
            return Item::from(Expression::Operator(Operator::conditional(
                self.clone(),
                then.clone(),
                otherwise.clone(),
            )));
        }
        if self.is_definite() {
            then.clone()
        } else {
            otherwise.clone()
        }
    }

    pub fn plus(&self, that: &Item) -> Item {
        self.binary(BinaryOp::Plus, that)
    }

    pub fn minus(&self, that: &Item) -> Item {
        self.binary(BinaryOp::Minus, that)
    }

    pub fn times(&self, that: &Item) -> Item {
        self.binary(BinaryOp::Times, that)
    }

    pub fn divide(&self, that: &Item) -> Item {
        self.binary(BinaryOp::Divide, that)
    }

    pub fn modulo(&self, that: &Item) -> Item {
        self.binary(BinaryOp::Modulo, that)
    }

    pub fn or(&self, that: &Item) -> Item {
        self.binary(BinaryOp::Or, that)
    }

    pub fn and(&self, that: &Item) -> Item {
        self.binary(BinaryOp::And, that)
    }

    pub fn not(&self) -> Item {
        self.unary(UnaryOp::Not)
    }

    pub fn negative(&self) -> Item {
        self.unary(UnaryOp::Negative)
    }
}

macro_rules! binary_std_op {
    ($($tr:ident, $method:ident, $op:ident);*) => {
        $(
            impl $tr for Value {
                type Output = Value;

                fn $method(self, rhs: Value) -> Value {
                    self.binary(BinaryOp::$op, &rhs)
                }
            }

            impl<'a> $tr<&'a Value> for &'a Value {
                type Output = Value;

                fn $method(self, rhs: &'a Value) -> Value {
                    self.binary(BinaryOp::$op, rhs)
                }
            }
        )*
    };
}

binary_std_op!(
    Add, add, Plus;
    Sub, sub, Minus;
    Mul, mul, Times;
    Div, div, Divide;
    Rem, rem, Modulo;
    BitOr, bitor, BitwiseOr;
    BitXor, bitxor, BitwiseXor;
    BitAnd, bitand, BitwiseAnd
);

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        self.unary(UnaryOp::Negative)
    }
}
