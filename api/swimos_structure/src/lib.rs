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

//! Structured values for SwimOS: a dynamically typed data model of scalars and records of
//! attributes and slots, an expression language over that model, selectors that navigate and
//! rewrite records and an interpreter that evaluates all of these against a stack of scopes.

mod convert;
mod data;
mod error;
mod expression;
mod field;
mod func;
pub mod identifier;
mod interpreter;
mod item;
#[macro_use]
pub mod macros;
mod num;
mod record;
mod selector;
mod text;
mod value;

pub use data::Data;
pub use error::{ConversionError, InterpreterError, StructureError};
pub use expression::{BinaryOp, Expression, InvokeOperator, Operator, UnaryOp};
pub use field::{Attr, Field, FieldState, Slot};
pub use func::{global_scope, math, BridgeFunc, Func, LambdaFunc};
pub use interpreter::{Interpreter, InterpreterObserver, InterpreterSettings};
pub use item::Item;
pub use num::{Num, NumKind};
pub use record::{Record, RecordMapView, RecordState};
pub use selector::Selector;
pub use text::Text;
pub use value::{type_order, Value, ValueKind};
