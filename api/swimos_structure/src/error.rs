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

use thiserror::Error;

/// Errors raised when a value cannot be converted to or from a structural representation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A native value of a type that has no structural representation.
    #[error("A value of type {type_name} cannot be converted into a structural value.")]
    Unsupported { type_name: &'static str },
    /// A structural value did not have the kind that was required.
    #[error("Expected a value of kind {expected} but found {found}.")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Programmer contract violations on structures. Semantic mismatches (adding a number to a record,
/// looking up a missing key, etc.) are not errors and produce [`crate::Value::Absent`] instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StructureError {
    /// An attempt to modify a record or field that has been committed.
    #[error("The structure has been committed and can no longer be modified.")]
    Immutable,
    /// An explicit index (or range) was outside the bounds of a record.
    #[error("Index {index} is out of range for a record of length {length}.")]
    IndexOutOfRange { index: usize, length: usize },
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Failures of the interpreter. These are distinct from structural errors as they indicate either
/// a runaway (or malicious) expression or misuse of the interpreter.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InterpreterError {
    /// A scope was pushed when the stack was already at its maximum depth.
    #[error("The scope stack overflowed its maximum depth of {max_depth}.")]
    StackOverflow { max_depth: usize },
    /// A scope was requested from an empty stack.
    #[error("The scope stack is empty.")]
    StackEmpty,
    /// A scope was requested by an index that is not on the stack.
    #[error("There is no scope at index {index} (the stack has depth {depth}).")]
    ScopeOutOfRange { index: usize, depth: usize },
    /// A structural error occurred while transforming a scope.
    #[error(transparent)]
    Structure(#[from] StructureError),
}
