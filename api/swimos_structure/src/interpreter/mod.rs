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

use std::fmt::{Debug, Formatter};

use tracing::{trace, warn};

use crate::error::InterpreterError;
use crate::expression::Operator;
use crate::func::global_scope;
use crate::item::Item;
use crate::selector::Selector;

mod config;

pub use config::InterpreterSettings;

const MIN_STACK_CAPACITY: usize = 32;

/// Hooks called as an interpreter evaluates operators and drives selectors. Observers see the
/// traversal but cannot alter it.
pub trait InterpreterObserver {
    fn will_operate(&mut self, _operator: &Operator) {}

    fn did_operate(&mut self, _operator: &Operator, _result: &Item) {}

    fn will_select(&mut self, _selector: &Selector) {}

    fn did_select(&mut self, _selector: &Selector, _found: bool) {}

    fn will_transform(&mut self, _selector: &Selector) {}

    fn did_transform(&mut self, _selector: &Selector, _result: &Item) {}
}

/// Evaluation context for expressions and selectors: a bounded stack of scopes. The scope at the
/// top of the stack is the current selection.
#[derive(Default)]
pub struct Interpreter {
    scope_stack: Vec<Item>,
    /// Levels of a traversal that replace the scope at the top of the stack rather than pushing
    /// above it. They count towards the maximum depth.
    descent: usize,
    settings: InterpreterSettings,
    observer: Option<Box<dyn InterpreterObserver>>,
}

impl Debug for Interpreter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("scope_stack", &self.scope_stack)
            .field("descent", &self.descent)
            .field("settings", &self.settings)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl Interpreter {
    /// An interpreter with an empty stack.
    pub fn new() -> Self {
        Interpreter::with_settings(InterpreterSettings::default())
    }

    pub fn with_settings(settings: InterpreterSettings) -> Self {
        Interpreter {
            scope_stack: Vec::with_capacity(settings.initial_capacity),
            descent: 0,
            settings,
            observer: None,
        }
    }

    /// An interpreter with the global scope at the bottom of the stack followed by each of the
    /// given scopes.
    pub fn of<I, T>(scopes: I) -> Result<Self, InterpreterError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        let mut interpreter = Interpreter::new();
        interpreter.push_scope(global_scope())?;
        for scope in scopes {
            interpreter.push_scope(scope)?;
        }
        Ok(interpreter)
    }

    /// An interpreter with the global scope at the bottom of the stack and `scope` above it.
    pub fn from_scope(scope: impl Into<Item>) -> Self {
        let mut scope_stack = Vec::with_capacity(MIN_STACK_CAPACITY);
        scope_stack.push(Item::from(global_scope()));
        scope_stack.push(scope.into());
        Interpreter {
            scope_stack,
            descent: 0,
            settings: InterpreterSettings::default(),
            observer: None,
        }
    }

    /// Attach an observer of the evaluation.
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: InterpreterObserver + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn settings(&self) -> &InterpreterSettings {
        &self.settings
    }

    pub fn scope_depth(&self) -> usize {
        self.scope_stack.len()
    }

    fn check_depth(&self) -> Result<(), InterpreterError> {
        let max_depth = self.settings.max_scope_depth.get();
        if self.scope_stack.len() + self.descent >= max_depth {
            warn!(max_depth, "The scope stack of an interpreter overflowed.");
            Err(InterpreterError::StackOverflow { max_depth })
        } else {
            Ok(())
        }
    }

    pub fn push_scope(&mut self, scope: impl Into<Item>) -> Result<(), InterpreterError> {
        self.check_depth()?;
        let depth = self.scope_stack.len();
        let max_depth = self.settings.max_scope_depth.get();
        if depth == self.scope_stack.capacity() {
            let capacity = (depth + 1)
                .max(MIN_STACK_CAPACITY)
                .next_power_of_two()
                .min(max_depth);
            trace!(depth, capacity, "Growing the scope stack of an interpreter.");
            self.scope_stack.reserve_exact(capacity - depth);
        }
        self.scope_stack.push(scope.into());
        Ok(())
    }

    pub fn pop_scope(&mut self) -> Result<Item, InterpreterError> {
        self.scope_stack.pop().ok_or(InterpreterError::StackEmpty)
    }

    pub fn peek_scope(&self) -> Result<&Item, InterpreterError> {
        self.scope_stack.last().ok_or(InterpreterError::StackEmpty)
    }

    pub fn peek_scope_mut(&mut self) -> Result<&mut Item, InterpreterError> {
        self.scope_stack.last_mut().ok_or(InterpreterError::StackEmpty)
    }

    /// Replace the scope at the top of the stack, returning the previous scope.
    pub fn swap_scope(&mut self, scope: impl Into<Item>) -> Result<Item, InterpreterError> {
        let top = self.peek_scope_mut()?;
        Ok(std::mem::replace(top, scope.into()))
    }

    /// The scope at `index` (counting from the bottom of the stack).
    pub fn get_scope(&self, index: usize) -> Result<&Item, InterpreterError> {
        self.scope_stack
            .get(index)
            .ok_or(InterpreterError::ScopeOutOfRange {
                index,
                depth: self.scope_stack.len(),
            })
    }

    /// Run `f` with `scope` pushed onto the stack, popping it again afterwards.
    pub fn with_scope<R, F>(&mut self, scope: impl Into<Item>, f: F) -> Result<R, InterpreterError>
    where
        F: FnOnce(&mut Interpreter) -> Result<R, InterpreterError>,
    {
        self.push_scope(scope)?;
        let result = f(self);
        self.pop_scope()?;
        result
    }

    /// Run `f` one level deeper into a traversal that keeps the depth of the stack constant.
    pub(crate) fn descend<R, F>(&mut self, f: F) -> Result<R, InterpreterError>
    where
        F: FnOnce(&mut Interpreter) -> Result<R, InterpreterError>,
    {
        self.check_depth()?;
        self.descent += 1;
        let result = f(self);
        self.descent -= 1;
        result
    }

    pub(crate) fn will_operate(&mut self, operator: &Operator) {
        if let Some(observer) = &mut self.observer {
            observer.will_operate(operator);
        }
    }

    pub(crate) fn did_operate(&mut self, operator: &Operator, result: &Item) {
        if let Some(observer) = &mut self.observer {
            observer.did_operate(operator, result);
        }
    }

    pub(crate) fn will_select(&mut self, selector: &Selector) {
        if let Some(observer) = &mut self.observer {
            observer.will_select(selector);
        }
    }

    pub(crate) fn did_select(&mut self, selector: &Selector, found: bool) {
        if let Some(observer) = &mut self.observer {
            observer.did_select(selector, found);
        }
    }

    pub(crate) fn will_transform(&mut self, selector: &Selector) {
        if let Some(observer) = &mut self.observer {
            observer.will_transform(selector);
        }
    }

    pub(crate) fn did_transform(&mut self, selector: &Selector, result: &Item) {
        if let Some(observer) = &mut self.observer {
            observer.did_transform(selector, result);
        }
    }
}
