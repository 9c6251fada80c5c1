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

use std::num::NonZeroUsize;

use swimos_utilities::non_zero_usize;

const DEFAULT_MAX_SCOPE_DEPTH: NonZeroUsize = non_zero_usize!(1024);
const DEFAULT_INITIAL_CAPACITY: usize = 0;

/// Configuration for an [`super::Interpreter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterSettings {
    /// The maximum number of scopes on the stack. Pushing beyond this fails with a stack overflow
    /// rather than recursing without bound.
    pub max_scope_depth: NonZeroUsize,
    /// The number of scopes to allocate space for up front.
    pub initial_capacity: usize,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            max_scope_depth: DEFAULT_MAX_SCOPE_DEPTH,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}
