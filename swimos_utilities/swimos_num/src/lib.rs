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

/// Create a [`std::num::NonZeroUsize`] from a constant, failing at compile time (in a `const`
/// context) or panicking (otherwise) if the value is zero.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use swimos_num::non_zero_usize;
///
/// const SIZE: NonZeroUsize = non_zero_usize!(1024);
/// assert_eq!(SIZE.get(), 1024);
/// ```
#[macro_export]
macro_rules! non_zero_usize {
    (0) => {
        compile_error!("Must be non-zero")
    };
    ($n:expr) => {
        match std::num::NonZeroUsize::new($n) {
            Some(n) => n,
            None => panic!("Must be non-zero"),
        }
    };
}
