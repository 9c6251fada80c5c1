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

//! # Hashing Utilities
//!
//! - [`murmur3`] provides the incremental 32-bit Murmur3 mixing functions that are used to compute
//!   stable hash codes for structured values (stable across processes, unlike the hashers in the
//!   standard library).
//! - [`HashGenCacheSet`] is a fixed size, generational hash-consing cache that is used to intern
//!   frequently occurring values.

mod cache;
pub mod murmur3;

pub use cache::{CacheStats, HashGenCacheSet};
