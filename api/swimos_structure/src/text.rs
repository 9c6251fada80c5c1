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

use std::cell::{OnceCell, RefCell};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

use swimos_utilities::hash::{murmur3, HashGenCacheSet};

/// Strings of at most this many characters are interned.
pub const MAX_INTERNED_LENGTH: usize = 64;
const CACHE_BUCKETS: usize = 128;
const TEXT_SEED: u32 = 0x5e7a_7e47;

thread_local! {
    static EMPTY: Text = Text(Rc::new(TextInner::new(Box::from(""))));
    static CACHE: RefCell<HashGenCacheSet<Text>> = RefCell::new(HashGenCacheSet::new(CACHE_BUCKETS));
}

struct TextInner {
    value: Box<str>,
    hash: OnceCell<u32>,
}

impl TextInner {
    fn new(value: Box<str>) -> Self {
        TextInner {
            value,
            hash: OnceCell::new(),
        }
    }
}

/// An immutable, reference counted string. Cloning is cheap and the hash code is computed at most
/// once. Short strings are interned through a per-thread generational cache so that repeated keys
/// share a single allocation.
#[derive(Clone)]
pub struct Text(Rc<TextInner>);

impl Text {
    /// Create a new [`Text`], interning it if it is short.
    pub fn new(value: &str) -> Self {
        if value.is_empty() {
            Text::empty()
        } else if value.chars().count() <= MAX_INTERNED_LENGTH {
            let text = Text(Rc::new(TextInner::new(Box::from(value))));
            CACHE.with(|cache| cache.borrow_mut().put(text))
        } else {
            Text(Rc::new(TextInner::new(Box::from(value))))
        }
    }

    /// The (shared) empty text.
    pub fn empty() -> Self {
        EMPTY.with(Clone::clone)
    }

    pub fn as_str(&self) -> &str {
        &self.0.value
    }

    pub fn len(&self) -> usize {
        self.0.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.value.is_empty()
    }

    /// Whether two handles refer to the same underlying allocation.
    pub fn ptr_eq(&self, other: &Text) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The stable hash code of the text (computed lazily).
    pub fn hash_code(&self) -> u32 {
        *self
            .0
            .hash
            .get_or_init(|| murmur3::hash_str(TEXT_SEED, &self.0.value))
    }

    pub fn concat(&self, other: &Text) -> Text {
        if other.is_empty() {
            self.clone()
        } else if self.is_empty() {
            other.clone()
        } else {
            let mut s = String::with_capacity(self.len() + other.len());
            s.push_str(self.as_str());
            s.push_str(other.as_str());
            Text::from(s)
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Text::empty()
    }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_str() == other.as_str()
    }
}

impl Eq for Text {}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialOrd for Text {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Text {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Debug for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self.as_str(), f)
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::new(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Text::empty()
        } else if value.chars().count() <= MAX_INTERNED_LENGTH {
            Text::new(&value)
        } else {
            Text(Rc::new(TextInner::new(value.into_boxed_str())))
        }
    }
}

impl From<&String> for Text {
    fn from(value: &String) -> Self {
        Text::new(value.as_str())
    }
}

impl From<char> for Text {
    fn from(value: char) -> Self {
        let mut buf = [0u8; 4];
        Text::new(value.encode_utf8(&mut buf))
    }
}

impl From<&Text> for Text {
    fn from(value: &Text) -> Self {
        value.clone()
    }
}

impl From<Text> for String {
    fn from(value: Text) -> Self {
        value.as_str().to_owned()
    }
}
