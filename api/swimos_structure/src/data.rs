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

use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine};
use bytes::{BufMut, Bytes, BytesMut};
use swimos_utilities::hash::murmur3;

const DATA_SEED: u32 = 0xda7a_0001;

/// An immutable binary blob. Rendered (for debugging) in base-64, prefixed with `%`.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Data(Bytes);

impl Data {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Data(bytes.into())
    }

    pub fn empty() -> Self {
        Data::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn concat(&self, other: &Data) -> Data {
        let mut buffer = BytesMut::with_capacity(self.len() + other.len());
        buffer.put_slice(self.as_bytes());
        buffer.put_slice(other.as_bytes());
        Data(buffer.freeze())
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }

    pub fn from_base64(encoded: impl AsRef<[u8]>) -> Result<Data, DecodeError> {
        STANDARD.decode(encoded).map(Data::new)
    }

    pub fn hash_code(&self) -> u32 {
        murmur3::mash(murmur3::mix_bytes(DATA_SEED, self.as_bytes()))
    }
}

impl Hash for Data {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl Display for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.to_base64())
    }
}

impl Debug for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Data({})", self)
    }
}

impl From<Vec<u8>> for Data {
    fn from(value: Vec<u8>) -> Self {
        Data(Bytes::from(value))
    }
}

impl From<&[u8]> for Data {
    fn from(value: &[u8]) -> Self {
        Data(Bytes::copy_from_slice(value))
    }
}

impl From<Bytes> for Data {
    fn from(value: Bytes) -> Self {
        Data(value)
    }
}
