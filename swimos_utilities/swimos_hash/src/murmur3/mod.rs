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

//! Incremental Murmur3 (32-bit) hashing. A hash code is computed by repeatedly calling [`mix`]
//! with each component of the value and then finalizing the result with [`mash`].


const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// Mix a 32-bit component into an accumulated hash code.
pub fn mix(code: u32, value: u32) -> u32 {
    let mut value = value.wrapping_mul(C1);
    value = value.rotate_left(15);
    value = value.wrapping_mul(C2);
    let mut code = code ^ value;
    code = code.rotate_left(13);
    code.wrapping_mul(5).wrapping_add(0xe6546b64)
}

/// Finalize an accumulated hash code.
pub fn mash(code: u32) -> u32 {
    let mut code = code;
    code ^= code >> 16;
    code = code.wrapping_mul(0x85ebca6b);
    code ^= code >> 13;
    code = code.wrapping_mul(0xc2b2ae35);
    code ^= code >> 16;
    code
}

/// Mix a 64-bit component as two 32-bit halves (high word first).
pub fn mix_u64(code: u32, value: u64) -> u32 {
    mix(mix(code, (value >> 32) as u32), value as u32)
}

/// Mix a byte slice into an accumulated hash code, four bytes at a time, with the trailing bytes
/// combined into a final partial word.
pub fn mix_bytes(code: u32, bytes: &[u8]) -> u32 {
    let mut code = code;
    let mut chunks = bytes.chunks_exact(4);
    for chunk in &mut chunks {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        code = mix(code, word);
    }
    let rem = chunks.remainder();
    if !rem.is_empty() {
        let mut word = 0u32;
        for (i, b) in rem.iter().enumerate() {
            word |= (*b as u32) << (8 * i);
        }
        let mut k = word.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        code ^= k;
    }
    code ^ (bytes.len() as u32)
}

/// Compute the complete hash of a string, seeded with `seed`.
pub fn hash_str(seed: u32, s: &str) -> u32 {
    mash(mix_bytes(seed, s.as_bytes()))
}

/// Compute a hash code for a 64-bit float. All NaNs hash identically and positive and negative
/// zero hash identically so that the hash is consistent with an equality relation in which `NaN`
/// is equal to itself and `-0.0 == 0.0`.
pub fn hash_f64(value: f64) -> u32 {
    let bits = if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    };
    mash(mix_u64(0, bits))
}
