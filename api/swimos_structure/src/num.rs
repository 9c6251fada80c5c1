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

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use swimos_utilities::hash::murmur3;

/// The numeric kind of a [`Num`]. All numbers are stored as 64-bit floats; the kind records that a
/// number originated as an unsigned integer so that it can be extracted again without loss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NumKind {
    #[default]
    Float,
    UInt32,
    UInt64,
}

/// A number. Equality treats all NaNs as equal to one another (and `-0.0` as equal to `0.0`) and
/// ordering places NaN above every other number, so that numbers are totally ordered and can be
/// used as keys.
#[derive(Clone, Copy, Debug)]
pub struct Num {
    value: f64,
    kind: NumKind,
}

impl Num {
    pub const fn new(value: f64) -> Self {
        Num {
            value,
            kind: NumKind::Float,
        }
    }

    pub const fn uint32(value: u32) -> Self {
        Num {
            value: value as f64,
            kind: NumKind::UInt32,
        }
    }

    pub const fn uint64(value: u64) -> Self {
        Num {
            value: value as f64,
            kind: NumKind::UInt64,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn kind(&self) -> NumKind {
        self.kind
    }

    pub fn is_uint32(&self) -> bool {
        self.kind == NumKind::UInt32
    }

    pub fn is_uint64(&self) -> bool {
        self.kind == NumKind::UInt64
    }

    pub fn is_nan(&self) -> bool {
        self.value.is_nan()
    }

    /// Whether the number has no fractional part.
    pub fn is_integral(&self) -> bool {
        self.value.is_finite() && self.value.fract() == 0.0
    }

    pub fn int_value(&self) -> i32 {
        self.value as i32
    }

    pub fn long_value(&self) -> i64 {
        self.value as i64
    }

    pub fn uint32_value(&self) -> u32 {
        self.value as u32
    }

    pub fn uint64_value(&self) -> u64 {
        self.value as u64
    }

    pub fn hash_code(&self) -> u32 {
        murmur3::hash_f64(self.value)
    }

    /// Total comparison in which NaN is greater than every other number (and equal to itself).
    pub fn compare(&self, other: &Num) -> Ordering {
        let (x, y) = (self.value, other.value);
        match (x.is_nan(), y.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        }
    }

    pub fn plus(&self, other: &Num) -> Num {
        Num::new(self.value + other.value)
    }

    pub fn minus(&self, other: &Num) -> Num {
        Num::new(self.value - other.value)
    }

    pub fn times(&self, other: &Num) -> Num {
        Num::new(self.value * other.value)
    }

    pub fn divide(&self, other: &Num) -> Num {
        Num::new(self.value / other.value)
    }

    pub fn modulo(&self, other: &Num) -> Num {
        Num::new(self.value % other.value)
    }

    pub fn bitwise_or(&self, other: &Num) -> Num {
        self.bitwise(other, |x, y| x | y)
    }

    pub fn bitwise_xor(&self, other: &Num) -> Num {
        self.bitwise(other, |x, y| x ^ y)
    }

    pub fn bitwise_and(&self, other: &Num) -> Num {
        self.bitwise(other, |x, y| x & y)
    }

    pub fn bitwise_not(&self) -> Num {
        self.with_kind(Num::new(!self.long_value() as f64))
    }

    pub fn negative(&self) -> Num {
        Num::new(-self.value)
    }

    pub fn inverse(&self) -> Num {
        Num::new(1.0 / self.value)
    }

    pub fn abs(&self) -> Num {
        self.with_kind(Num::new(self.value.abs()))
    }

    pub fn ceil(&self) -> Num {
        self.with_kind(Num::new(self.value.ceil()))
    }

    pub fn floor(&self) -> Num {
        self.with_kind(Num::new(self.value.floor()))
    }

    /// Round to the nearest integer with ties rounded towards positive infinity.
    pub fn round(&self) -> Num {
        let value = self.value;
        let nearest = value.round();
        let rounded = if value - nearest == 0.5 {
            nearest + 1.0
        } else {
            nearest
        };
        self.with_kind(Num::new(rounded))
    }

    pub fn sqrt(&self) -> Num {
        Num::new(self.value.sqrt())
    }

    pub fn pow(&self, exponent: &Num) -> Num {
        Num::new(self.value.powf(exponent.value))
    }

    fn bitwise<F>(&self, other: &Num, f: F) -> Num
    where
        F: FnOnce(i64, i64) -> i64,
    {
        let result = Num::new(f(self.long_value(), other.long_value()) as f64);
        if self.kind == other.kind {
            self.with_kind(result)
        } else {
            result
        }
    }

    fn with_kind(&self, num: Num) -> Num {
        let Num { value, .. } = num;
        match self.kind {
            NumKind::UInt32 if (0.0..=u32::MAX as f64).contains(&value) => Num::uint32(value as u32),
            NumKind::UInt64 if value >= 0.0 => Num::uint64(value as u64),
            _ => Num::new(value),
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Num {}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Num {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Num {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl Display for Num {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NumKind::UInt32 | NumKind::UInt64 => write!(f, "{}", self.uint64_value()),
            NumKind::Float => write!(f, "{}", self.value),
        }
    }
}

macro_rules! num_from_float {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Num {
                fn from(value: $t) -> Self {
                    Num::new(value as f64)
                }
            }
        )*
    };
}

num_from_float!(i8, i16, i32, i64, u8, u16, f32, f64, isize, usize);

impl From<u32> for Num {
    fn from(value: u32) -> Self {
        Num::uint32(value)
    }
}

impl From<u64> for Num {
    fn from(value: u64) -> Self {
        Num::uint64(value)
    }
}
