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

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};


const GENERATIONS: usize = 4;

#[derive(Debug)]
struct Entry<T> {
    value: T,
    weight: u64,
}

/// A bucket holds up to four generations of values, ordered from the most frequently hit (the
/// first position) to the least frequently hit (the last position).
#[derive(Debug)]
struct Bucket<T> {
    generations: [Option<Entry<T>>; GENERATIONS],
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Bucket {
            generations: [None, None, None, None],
        }
    }
}

/// Hit and miss counts for a [`HashGenCacheSet`]. `hits[0]` counts hits in the oldest (most
/// frequently used) generation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: [u64; GENERATIONS],
    pub misses: u64,
}

impl CacheStats {
    /// The total number of hits across all generations.
    pub fn total_hits(&self) -> u64 {
        self.hits.iter().sum()
    }

    /// The proportion of lookups that were served from the cache.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.total_hits();
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// A fixed size hash-consing cache.
///
/// Each value is assigned to a bucket by its hash and each bucket retains up to four values
/// ranked by how often they have been requested. Putting a value that is equal to one that is
/// already cached returns the cached instance (allowing the new one to be dropped) and promotes the
/// cached instance if it is now hotter than the one above it. Putting a value that is not present
/// evicts the coldest value in its bucket if the bucket is full.
///
/// The cache never grows after construction.
#[derive(Debug)]
pub struct HashGenCacheSet<T, S = RandomState> {
    buckets: Vec<Bucket<T>>,
    hasher: S,
    stats: CacheStats,
}

impl<T: Hash + Eq + Clone> HashGenCacheSet<T> {
    /// Create a cache with a fixed number of buckets.
    ///
    /// # Arguments
    /// * `size` - The number of buckets (at least one bucket is always created).
    pub fn new(size: usize) -> Self {
        HashGenCacheSet::with_hasher(size, RandomState::new())
    }
}

impl<T, S> HashGenCacheSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    pub fn with_hasher(size: usize, hasher: S) -> Self {
        let size = size.max(1);
        let mut buckets = Vec::with_capacity(size);
        buckets.resize_with(size, Default::default);
        HashGenCacheSet {
            buckets,
            hasher,
            stats: CacheStats::default(),
        }
    }

    /// The number of buckets in the cache.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// The number of values currently held in the cache.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.generations.iter().filter(|g| g.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Determine whether an equal value is currently cached.
    pub fn contains(&self, value: &T) -> bool {
        let index = self.bucket_index(value);
        self.buckets[index]
            .generations
            .iter()
            .flatten()
            .any(|entry| &entry.value == value)
    }

    /// Intern a value, returning the cached instance if an equal value is present and otherwise
    /// caching and returning the provided value.
    pub fn put(&mut self, value: T) -> T {
        let index = self.bucket_index(&value);
        let HashGenCacheSet { buckets, stats, .. } = self;
        let bucket = &mut buckets[index];

        let hit = bucket
            .generations
            .iter()
            .position(|g| matches!(g, Some(entry) if entry.value == value));

        if let Some(mut pos) = hit {
            stats.hits[pos] += 1;
            if let Some(entry) = bucket.generations[pos].as_mut() {
                entry.weight += 1;
            }
            while pos > 0
                && weight_of(&bucket.generations[pos]) > weight_of(&bucket.generations[pos - 1])
            {
                bucket.generations.swap(pos, pos - 1);
                pos -= 1;
            }
            match &bucket.generations[pos] {
                Some(entry) => entry.value.clone(),
                None => value,
            }
        } else {
            stats.misses += 1;
            let slot = bucket
                .generations
                .iter()
                .position(Option::is_none)
                .unwrap_or(GENERATIONS - 1);
            bucket.generations[slot] = Some(Entry {
                value: value.clone(),
                weight: 1,
            });
            value
        }
    }

    /// Remove all cached values (the statistics are retained).
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = Bucket::default();
        }
    }

    fn bucket_index(&self, value: &T) -> usize {
        (self.hasher.hash_one(value) % self.buckets.len() as u64) as usize
    }
}

fn weight_of<T>(entry: &Option<Entry<T>>) -> u64 {
    entry.as_ref().map(|e| e.weight).unwrap_or(0)
}
