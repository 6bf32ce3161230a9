//! Process-wide memoization of compiled catch-all patterns.
//!
//! Identity lists are small and stable, so the same handful of patterns is
//! compiled over and over across compose flows. Entries are pure and
//! reconstructible; the cache needs no teardown beyond [`clear`] for test
//! isolation.

use std::num::NonZeroUsize;

use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::pattern::{compile, CompiledPattern};

/// Capacity of the pattern cache. Generous relative to realistic identity
/// counts, so in practice the cache behaves as plain memoization.
pub const DEFAULT_CACHE_SIZE: usize = 256;

static PATTERN_CACHE: Lazy<Mutex<LruCache<String, CompiledPattern>>> = Lazy::new(|| {
    let size = NonZeroUsize::new(DEFAULT_CACHE_SIZE).unwrap_or(NonZeroUsize::new(1).unwrap());
    Mutex::new(LruCache::new(size))
});

/// Fetch the compiled form of `pattern`, compiling and inserting on miss.
///
/// Compilation is deterministic, so a redundant compile racing on the same
/// key produces an interchangeable result. The short critical section covers
/// the compile as well, which keeps concurrent misses on one key from
/// stampeding; pattern compilation is CPU-only and cheap.
pub fn get_or_compile(pattern: &str) -> CompiledPattern {
    let mut cache = PATTERN_CACHE.lock();

    if let Some(compiled) = cache.get(pattern) {
        return compiled.clone();
    }

    let compiled = compile(pattern);
    cache.put(pattern.to_string(), compiled.clone());
    compiled
}

/// Drop all cached patterns. Intended for test isolation.
pub fn clear() {
    PATTERN_CACHE.lock().clear();
}

/// Number of patterns currently cached.
pub fn len() -> usize {
    PATTERN_CACHE.lock().len()
}
