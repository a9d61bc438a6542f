//! Content-addressed memoization of filter outcomes using moka
//!
//! A filter's outcome depends only on its settings, its effective target and
//! the rule parameters, so those are hashed together to form the key. Edits
//! produce a new key; stale entries age out by capacity.

use crate::outcome::FilterOutcome;
use moka::sync::Cache;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A 32-byte content hash (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute Blake3 hash of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Compute hash of a value's JSON encoding
    ///
    /// # Errors
    /// Returns error if serialization fails
    #[inline]
    pub fn compute_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_vec(value)?;
        Ok(Self::compute(&json))
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
    /// Lookups served from cache
    pub hits: u64,
    /// Lookups that computed a fresh outcome
    pub misses: u64,
}

/// Filter outcome cache keyed by [`ContentHash`]
#[derive(Debug)]
pub struct AllocationCache {
    inner: Cache<ContentHash, Arc<FilterOutcome>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AllocationCache {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get cached outcome
    #[inline]
    #[must_use]
    pub fn get(&self, key: &ContentHash) -> Option<Arc<FilterOutcome>> {
        self.inner.get(key)
    }

    /// Get or compute outcome
    pub fn get_or_insert_with<F>(&self, key: ContentHash, compute: F) -> Arc<FilterOutcome>
    where
        F: FnOnce() -> FilterOutcome,
    {
        if let Some(cached) = self.inner.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Outcome cache hit {}", key.short());
            return cached;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Outcome cache miss {}", key.short());
        let outcome = Arc::new(compute());
        self.inner.insert(key, Arc::clone(&outcome));
        outcome
    }

    /// Drop every entry and reset counters
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entry_count: self.inner.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
