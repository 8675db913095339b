//! Time-bounded, single-flight result cache.
//!
//! Remote calls are memoised by their input key for a fixed TTL. At most one
//! computation per key is in flight: concurrent callers for the same key
//! await the same slot and receive the same outcome. Successful outcomes
//! stay until they expire or are evicted (LRU, bounded capacity); failed
//! outcomes are handed to every waiter and then dropped, so the next call
//! re-invokes the provider.

use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

/// A single cache entry. Empty while its computation is in flight.
struct Slot<V, E> {
    cell: OnceCell<(Instant, Result<V, E>)>,
}

impl<V, E> Slot<V, E> {
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// In-flight slots never expire.
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.cell
            .get()
            .is_some_and(|(completed_at, _)| now.duration_since(*completed_at) >= ttl)
    }
}

/// Thread-safe TTL cache with a thundering-herd guard.
///
/// Cloning shares the underlying storage.
pub struct TtlCache<K, V, E> {
    inner: Arc<Mutex<CacheInner<K, V, E>>>,
    ttl: Duration,
}

struct CacheInner<K, V, E> {
    entries: LruCache<K, Arc<Slot<V, E>>>,
    hits: u64,
    joined: u64,
    misses: u64,
    expired: u64,
    evicted: u64,
}

/// Statistics about a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held (including in-flight).
    pub entries: usize,
    /// Lookups served from a completed entry.
    pub hits: u64,
    /// Lookups that joined an in-flight computation.
    pub joined: u64,
    /// Lookups that started a new computation.
    pub misses: u64,
    /// Entries replaced or purged because their TTL elapsed.
    pub expired: u64,
    /// Entries dropped to stay within capacity.
    pub evicted: u64,
}

impl<K, V, E> TtlCache<K, V, E>
where
    K: Hash + Eq + Clone,
    V: Clone,
    E: Clone,
{
    /// Create a cache holding at most `capacity` keys for `ttl` each.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                entries: LruCache::new(capacity),
                hits: 0,
                joined: 0,
                misses: 0,
                expired: 0,
                evicted: 0,
            })),
            ttl,
        }
    }

    /// The configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached outcome for `key`, or run `init` to produce it.
    ///
    /// If another caller is already computing `key`, this awaits that
    /// computation instead of starting a second one.
    ///
    /// # Errors
    /// Returns the error produced by `init` (possibly another caller's).
    pub async fn get_or_try_init<F, Fut>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot_for(&key);

        let (_, outcome) = slot
            .cell
            .get_or_init(|| async move {
                let outcome = init().await;
                (Instant::now(), outcome)
            })
            .await;
        let outcome = outcome.clone();

        if outcome.is_err() {
            let mut inner = self.inner.lock();
            if inner
                .entries
                .peek(&key)
                .is_some_and(|current| Arc::ptr_eq(current, &slot))
            {
                inner.entries.pop(&key);
            }
        }
        outcome
    }

    /// Completed, unexpired value for `key` without computing anything.
    pub fn get(&self, key: &K) -> Option<Result<V, E>> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let slot = inner.entries.get(key)?;
        if slot.is_expired(now, self.ttl) {
            return None;
        }
        slot.cell.get().map(|(_, outcome)| outcome.clone())
    }

    /// Find a live slot for `key` or install a fresh one.
    fn slot_for(&self, key: &K) -> Arc<Slot<V, E>> {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        let existing = inner.entries.get(key).cloned();
        match existing {
            Some(slot) if !slot.is_expired(now, self.ttl) => {
                if slot.cell.initialized() {
                    inner.hits += 1;
                } else {
                    inner.joined += 1;
                    debug!("Joining in-flight computation");
                }
                slot
            }
            stale => {
                if stale.is_some() {
                    inner.expired += 1;
                }
                inner.misses += 1;
                let slot = Arc::new(Slot::new());
                if let Some((evicted_key, _)) = inner.entries.push(key.clone(), Arc::clone(&slot)) {
                    if evicted_key != *key {
                        inner.evicted += 1;
                    }
                }
                slot
            }
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let stale: Vec<K> = inner
            .entries
            .iter()
            .filter(|(_, slot)| slot.is_expired(now, self.ttl))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &stale {
            inner.entries.pop(key);
        }
        inner.expired += stale.len() as u64;
        stale.len()
    }

    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.entries.len(),
            hits: inner.hits,
            joined: inner.joined,
            misses: inner.misses,
            expired: inner.expired,
            evicted: inner.evicted,
        }
    }
}

impl<K, V, E> Clone for TtlCache<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            ttl: self.ttl,
        }
    }
}
