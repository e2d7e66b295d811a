use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot of cache statistics.
#[derive(Clone, Debug, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to make room for a new key.
    pub evictions: u64,
    /// Entries dropped because their TTL ran out (lazily or by the sweeper).
    pub expirations: u64,
    pub current_size: usize,
    pub capacity: usize,
}

/// A cached response payload plus its bookkeeping.
pub(crate) struct Entry<T> {
    pub(crate) value: Arc<T>,
    pub(crate) inserted_at: Instant,
    /// Insertion sequence number. The smallest live value marks the
    /// oldest-inserted entry, the FIFO eviction victim.
    pub(crate) seq: u64,
}

impl<T> Entry<T> {
    fn is_expired(&self, expiry: Duration) -> bool {
        self.inserted_at.elapsed() >= expiry
    }
}

/// FIFO store with lazy TTL expiry.
///
/// All methods take `&mut self` — thread safety is handled by
/// [`ResponseCache`](crate::ResponseCache). Insertion order is recovered from
/// the sequence counter rather than a linked list; at the capacities this
/// cache runs at, an O(n) scan per eviction is the simpler trade.
pub(crate) struct Store<T> {
    entries: HashMap<String, Entry<T>>,
    capacity: usize,
    expiry: Duration,
    next_seq: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl<T> Store<T> {
    pub(crate) fn new(capacity: usize, expiry: Duration) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
            expiry,
            next_seq: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
            expirations: 0,
        }
    }

    /// Look up a key. A stale entry is removed on the spot and counts as a
    /// miss; a true miss leaves the store untouched.
    pub(crate) fn get(&mut self, key: &str) -> Option<Arc<T>> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired(self.expiry) => {
                tracing::debug!(key, "cache entry expired, removing");
                self.entries.remove(key);
                self.expirations += 1;
                self.misses += 1;
                None
            }
            Some(entry) => {
                self.hits += 1;
                Some(Arc::clone(&entry.value))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert or overwrite with a fresh timestamp.
    ///
    /// An overwrite replaces the entry in place and moves it to the back of
    /// the FIFO order; only a brand-new key can trigger eviction.
    pub(crate) fn insert(&mut self, key: String, value: T) {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            Entry {
                value: Arc::new(value),
                inserted_at: Instant::now(),
                seq,
            },
        );
    }

    /// Remove a key explicitly.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// One sweep pass: drop every entry at or past its expiry. Returns the
    /// number removed.
    pub(crate) fn remove_expired(&mut self) -> usize {
        let before = self.entries.len();
        let expiry = self.expiry;
        self.entries.retain(|_, entry| !entry.is_expired(expiry));
        let removed = before - self.entries.len();
        self.expirations += removed as u64;
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            expirations: self.expirations,
            current_size: self.entries.len(),
            capacity: self.capacity,
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.seq)
            .map(|(key, _)| key.clone())
        {
            tracing::debug!(key = %oldest, "evicting oldest cache entry");
            self.entries.remove(&oldest);
            self.evictions += 1;
        }
    }

    /// Shift an entry's timestamp into the past (tests only).
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &str, by: Duration) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.inserted_at -= by;
        }
    }
}
