//! In-memory result cache with a short time-to-live.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use concourse_core::{CacheError, CachedSelection, ResultCache, SelectionKey, SelectionResult};

/// Process-local [`ResultCache`] backed by a mutex-guarded map.
///
/// Entries are immutable once written and are retained past expiry so the
/// candidate-fetch-failure path can serve a stale shortlist; `set`
/// overwrites and `delete` removes unconditionally.
#[derive(Debug, Default)]
pub struct MemoryResultCache {
    entries: Mutex<HashMap<SelectionKey, CachedSelection>>,
}

impl MemoryResultCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<SelectionKey, CachedSelection>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::Unavailable {
            reason: "cache lock poisoned".to_owned(),
        })
    }
}

impl ResultCache for MemoryResultCache {
    fn get(&self, key: &SelectionKey) -> Result<Option<CachedSelection>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(
        &self,
        key: &SelectionKey,
        results: Vec<SelectionResult>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let entry = CachedSelection {
            results,
            stored_at: now,
            expires_at: now + ttl,
        };
        self.lock()?.insert(key.clone(), entry);
        Ok(())
    }

    fn delete(&self, key: &SelectionKey) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests should fail fast when setup breaks"
)]
mod tests {
    use super::*;

    fn key() -> SelectionKey {
        SelectionKey::new("dining", Some("T1"))
    }

    #[test]
    fn set_then_get_returns_the_entry() {
        let cache = MemoryResultCache::new();
        cache
            .set(&key(), Vec::new(), Duration::from_secs(300))
            .unwrap();
        let entry = cache.get(&key()).unwrap().unwrap();
        assert!(entry.is_fresh(Instant::now()));
        assert!(entry.results.is_empty());
    }

    #[test]
    fn expired_entries_are_retained_for_stale_reads() {
        let cache = MemoryResultCache::new();
        cache.set(&key(), Vec::new(), Duration::ZERO).unwrap();
        let entry = cache.get(&key()).unwrap().unwrap();
        assert!(!entry.is_fresh(Instant::now()));
    }

    #[test]
    fn delete_removes_the_entry() {
        let cache = MemoryResultCache::new();
        cache
            .set(&key(), Vec::new(), Duration::from_secs(300))
            .unwrap();
        cache.delete(&key()).unwrap();
        assert!(cache.get(&key()).unwrap().is_none());
    }

    #[test]
    fn keys_are_isolated() {
        let cache = MemoryResultCache::new();
        cache
            .set(&key(), Vec::new(), Duration::from_secs(300))
            .unwrap();
        let other = SelectionKey::new("dining", None);
        assert!(cache.get(&other).unwrap().is_none());
    }
}
