//! Boundary traits for candidate, history, and cache stores.
//!
//! Candidate and history stores are async because they sit in front of
//! remote services; the result cache is synchronous and in-process.

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::{Amenity, InteractionEvent, SelectionResult};

/// Cache and deduplication key for one selection request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionKey {
    /// The collection being selected from, e.g. "dining".
    pub collection: String,
    /// The caller's zone, when part of the request.
    pub zone: Option<String>,
}

impl SelectionKey {
    /// Build a key from a collection name and optional zone.
    #[must_use]
    pub fn new(collection: impl Into<String>, zone: Option<&str>) -> Self {
        Self {
            collection: collection.into(),
            zone: zone.map(str::to_owned),
        }
    }
}

/// Error raised when an external store cannot produce data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The backing service refused or failed the request.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Service-provided failure description.
        reason: String,
    },
    /// The request exceeded its deadline.
    #[error("store timed out after {elapsed_ms}ms")]
    Timeout {
        /// Milliseconds elapsed before giving up.
        elapsed_ms: u64,
    },
}

/// Supplies candidate amenities for a collection.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetch the candidate pool for `collection`, optionally scoped to a
    /// zone.
    ///
    /// # Errors
    /// Returns [`FetchError`] when the backing store is unreachable or the
    /// request times out.
    async fn fetch_candidates(
        &self,
        collection: &str,
        zone: Option<&str>,
    ) -> Result<Vec<Amenity>, FetchError>;
}

/// Supplies recorded interaction history for a session.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Fetch up to `limit` most recent events for `session_id`, newest
    /// first.
    ///
    /// # Errors
    /// Returns [`FetchError`] when the backing store is unreachable or the
    /// request times out.
    async fn fetch_history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<InteractionEvent>, FetchError>;
}

/// A cached shortlist together with its freshness bounds.
#[derive(Debug, Clone)]
pub struct CachedSelection {
    /// The cached results in rank order.
    pub results: Vec<SelectionResult>,
    /// When the entry was written.
    pub stored_at: Instant,
    /// When the entry stops being fresh. Entries past this point are kept
    /// for stale fallback until overwritten or deleted.
    pub expires_at: Instant,
}

impl CachedSelection {
    /// Whether the entry is still within its time-to-live at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Error raised by the result cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache is unusable, e.g. its lock is poisoned.
    #[error("cache unavailable: {reason}")]
    Unavailable {
        /// Description of the failure.
        reason: String,
    },
}

/// Short-lived store for completed shortlists.
pub trait ResultCache: Send + Sync {
    /// Look up the entry for `key`, fresh or stale.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the cache cannot be read.
    fn get(&self, key: &SelectionKey) -> Result<Option<CachedSelection>, CacheError>;

    /// Store `results` under `key` with the given time-to-live.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the cache cannot be written.
    fn set(
        &self,
        key: &SelectionKey,
        results: Vec<SelectionResult>,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Drop the entry for `key`, if any.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the cache cannot be written.
    fn delete(&self, key: &SelectionKey) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_selection_freshness_window() {
        let now = Instant::now();
        let entry = CachedSelection {
            results: Vec::new(),
            stored_at: now,
            expires_at: now + Duration::from_secs(300),
        };
        assert!(entry.is_fresh(now + Duration::from_secs(299)));
        assert!(!entry.is_fresh(now + Duration::from_secs(300)));
    }

    #[test]
    fn selection_keys_distinguish_zones() {
        let zoned = SelectionKey::new("dining", Some("T1"));
        let unzoned = SelectionKey::new("dining", None);
        assert_ne!(zoned, unzoned);
        assert_eq!(zoned, SelectionKey::new("dining", Some("T1")));
    }
}
