//! In-process LRU cache in front of full-text search.
//!
//! Search hits for a `(scope, query)` pair are kept until evicted by newer
//! queries. Failures are never cached, so a transient database error does not
//! stick. The cache holds no TTL; callers that write to searchable tables and
//! need fresh results call [`CachedSearch::clear`].

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use lru::LruCache;
use tracing::debug;

use crate::domain::ports::{SearchRepository, SearchRepositoryError};
use crate::domain::{SearchHit, SearchQuery, SearchScope};

/// Default number of cached queries.
pub const DEFAULT_SEARCH_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

type CacheKey = (SearchScope, SearchQuery);

/// Decorates a [`SearchRepository`] with an LRU result cache.
pub struct CachedSearch<R> {
    inner: R,
    entries: Mutex<LruCache<CacheKey, Vec<SearchHit>>>,
}

impl<R> CachedSearch<R> {
    /// Wrap `inner` with the default capacity.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_SEARCH_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: R, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A poisoned lock only means another caller panicked mid-update; the LRU
    // itself is still consistent.
    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, Vec<SearchHit>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<R> SearchRepository for CachedSearch<R>
where
    R: SearchRepository,
{
    async fn search(
        &self,
        scope: SearchScope,
        query: SearchQuery,
    ) -> Result<Vec<SearchHit>, SearchRepositoryError> {
        let key = (scope, query);
        let cached = self.lock().get(&key).cloned();
        if let Some(hits) = cached {
            debug!(%scope, query = key.1.text(), "search cache hit");
            return Ok(hits);
        }

        let hits = self.inner.search(scope, key.1.clone()).await?;
        self.lock().put(key, hits.clone());
        Ok(hits)
    }
}
