use lru::LruCache;
use std::fmt::Display;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::{RequestDescriptor, Song};

/// Cache key for a recommendation batch: `category:query`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl From<&RequestDescriptor> for CacheKey {
    fn from(request: &RequestDescriptor) -> Self {
        Self(request.to_string())
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-local store of the last first-page batch per request
///
/// Bounded by least-recently-used eviction; a capacity of zero keeps every
/// entry for the lifetime of the process. Cloning shares the same storage.
#[derive(Clone)]
pub struct RecommendationCache {
    entries: Arc<Mutex<LruCache<CacheKey, Vec<Song>>>>,
}

impl RecommendationCache {
    pub fn new(capacity: usize) -> Self {
        let entries = match NonZeroUsize::new(capacity) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };

        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Vec<Song>> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Stores a batch, replacing any previous entry for the key
    pub async fn insert(&self, key: CacheKey, songs: Vec<Song>) {
        let mut entries = self.entries.lock().await;
        let replacing = entries.contains(&key);
        // push hands back either the replaced entry or the evicted one
        if let Some((evicted, _)) = entries.push(key, songs) {
            if !replacing {
                tracing::debug!(key = %evicted, "Evicted recommendation cache entry");
            }
        }
    }

    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().await.contains(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
