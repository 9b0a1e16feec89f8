use fxhash::FxHashMap;
use jiff::{SignedDuration, Timestamp};
use milkrun_core::route::RouteResult;
use parking_lot::Mutex;

/// Order-independent identity of a stop set: ids sorted and joined.
///
/// Route shape depends on membership, not presentation order, until
/// optimization runs, so two sets with the same members must share a
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_stop_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        ids.sort_unstable();

        CacheKey(ids.join("\n"))
    }
}

pub struct RouteCacheConfig {
    /// Maximum age of an entry before a lookup treats it as stale.
    pub ttl: SignedDuration,

    /// Maximum number of entries held at once.
    pub capacity: usize,
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            ttl: SignedDuration::from_secs(5 * 60),
            capacity: 50,
        }
    }
}

struct CachedRoute {
    result: RouteResult,
    created_at: Timestamp,
}

/// Keyed store of previously planned routes with TTL expiry and a
/// bounded entry count.
///
/// One mutex covers each whole read-evict-write span, so concurrent
/// planner calls cannot interleave inside an operation. Operations
/// never fail, they only miss.
pub struct RouteCache {
    config: RouteCacheConfig,
    entries: Mutex<FxHashMap<CacheKey, CachedRoute>>,
}

impl RouteCache {
    pub fn new(config: RouteCacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<RouteResult> {
        self.get_at(key, Timestamp::now())
    }

    pub fn put(&self, key: CacheKey, result: RouteResult) {
        self.put_at(key, result, Timestamp::now());
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Lookup with an explicit clock. Removes the entry and misses when
    /// it has outlived the TTL.
    pub(crate) fn get_at(&self, key: &CacheKey, now: Timestamp) -> Option<RouteResult> {
        let mut entries = self.entries.lock();

        let entry = entries.get(key)?;
        if now.duration_since(entry.created_at) > self.config.ttl {
            entries.remove(key);
            return None;
        }

        Some(entry.result.clone())
    }

    /// Insert with an explicit clock. A new key at capacity first evicts
    /// the single entry with the oldest `created_at`, never a batch.
    pub(crate) fn put_at(&self, key: CacheKey, result: RouteResult, now: Timestamp) {
        let mut entries = self.entries.lock();

        if !entries.contains_key(&key) && entries.len() >= self.config.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(key, _)| key.clone());

            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CachedRoute {
                result,
                created_at: now,
            },
        );
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(RouteCacheConfig::default())
    }
}
