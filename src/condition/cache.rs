//! Parsed-condition cache keyed by expression text

use crate::condition::ast::ConditionNode;
use crate::condition::{evaluator, parser};
use crate::error::Result;
use crate::facts::FactRecord;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default number of parsed expressions kept per cache
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

struct CacheEntry {
    ast: Arc<ConditionNode>,
    last_used: AtomicU64,
}

/// LRU-bounded cache of parsed condition trees
///
/// A capacity of zero disables caching.
pub struct ConditionCache {
    capacity: usize,
    entries: RwLock<AHashMap<String, CacheEntry>>,
    clock: AtomicU64,
}

impl ConditionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(AHashMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY))),
            clock: AtomicU64::new(0),
        }
    }

    #[inline]
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Get or parse a condition string, using the cache for repeated conditions
    pub fn get_or_parse(&self, condition: &str) -> Result<Arc<ConditionNode>> {
        // Fast path: read lock only
        {
            let cache = self.entries.read();
            if let Some(entry) = cache.get(condition) {
                entry.last_used.store(self.tick(), Ordering::Relaxed);
                return Ok(Arc::clone(&entry.ast));
            }
        }

        // Slow path: parse and cache
        let ast = Arc::new(parser::parse(condition)?);
        if self.capacity == 0 {
            return Ok(ast);
        }

        let mut cache = self.entries.write();
        if cache.len() >= self.capacity && !cache.contains_key(condition) {
            let oldest = cache
                .iter()
                .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                cache.remove(&key);
            }
        }
        cache.insert(
            condition.to_string(),
            CacheEntry {
                ast: Arc::clone(&ast),
                last_used: AtomicU64::new(self.tick()),
            },
        );

        Ok(ast)
    }

    /// Check a condition against a fact record, using the cached tree
    #[inline]
    pub fn check_condition(&self, condition: &str, facts: &FactRecord) -> Result<bool> {
        let ast = self.get_or_parse(condition)?;
        evaluator::check(&ast, facts)
    }

    /// Drop every cached tree
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    fn contains(&self, condition: &str) -> bool {
        self.entries.read().contains_key(condition)
    }
}

impl Default for ConditionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for ConditionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
