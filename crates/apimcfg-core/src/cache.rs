//! In-process LRU cache for tenant configuration documents

use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;

use apimcfg_types::cache::ConfigCache;

use crate::opts::DEFAULT_CACHE_SIZE;

/// LRU cache keyed by `"<org>_<cache name>"`
#[derive(Debug, Clone)]
pub struct TenantConfigCache {
	cache: Arc<RwLock<LruCache<String, String>>>,
}

impl TenantConfigCache {
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity)
			.or(NonZeroUsize::new(DEFAULT_CACHE_SIZE))
			.unwrap_or(NonZeroUsize::MIN);
		Self { cache: Arc::new(RwLock::new(LruCache::new(capacity))) }
	}

	pub fn len(&self) -> usize {
		self.cache.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.read().is_empty()
	}

	pub fn clear(&self) {
		self.cache.write().clear();
	}
}

impl ConfigCache for TenantConfigCache {
	fn get(&self, key: &str) -> Option<String> {
		// LRU lookups update recency, so even reads need the write lock
		self.cache.write().get(key).cloned()
	}

	fn put(&self, key: &str, value: String) {
		self.cache.write().put(key.to_string(), value);
	}

	fn evict(&self, key: &str) {
		self.cache.write().pop(key);
	}
}


// vim: ts=4
