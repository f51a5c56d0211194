//! Cache interface used to invalidate stale configuration reads.

use std::fmt::Debug;

/// Suffix of the cache key holding an organization's tenant config
pub const TENANT_CONFIG_CACHE_NAME: &str = "tenantConfigCache";

/// Builds the cache key `"<org>_<cache name>"`
pub fn cache_key(org: &str, cache_name: &str) -> String {
	format!("{}_{}", org, cache_name)
}

pub trait ConfigCache: Debug + Send + Sync {
	fn get(&self, key: &str) -> Option<String>;

	fn put(&self, key: &str, value: String);

	fn evict(&self, key: &str);
}


// vim: ts=4
