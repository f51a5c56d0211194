//! Adapter that durably stores registry resources. Every tenant has its own storage root.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::Resource;

#[async_trait]
pub trait RegistryAdapter: Debug + Send + Sync {
	/// Checks whether a resource exists at `path`
	async fn exists(&self, tn_id: TnId, path: &str) -> ClResult<bool>;

	/// Reads a resource, `None` if it does not exist
	async fn get(&self, tn_id: TnId, path: &str) -> ClResult<Option<Resource>>;

	/// Creates or overwrites a resource
	async fn put(&self, tn_id: TnId, path: &str, resource: Resource) -> ClResult<()>;
}

// vim: ts=4
