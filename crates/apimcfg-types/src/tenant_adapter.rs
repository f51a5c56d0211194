//! Adapter that resolves organizations to tenant ids and provisions tenant storage.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait TenantAdapter: Debug + Send + Sync {
	async fn resolve_tenant_id(&self, org: &Organization) -> ClResult<TnId>;

	/// Lazily provisions tenant-local storage. Never called for the super tenant.
	async fn ensure_tenant_loaded(&self, tn_id: TnId) -> ClResult<()>;
}

// vim: ts=4
