//! Tenant configuration store
//!
//! Stores one document per (organization, slot) in the resource registry.
//! Documents are created only if absent, updated only if present, and never
//! deleted. Sensitive slots get the everyone role denied read access when
//! they are first created, and tenant config updates evict the cached copy
//! before the new content is written.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use apimcfg_types::{
	access_adapter::AccessAdapter,
	cache::{ConfigCache, cache_key},
	error::ErrorCode,
	registry_adapter::RegistryAdapter,
	tenant_adapter::TenantAdapter,
	types::{Action, ConfigDocument, Resource},
};

use crate::opts::ConfigStoreOpts;
use crate::prelude::*;
use crate::self_signup::{SelfSignupConfig, parse_self_signup};

/// Human-readable messages attached to wrapped errors
fn add_msg(slot: ConfigSlot) -> &'static str {
	match slot {
		ConfigSlot::ExternalStores => "Error while adding External Stores Configuration to registry",
		ConfigSlot::TenantConfig => "Error while adding Tenant Configuration to registry",
		ConfigSlot::WorkflowExecutor => "Error while adding Workflow Configuration to registry",
		ConfigSlot::AnalyticsConfig => "Error while adding Analytics Configuration to registry",
		ConfigSlot::SelfSignup => "Error while adding Self Signup Configuration to registry",
	}
}

fn update_msg(slot: ConfigSlot) -> &'static str {
	match slot {
		ConfigSlot::ExternalStores => "Error while updating External Stores Configuration in registry",
		ConfigSlot::TenantConfig => "Error while updating Tenant Configuration in registry",
		ConfigSlot::WorkflowExecutor => "Error while updating Workflow Configuration in registry",
		ConfigSlot::AnalyticsConfig => "Error while updating Analytics Configuration in registry",
		ConfigSlot::SelfSignup => "Error while updating Self Signup Configuration in registry",
	}
}

fn read_msg(slot: ConfigSlot) -> &'static str {
	match slot {
		ConfigSlot::ExternalStores => {
			"Error while retrieving External Stores Configuration from registry"
		}
		ConfigSlot::TenantConfig => "Error while retrieving Tenant Configuration from registry",
		ConfigSlot::WorkflowExecutor => "Error while retrieving Workflow Configuration from registry",
		ConfigSlot::AnalyticsConfig => {
			"Error while retrieving Analytics Configuration from registry"
		}
		ConfigSlot::SelfSignup => "Error while retrieving Self Signup Configuration from registry",
	}
}

fn read_code(slot: ConfigSlot) -> ErrorCode {
	match slot {
		ConfigSlot::ExternalStores => ErrorCode::RetrieveExternalStoreConfig,
		_ => ErrorCode::RetrieveConfig,
	}
}

#[derive(Debug)]
pub struct ConfigStore {
	tenants: Arc<dyn TenantAdapter>,
	registry: Arc<dyn RegistryAdapter>,
	access: Arc<dyn AccessAdapter>,
	cache: Arc<dyn ConfigCache>,
	opts: ConfigStoreOpts,
	/// Sensitive documents written while their deny grant failed
	pending_denies: Mutex<HashSet<(TnId, ConfigSlot)>>,
}

impl ConfigStore {
	pub fn new(
		tenants: Arc<dyn TenantAdapter>,
		registry: Arc<dyn RegistryAdapter>,
		access: Arc<dyn AccessAdapter>,
		cache: Arc<dyn ConfigCache>,
		opts: ConfigStoreOpts,
	) -> Self {
		Self { tenants, registry, access, cache, opts, pending_denies: Mutex::default() }
	}

	/// Resolves the tenant of an organization, provisioning tenant storage if needed
	async fn resolve_tenant(&self, org: &Organization) -> ClResult<TnId> {
		let tn_id = self.tenants.resolve_tenant_id(org).await?;
		if !tn_id.is_super() {
			self.tenants.ensure_tenant_loaded(tn_id).await?;
		}
		Ok(tn_id)
	}

	fn tenant_config_cache_key(&self, org: &Organization) -> String {
		cache_key(org.as_str(), &self.opts.tenant_config_cache_name)
	}

	/// Creates a slot document if it does not exist yet. Existing documents are left untouched.
	///
	/// If the read restriction of a sensitive slot failed after its document was written,
	/// the next `create` of that slot retries the restriction.
	pub async fn create(&self, org: Option<&str>, slot: ConfigSlot, content: &str) -> ClResult<()> {
		let org = Organization::normalize(org);
		if slot == ConfigSlot::SelfSignup {
			warn!(org = %org, "Self signup configuration cannot be added");
			return Err(Error::Unimplemented("adding self signup configuration"));
		}

		self.create_inner(&org, slot, content).await.map_err(|err| {
			error!(org = %org, slot = %slot, error = %err, "{}", add_msg(slot));
			Error::config_store(add_msg(slot), err).with_code(ErrorCode::AddConfig)
		})
	}

	async fn create_inner(&self, org: &Organization, slot: ConfigSlot, content: &str) -> ClResult<()> {
		let tn_id = self.resolve_tenant(org).await?;
		if self.registry.exists(tn_id, slot.path()).await? {
			let pending = self.pending_denies.lock().contains(&(tn_id, slot));
			if pending {
				info!(org = %org, slot = %slot, "Config exists, retrying failed read restriction");
				self.deny_anonymous_read(tn_id, slot).await?;
				self.pending_denies.lock().remove(&(tn_id, slot));
			} else {
				debug!(org = %org, slot = %slot, "Config already exists, skipping create");
			}
			return Ok(());
		}

		let resource = Resource::new(content.as_bytes(), Some(slot.media_type()));
		self.registry.put(tn_id, slot.path(), resource).await?;

		if slot.deny_anonymous_read()
			&& let Err(err) = self.deny_anonymous_read(tn_id, slot).await
		{
			self.pending_denies.lock().insert((tn_id, slot));
			return Err(err);
		}

		info!(org = %org, slot = %slot, "Config created");
		Ok(())
	}

	async fn deny_anonymous_read(&self, tn_id: TnId, slot: ConfigSlot) -> ClResult<()> {
		let path = self.opts.absolute_path(slot);
		self.access.deny_role(tn_id, &self.opts.everyone_role, &path, Action::Get).await?;
		debug!(tn_id = %tn_id, path = %path, "Denied anonymous read");
		Ok(())
	}

	/// Reads a slot document, `None` if it was never created
	pub async fn read(&self, org: Option<&str>, slot: ConfigSlot) -> ClResult<Option<String>> {
		Ok(self.read_document(org, slot).await?.map(|doc| doc.content))
	}

	/// Reads a slot document together with its media type
	pub async fn read_document(
		&self,
		org: Option<&str>,
		slot: ConfigSlot,
	) -> ClResult<Option<ConfigDocument>> {
		let org = Organization::normalize(org);
		self.read_inner(&org, slot).await.map_err(|err| {
			error!(org = %org, slot = %slot, error = %err, "{}", read_msg(slot));
			Error::config_store(read_msg(slot), err).with_code(read_code(slot))
		})
	}

	async fn read_inner(&self, org: &Organization, slot: ConfigSlot) -> ClResult<Option<ConfigDocument>> {
		let tn_id = self.resolve_tenant(org).await?;
		if !self.registry.exists(tn_id, slot.path()).await? {
			return Ok(None);
		}
		match self.registry.get(tn_id, slot.path()).await? {
			Some(resource) => Ok(Some(ConfigDocument::try_from(resource)?)),
			None => Ok(None),
		}
	}

	/// Overwrites an existing slot document. Absent documents are not created.
	pub async fn update(&self, org: Option<&str>, slot: ConfigSlot, content: &str) -> ClResult<()> {
		let org = Organization::normalize(org);
		if slot == ConfigSlot::SelfSignup {
			warn!(org = %org, "Self signup configuration cannot be updated");
			return Err(Error::Unimplemented("updating self signup configuration"));
		}

		// Evict before writing so a failed write cannot leave a stale entry behind
		if slot == ConfigSlot::TenantConfig {
			let key = self.tenant_config_cache_key(&org);
			self.cache.evict(&key);
			debug!(key = %key, "Evicted tenant config cache entry");
		}

		self.update_inner(&org, slot, content).await.map_err(|err| {
			error!(org = %org, slot = %slot, error = %err, "{}", update_msg(slot));
			Error::config_store(update_msg(slot), err).with_code(ErrorCode::UpdateConfig)
		})
	}

	async fn update_inner(&self, org: &Organization, slot: ConfigSlot, content: &str) -> ClResult<()> {
		let tn_id = self.resolve_tenant(org).await?;
		if !self.registry.exists(tn_id, slot.path()).await? {
			debug!(org = %org, slot = %slot, "Config does not exist, skipping update");
			return Ok(());
		}

		let resource = Resource::new(content.as_bytes(), Some(slot.media_type()));
		self.registry.put(tn_id, slot.path(), resource).await?;

		info!(org = %org, slot = %slot, "Config updated");
		Ok(())
	}

	/// Tenant config read through the cache
	pub async fn tenant_config_cached(&self, org: Option<&str>) -> ClResult<Option<String>> {
		let org = Organization::normalize(org);
		let key = self.tenant_config_cache_key(&org);
		if let Some(content) = self.cache.get(&key) {
			debug!(key = %key, "Tenant config cache hit");
			return Ok(Some(content));
		}

		let content = self.read(Some(org.as_str()), ConfigSlot::TenantConfig).await?;
		if let Some(content) = &content {
			self.cache.put(&key, content.clone());
		}
		Ok(content)
	}

	/// Self-signup settings embedded in the tenant config.
	///
	/// `None` if there is no tenant config or it has no self-signup section.
	/// A tenant config that is not valid JSON is an `Error::Parse`.
	pub async fn self_signup_config(&self, org: Option<&str>) -> ClResult<Option<SelfSignupConfig>> {
		let org = Organization::normalize(org);
		let Some(tenant_config) = self.read(Some(org.as_str()), ConfigSlot::TenantConfig).await?
		else {
			debug!(org = %org, "No tenant config, no self signup configuration");
			return Ok(None);
		};

		parse_self_signup(&tenant_config).inspect_err(|err| {
			error!(org = %org, error = %err, "Invalid tenant config, cannot read self signup configuration");
		})
	}

	// Per-slot shorthands
	//*********************
	pub async fn add_external_store_config(&self, org: Option<&str>, config: &str) -> ClResult<()> {
		self.create(org, ConfigSlot::ExternalStores, config).await
	}
	pub async fn update_external_store_config(&self, org: Option<&str>, config: &str) -> ClResult<()> {
		self.update(org, ConfigSlot::ExternalStores, config).await
	}
	pub async fn external_store_config(&self, org: Option<&str>) -> ClResult<Option<String>> {
		self.read(org, ConfigSlot::ExternalStores).await
	}

	pub async fn add_tenant_config(&self, org: Option<&str>, config: &str) -> ClResult<()> {
		self.create(org, ConfigSlot::TenantConfig, config).await
	}
	pub async fn update_tenant_config(&self, org: Option<&str>, config: &str) -> ClResult<()> {
		self.update(org, ConfigSlot::TenantConfig, config).await
	}
	pub async fn tenant_config(&self, org: Option<&str>) -> ClResult<Option<String>> {
		self.read(org, ConfigSlot::TenantConfig).await
	}

	pub async fn add_workflow_config(&self, org: Option<&str>, config: &str) -> ClResult<()> {
		self.create(org, ConfigSlot::WorkflowExecutor, config).await
	}
	pub async fn update_workflow_config(&self, org: Option<&str>, config: &str) -> ClResult<()> {
		self.update(org, ConfigSlot::WorkflowExecutor, config).await
	}
	pub async fn workflow_config(&self, org: Option<&str>) -> ClResult<Option<String>> {
		self.read(org, ConfigSlot::WorkflowExecutor).await
	}

	pub async fn add_analytics_config(&self, org: Option<&str>, config: &str) -> ClResult<()> {
		self.create(org, ConfigSlot::AnalyticsConfig, config).await
	}
	pub async fn update_analytics_config(&self, org: Option<&str>, config: &str) -> ClResult<()> {
		self.update(org, ConfigSlot::AnalyticsConfig, config).await
	}
	pub async fn analytics_config(&self, org: Option<&str>) -> ClResult<Option<String>> {
		self.read(org, ConfigSlot::AnalyticsConfig).await
	}
}

// vim: ts=4
