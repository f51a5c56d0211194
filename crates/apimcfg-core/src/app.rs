//! App builder - wires adapters into the config store and user store services

use std::sync::Arc;

use apimcfg_types::{
	access_adapter::AccessAdapter, cache::ConfigCache, registry_adapter::RegistryAdapter,
	tenant_adapter::TenantAdapter, user_adapter::UserAdapter,
};

use crate::cache::TenantConfigCache;
use crate::config_store::ConfigStore;
use crate::logging;
use crate::opts::ConfigStoreOpts;
use crate::prelude::*;
use crate::user_store::UserStoreService;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub struct AppState {
	pub config_store: ConfigStore,
	pub user_store: UserStoreService,
	pub opts: ConfigStoreOpts,
}

pub type App = Arc<AppState>;

#[derive(Debug, Default)]
struct Adapters {
	tenant_adapter: Option<Arc<dyn TenantAdapter>>,
	registry_adapter: Option<Arc<dyn RegistryAdapter>>,
	access_adapter: Option<Arc<dyn AccessAdapter>>,
	user_adapter: Option<Arc<dyn UserAdapter>>,
	cache: Option<Arc<dyn ConfigCache>>,
}

#[derive(Debug)]
pub struct AppBuilder {
	opts: ConfigStoreOpts,
	adapters: Adapters,
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl AppBuilder {
	pub fn new() -> Self {
		logging::init_tracing();
		AppBuilder { opts: ConfigStoreOpts::default(), adapters: Adapters::default() }
	}

	// Opts
	pub fn opts(&mut self, opts: ConfigStoreOpts) -> &mut Self {
		self.opts = opts;
		self
	}
	pub fn opts_from_env(&mut self) -> ClResult<&mut Self> {
		self.opts = ConfigStoreOpts::from_env()?;
		Ok(self)
	}

	// Adapters
	pub fn tenant_adapter(&mut self, tenant_adapter: Arc<dyn TenantAdapter>) -> &mut Self {
		self.adapters.tenant_adapter = Some(tenant_adapter);
		self
	}
	pub fn registry_adapter(&mut self, registry_adapter: Arc<dyn RegistryAdapter>) -> &mut Self {
		self.adapters.registry_adapter = Some(registry_adapter);
		self
	}
	pub fn access_adapter(&mut self, access_adapter: Arc<dyn AccessAdapter>) -> &mut Self {
		self.adapters.access_adapter = Some(access_adapter);
		self
	}
	pub fn user_adapter(&mut self, user_adapter: Arc<dyn UserAdapter>) -> &mut Self {
		self.adapters.user_adapter = Some(user_adapter);
		self
	}
	/// Overrides the default in-process LRU cache
	pub fn cache(&mut self, cache: Arc<dyn ConfigCache>) -> &mut Self {
		self.adapters.cache = Some(cache);
		self
	}

	pub fn build(&self) -> ClResult<App> {
		info!("apimcfg V{}", VERSION);
		self.opts.validate()?;

		let Some(tenant_adapter) = self.adapters.tenant_adapter.clone() else {
			error!("FATAL: No tenant adapter configured");
			return Err(Error::ConfigError("No tenant adapter configured".into()));
		};
		let Some(registry_adapter) = self.adapters.registry_adapter.clone() else {
			error!("FATAL: No registry adapter configured");
			return Err(Error::ConfigError("No registry adapter configured".into()));
		};
		let Some(access_adapter) = self.adapters.access_adapter.clone() else {
			error!("FATAL: No access adapter configured");
			return Err(Error::ConfigError("No access adapter configured".into()));
		};
		let Some(user_adapter) = self.adapters.user_adapter.clone() else {
			error!("FATAL: No user adapter configured");
			return Err(Error::ConfigError("No user adapter configured".into()));
		};
		let cache = self.adapters.cache.clone().unwrap_or_else(|| {
			debug!(capacity = self.opts.cache_size, "Using in-process tenant config cache");
			Arc::new(TenantConfigCache::new(self.opts.cache_size))
		});

		let config_store = ConfigStore::new(
			tenant_adapter.clone(),
			registry_adapter,
			access_adapter,
			cache,
			self.opts.clone(),
		);
		let user_store = UserStoreService::new(tenant_adapter, user_adapter);

		Ok(Arc::new(AppState { config_store, user_store, opts: self.opts.clone() }))
	}
}

// vim: ts=4
