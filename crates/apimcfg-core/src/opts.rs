//! Runtime options for the config store.
//!
//! Options have built-in defaults, can be overridden through builder setters,
//! and can be loaded from `APIMCFG_*` environment variables.

use std::path::{Path, PathBuf};

use apimcfg_types::{access_adapter::EVERYONE_ROLE, cache::TENANT_CONFIG_CACHE_NAME};

use crate::prelude::*;

/// Mount point of the governance registry. Slot paths are relative to it.
pub const GOVERNANCE_REGISTRY_BASE_PATH: &str = "/_system/governance";
pub const DEFAULT_CACHE_SIZE: usize = 256;

pub const ENV_GOVERNANCE_BASE: &str = "APIMCFG_GOVERNANCE_BASE";
pub const ENV_EVERYONE_ROLE: &str = "APIMCFG_EVERYONE_ROLE";
pub const ENV_TENANT_CONFIG_CACHE_NAME: &str = "APIMCFG_TENANT_CONFIG_CACHE_NAME";
pub const ENV_CACHE_SIZE: &str = "APIMCFG_CACHE_SIZE";
pub const ENV_DATA_DIR: &str = "APIMCFG_DATA_DIR";

#[derive(Clone, Debug)]
pub struct ConfigStoreOpts {
	pub governance_base: Box<str>,
	pub everyone_role: Box<str>,
	pub tenant_config_cache_name: Box<str>,
	pub cache_size: usize,
	pub data_dir: Box<Path>,
}

impl Default for ConfigStoreOpts {
	fn default() -> Self {
		Self {
			governance_base: GOVERNANCE_REGISTRY_BASE_PATH.into(),
			everyone_role: EVERYONE_ROLE.into(),
			tenant_config_cache_name: TENANT_CONFIG_CACHE_NAME.into(),
			cache_size: DEFAULT_CACHE_SIZE,
			data_dir: PathBuf::from("./data").into(),
		}
	}
}

impl ConfigStoreOpts {
	/// Loads options from the process environment
	pub fn from_env() -> ClResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads options from an arbitrary key lookup, unset keys keep their defaults
	pub fn from_lookup<F>(lookup: F) -> ClResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut opts = Self::default();

		if let Some(base) = lookup(ENV_GOVERNANCE_BASE) {
			opts.governance_base(base);
		}
		if let Some(role) = lookup(ENV_EVERYONE_ROLE) {
			opts.everyone_role(role);
		}
		if let Some(name) = lookup(ENV_TENANT_CONFIG_CACHE_NAME) {
			opts.tenant_config_cache_name(name);
		}
		if let Some(size) = lookup(ENV_CACHE_SIZE) {
			let size = size.trim().parse::<usize>().map_err(|e| {
				Error::ConfigError(format!("Invalid {} value '{}': {}", ENV_CACHE_SIZE, size, e))
			})?;
			opts.cache_size(size);
		}
		if let Some(dir) = lookup(ENV_DATA_DIR) {
			opts.data_dir(PathBuf::from(dir));
		}

		opts.validate()?;
		Ok(opts)
	}

	pub fn validate(&self) -> ClResult<()> {
		if !self.governance_base.starts_with('/') {
			return Err(Error::ConfigError(format!(
				"Governance base path must be absolute: {}",
				self.governance_base
			)));
		}
		if self.everyone_role.is_empty() {
			return Err(Error::ConfigError("Everyone role must not be empty".into()));
		}
		if self.cache_size == 0 {
			return Err(Error::ConfigError("Cache size must be positive".into()));
		}
		Ok(())
	}

	pub fn governance_base(&mut self, base: impl Into<Box<str>>) -> &mut Self {
		self.governance_base = base.into();
		self
	}
	pub fn everyone_role(&mut self, role: impl Into<Box<str>>) -> &mut Self {
		self.everyone_role = role.into();
		self
	}
	pub fn tenant_config_cache_name(&mut self, name: impl Into<Box<str>>) -> &mut Self {
		self.tenant_config_cache_name = name.into();
		self
	}
	pub fn cache_size(&mut self, size: usize) -> &mut Self {
		self.cache_size = size;
		self
	}
	pub fn data_dir(&mut self, dir: impl Into<Box<Path>>) -> &mut Self {
		self.data_dir = dir.into();
		self
	}

	/// Storage root of the filesystem registry adapter
	pub fn registry_dir(&self) -> PathBuf {
		self.data_dir.join("registry")
	}

	/// Directory holding the user store database
	pub fn db_dir(&self) -> PathBuf {
		self.data_dir.join("db")
	}

	/// Absolute registry path of a slot, as used by access-control rules
	pub fn absolute_path(&self, slot: ConfigSlot) -> String {
		format!("{}{}", self.governance_base.trim_end_matches('/'), slot.path())
	}
}


// vim: ts=4
