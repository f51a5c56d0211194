//! In-memory adapters recording how the config store and user store use them
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use apimcfg_core::cache::TenantConfigCache;
use apimcfg_core::config_store::ConfigStore;
use apimcfg_core::logging;
use apimcfg_core::opts::ConfigStoreOpts;
use apimcfg_core::prelude::*;
use apimcfg_core::user_store::UserStoreService;
use apimcfg_types::{
	access_adapter::AccessAdapter,
	cache::ConfigCache,
	registry_adapter::RegistryAdapter,
	tenant_adapter::TenantAdapter,
	types::{Action, Resource},
	user_adapter::UserAdapter,
};

/// Shared, ordered log of side effects across fakes
pub type EventLog = Arc<Mutex<Vec<String>>>;

// Tenants
//*********
#[derive(Debug, Default)]
pub struct FakeTenants {
	pub tenants: Mutex<HashMap<String, TnId>>,
	pub loaded: Mutex<Vec<TnId>>,
	pub fail_load: AtomicBool,
}

impl FakeTenants {
	pub fn with(domains: &[(&str, i32)]) -> Self {
		let tenants = domains.iter().map(|(d, id)| ((*d).to_string(), TnId(*id))).collect();
		Self { tenants: Mutex::new(tenants), ..Self::default() }
	}
}

#[async_trait]
impl TenantAdapter for FakeTenants {
	async fn resolve_tenant_id(&self, org: &Organization) -> ClResult<TnId> {
		if org.is_super_tenant() {
			return Ok(TnId::SUPER);
		}
		self.tenants.lock().get(org.as_str()).copied().ok_or(Error::NotFound)
	}

	async fn ensure_tenant_loaded(&self, tn_id: TnId) -> ClResult<()> {
		if self.fail_load.load(Ordering::SeqCst) {
			return Err(Error::Io(std::io::Error::other("tenant storage unavailable")));
		}
		self.loaded.lock().push(tn_id);
		Ok(())
	}
}

// Registry
//**********
#[derive(Debug, Default)]
pub struct FakeRegistry {
	pub resources: Mutex<HashMap<(TnId, String), Resource>>,
	pub fail: AtomicBool,
	pub events: EventLog,
}

impl FakeRegistry {
	pub fn resource(&self, tn_id: TnId, path: &str) -> Option<Resource> {
		self.resources.lock().get(&(tn_id, path.to_string())).cloned()
	}

	pub fn set_failing(&self, fail: bool) {
		self.fail.store(fail, Ordering::SeqCst);
	}

	fn check(&self) -> ClResult<()> {
		if self.fail.load(Ordering::SeqCst) {
			return Err(Error::Io(std::io::Error::other("registry unavailable")));
		}
		Ok(())
	}
}

#[async_trait]
impl RegistryAdapter for FakeRegistry {
	async fn exists(&self, tn_id: TnId, path: &str) -> ClResult<bool> {
		self.check()?;
		Ok(self.resources.lock().contains_key(&(tn_id, path.to_string())))
	}

	async fn get(&self, tn_id: TnId, path: &str) -> ClResult<Option<Resource>> {
		self.check()?;
		Ok(self.resource(tn_id, path))
	}

	async fn put(&self, tn_id: TnId, path: &str, resource: Resource) -> ClResult<()> {
		self.check()?;
		self.events.lock().push(format!("put:{}", path));
		self.resources.lock().insert((tn_id, path.to_string()), resource);
		Ok(())
	}
}

// Access
//********
#[derive(Debug, Default)]
pub struct FakeAccess {
	/// Successful deny grants only
	pub denied: Mutex<Vec<(TnId, String, String, Action)>>,
	pub fail: AtomicBool,
}

#[async_trait]
impl AccessAdapter for FakeAccess {
	async fn deny_role(
		&self,
		tn_id: TnId,
		role: &str,
		absolute_path: &str,
		action: Action,
	) -> ClResult<()> {
		if self.fail.load(Ordering::SeqCst) {
			return Err(Error::DbError);
		}
		self.denied.lock().push((tn_id, role.to_string(), absolute_path.to_string(), action));
		Ok(())
	}
}

// Cache
//*******
/// LRU cache that also logs evictions
#[derive(Debug)]
pub struct RecordingCache {
	pub inner: TenantConfigCache,
	pub events: EventLog,
}

impl ConfigCache for RecordingCache {
	fn get(&self, key: &str) -> Option<String> {
		self.inner.get(key)
	}

	fn put(&self, key: &str, value: String) {
		self.inner.put(key, value);
	}

	fn evict(&self, key: &str) {
		self.events.lock().push(format!("evict:{}", key));
		self.inner.evict(key);
	}
}

// Users
//*******
#[derive(Debug, Clone)]
pub struct FakeUser {
	pub password: &'static str,
	pub user_store: &'static str,
	pub roles: Vec<&'static str>,
}

#[derive(Debug, Default)]
pub struct FakeUsers {
	pub users: HashMap<(TnId, &'static str), FakeUser>,
	pub fail: AtomicBool,
	pub role_lookups: Mutex<Vec<String>>,
}

impl FakeUsers {
	pub fn add(&mut self, tn_id: TnId, name: &'static str, user: FakeUser) {
		self.users.insert((tn_id, name), user);
	}

	fn lookup(&self, tn_id: TnId, user_name: &str) -> ClResult<Option<&FakeUser>> {
		if self.fail.load(Ordering::SeqCst) {
			return Err(Error::DbError);
		}
		let name = user_name.split_once('/').map_or(user_name, |(_, name)| name);
		Ok(self.users.iter().find(|((t, n), _)| *t == tn_id && *n == name).map(|(_, u)| u))
	}
}

#[async_trait]
impl UserAdapter for FakeUsers {
	async fn authenticate(&self, tn_id: TnId, user_name: &str, password: &str) -> ClResult<bool> {
		Ok(self.lookup(tn_id, user_name)?.is_some_and(|u| u.password == password))
	}

	async fn role_list_of_user(&self, tn_id: TnId, user_name: &str) -> ClResult<Box<[Box<str>]>> {
		self.role_lookups.lock().push(user_name.to_string());
		let user = self.lookup(tn_id, user_name)?.ok_or(Error::NotFound)?;
		Ok(user.roles.iter().map(|r| Box::from(*r)).collect())
	}

	async fn user_store_domain(&self, tn_id: TnId, user_name: &str) -> ClResult<Option<Box<str>>> {
		Ok(self.lookup(tn_id, user_name)?.map(|u| Box::from(u.user_store)))
	}
}

// Fixtures
//**********
pub struct StoreFixture {
	pub store: ConfigStore,
	pub tenants: Arc<FakeTenants>,
	pub registry: Arc<FakeRegistry>,
	pub access: Arc<FakeAccess>,
	pub cache: Arc<RecordingCache>,
	pub events: EventLog,
}

/// Config store over fakes. Knows the tenants `wso2.com` (1) and `acme.org` (2).
pub fn config_store() -> StoreFixture {
	logging::init_test_tracing();
	let events = EventLog::default();
	let tenants = Arc::new(FakeTenants::with(&[("wso2.com", 1), ("acme.org", 2)]));
	let registry = Arc::new(FakeRegistry { events: events.clone(), ..FakeRegistry::default() });
	let access = Arc::new(FakeAccess::default());
	let cache =
		Arc::new(RecordingCache { inner: TenantConfigCache::new(16), events: events.clone() });

	let store = ConfigStore::new(
		tenants.clone(),
		registry.clone(),
		access.clone(),
		cache.clone(),
		ConfigStoreOpts::default(),
	);
	StoreFixture { store, tenants, registry, access, cache, events }
}

pub fn user_store(users: FakeUsers) -> (UserStoreService, Arc<FakeUsers>) {
	logging::init_test_tracing();
	let tenants = Arc::new(FakeTenants::with(&[("wso2.com", 1)]));
	let users = Arc::new(users);
	(UserStoreService::new(tenants, users.clone()), users)
}

// vim: ts=4
