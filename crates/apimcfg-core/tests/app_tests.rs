//! End-to-end wiring with the filesystem registry and the SQLite user store

use std::sync::Arc;

use apimcfg_core::prelude::*;
use apimcfg_core::{App, AppBuilder, ConfigStoreOpts};
use apimcfg_registry_adapter_fs::RegistryAdapterFs;
use apimcfg_types::access_adapter::EVERYONE_ROLE;
use apimcfg_types::types::Action;
use apimcfg_types::worker::WorkerPool;
use apimcfg_user_adapter_sqlite::UserAdapterSqlite;
use tempfile::TempDir;

async fn create_app() -> (App, Arc<UserAdapterSqlite>, TempDir) {
	let tmp_dir = TempDir::new().expect("Failed to create temp directory");
	let mut opts = ConfigStoreOpts::default();
	opts.data_dir(tmp_dir.path());

	let worker = Arc::new(WorkerPool::new(1, 1));
	let users = Arc::new(
		UserAdapterSqlite::new(worker, opts.db_dir())
			.await
			.expect("Failed to create user adapter"),
	);
	let registry = Arc::new(
		RegistryAdapterFs::new(opts.registry_dir())
			.await
			.expect("Failed to create registry adapter"),
	);

	let app = AppBuilder::new()
		.opts(opts)
		.tenant_adapter(users.clone())
		.registry_adapter(registry)
		.access_adapter(users.clone())
		.user_adapter(users.clone())
		.build()
		.expect("Failed to build app");
	(app, users, tmp_dir)
}

#[test]
fn test_build_requires_adapters() {
	let res = AppBuilder::new().build();
	assert!(matches!(res, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn test_config_lifecycle() {
	let (app, users, _tmp) = create_app().await;
	let tn_id = users.create_tenant("wso2.com").await.expect("create tenant");
	let store = &app.config_store;

	store
		.add_tenant_config(Some("wso2.com"), r#"{"SelfSignUp":{"RoleNames":["subscriber"]}}"#)
		.await
		.expect("create");
	assert!(users.is_tenant_loaded(tn_id).await.expect("is loaded"));

	store
		.update_tenant_config(Some("wso2.com"), r#"{"SelfSignUp":{"RoleNames":[]}}"#)
		.await
		.expect("update");
	let signup = store
		.self_signup_config(Some("wso2.com"))
		.await
		.expect("self signup")
		.expect("self signup section should exist");
	assert!(signup.roles.is_empty());

	assert!(store.tenant_config(None).await.expect("read").is_none());
}

#[tokio::test]
async fn test_external_stores_are_restricted() {
	let (app, users, _tmp) = create_app().await;
	app.config_store.add_external_store_config(None, "<ExternalAPIStores/>").await.expect("create");

	let path = "/_system/governance/apimgt/externalstores/external-api-stores.xml";
	assert!(users.is_role_denied(TnId::SUPER, EVERYONE_ROLE, path, Action::Get).await.expect("check"));
}

#[tokio::test]
async fn test_user_authentication_info() {
	let (app, users, _tmp) = create_app().await;
	let tn_id = users.create_tenant("wso2.com").await.expect("create tenant");
	users.create_user(tn_id, "alice", "s3cret", Some("ldap")).await.expect("create user");
	users.add_user_role(tn_id, "alice", "subscriber").await.expect("add role");

	let info = app
		.user_store
		.authentication_info("alice@wso2.com", "s3cret")
		.await
		.expect("auth info");
	assert!(info.authenticated);
	assert_eq!(info.domain_qualified_username.as_deref(), Some("LDAP/alice@wso2.com"));
	let roles: Vec<&str> = info.roles.iter().map(|r| &**r).collect();
	assert_eq!(roles, vec!["subscriber", EVERYONE_ROLE]);

	assert!(!app.user_store.authenticate("alice@wso2.com", "nope").await.expect("auth"));
}

// vim: ts=4
