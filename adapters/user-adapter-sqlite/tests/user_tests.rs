//! Credential verification and role lookup tests

use std::sync::Arc;

use apimcfg_types::access_adapter::EVERYONE_ROLE;
use apimcfg_types::prelude::*;
use apimcfg_types::user_adapter::UserAdapter;
use apimcfg_types::worker::WorkerPool;
use apimcfg_user_adapter_sqlite::UserAdapterSqlite;
use tempfile::TempDir;

async fn create_test_adapter() -> (UserAdapterSqlite, TempDir) {
	let tmp_dir = TempDir::new().expect("Failed to create temp directory");
	let worker = Arc::new(WorkerPool::new(1, 1));
	let adapter = UserAdapterSqlite::new(worker, tmp_dir.path()).await.expect("Failed to create adapter");
	(adapter, tmp_dir)
}

#[tokio::test]
async fn test_password_verification() {
	let (adapter, _tmp) = create_test_adapter().await;
	let tn_id = adapter.create_tenant("wso2.com").await.expect("create tenant");
	adapter.create_user(tn_id, "alice", "correct_password_123", None).await.expect("create user");

	assert!(adapter.authenticate(tn_id, "alice", "correct_password_123").await.expect("auth"));
	assert!(!adapter.authenticate(tn_id, "alice", "wrong_password").await.expect("auth"));
	assert!(!adapter.authenticate(tn_id, "mallory", "correct_password_123").await.expect("auth"));
}

#[tokio::test]
async fn test_users_are_tenant_scoped() {
	let (adapter, _tmp) = create_test_adapter().await;
	let tn_id = adapter.create_tenant("wso2.com").await.expect("create tenant");
	adapter.create_user(tn_id, "alice", "secret", None).await.expect("create user");

	assert!(!adapter.authenticate(TnId::SUPER, "alice", "secret").await.expect("auth"));
}

#[tokio::test]
async fn test_role_list_includes_everyone() {
	let (adapter, _tmp) = create_test_adapter().await;
	let tn_id = TnId::SUPER;
	adapter.create_user(tn_id, "bob", "secret", None).await.expect("create user");
	adapter.add_user_role(tn_id, "bob", "subscriber").await.expect("add role");
	adapter.add_user_role(tn_id, "bob", "creator").await.expect("add role");
	adapter.add_user_role(tn_id, "bob", "creator").await.expect("add role twice");

	let roles = adapter.role_list_of_user(tn_id, "bob").await.expect("roles");
	let roles: Vec<&str> = roles.iter().map(|r| &**r).collect();
	assert_eq!(roles, vec!["creator", "subscriber", EVERYONE_ROLE]);
}

#[tokio::test]
async fn test_roles_of_unknown_user() {
	let (adapter, _tmp) = create_test_adapter().await;
	let res = adapter.role_list_of_user(TnId::SUPER, "ghost").await;
	assert!(matches!(res, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_secondary_user_store() {
	let (adapter, _tmp) = create_test_adapter().await;
	let tn_id = TnId::SUPER;
	adapter.create_user(tn_id, "carol", "secret", Some("ldap")).await.expect("create user");
	adapter.add_user_role(tn_id, "carol", "admin").await.expect("add role");

	let store = adapter.user_store_domain(tn_id, "carol").await.expect("user store");
	assert_eq!(store.as_deref(), Some("LDAP"));

	let qualified = adapter.add_domain_to_name("carol", store.as_deref());
	assert_eq!(&*qualified, "LDAP/carol");

	// Qualified names resolve to the same user, a wrong store does not
	assert!(adapter.authenticate(tn_id, "LDAP/carol", "secret").await.expect("auth"));
	assert!(!adapter.authenticate(tn_id, "AD/carol", "secret").await.expect("auth"));
	let roles = adapter.role_list_of_user(tn_id, "LDAP/carol").await.expect("roles");
	assert!(roles.iter().any(|r| &**r == "admin"));
}

#[tokio::test]
async fn test_primary_user_store_has_no_prefix() {
	let (adapter, _tmp) = create_test_adapter().await;
	adapter.create_user(TnId::SUPER, "dave", "secret", None).await.expect("create user");

	let store = adapter.user_store_domain(TnId::SUPER, "dave").await.expect("user store");
	assert_eq!(store.as_deref(), Some("PRIMARY"));
	assert_eq!(&*adapter.add_domain_to_name("dave", store.as_deref()), "dave");
	assert!(adapter.user_store_domain(TnId::SUPER, "nobody").await.expect("user store").is_none());
}

#[tokio::test]
async fn test_invalid_user_names() {
	let (adapter, _tmp) = create_test_adapter().await;
	for name in ["", "LDAP/eve", "eve@wso2.com"] {
		let res = adapter.create_user(TnId::SUPER, name, "secret", None).await;
		assert!(matches!(res, Err(Error::ValidationError(_))), "accepted {:?}", name);
	}
	adapter.create_user(TnId::SUPER, "eve", "secret", None).await.expect("create user");
	let res = adapter.create_user(TnId::SUPER, "eve", "other", None).await;
	assert!(matches!(res, Err(Error::ValidationError(_))));
}

// vim: ts=4
