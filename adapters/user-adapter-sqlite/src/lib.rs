//! SQLite-backed tenant registry, user store and permission store.
//!
//! One database serves all three adapter traits: tenant resolution and
//! lazy provisioning, credential checks with role lookup, and deny rules
//! on registry paths.

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use apimcfg_types::{
	access_adapter::AccessAdapter, prelude::*, tenant_adapter::TenantAdapter, types::Action,
	user_adapter::UserAdapter, worker::WorkerPool,
};

mod crypto;
mod permission;
mod schema;
mod tenant;
mod user;

/// Callers report the failure, this only keeps the sqlx detail
pub(crate) fn inspect(err: &sqlx::Error) {
	debug!("DB: {:#?}", err);
}

#[derive(Debug)]
pub struct UserAdapterSqlite {
	db: SqlitePool,
	worker: Arc<WorkerPool>,
}

impl UserAdapterSqlite {
	/// Opens (or creates) `users.db` in `db_dir`
	pub async fn new(worker: Arc<WorkerPool>, db_dir: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(db_dir.as_ref()).await?;
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(db_dir.as_ref().join("users.db"))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;

		Ok(Self { db, worker })
	}

	// Management helpers
	//********************
	/// Registers a tenant domain and returns its new id
	pub async fn create_tenant(&self, domain: &str) -> ClResult<TnId> {
		tenant::create(&self.db, domain).await
	}

	pub async fn is_tenant_loaded(&self, tn_id: TnId) -> ClResult<bool> {
		tenant::is_loaded(&self.db, tn_id).await
	}

	/// Creates a user in a tenant. `user_store` defaults to the primary store.
	pub async fn create_user(
		&self,
		tn_id: TnId,
		user_name: &str,
		password: &str,
		user_store: Option<&str>,
	) -> ClResult<()> {
		user::create(&self.db, &self.worker, tn_id, user_name, password, user_store).await
	}

	pub async fn add_user_role(&self, tn_id: TnId, user_name: &str, role: &str) -> ClResult<()> {
		user::add_role(&self.db, tn_id, user_name, role).await
	}

	pub async fn is_role_denied(
		&self,
		tn_id: TnId,
		role: &str,
		path: &str,
		action: Action,
	) -> ClResult<bool> {
		permission::is_denied(&self.db, tn_id, role, path, action).await
	}
}

#[async_trait]
impl TenantAdapter for UserAdapterSqlite {
	async fn resolve_tenant_id(&self, org: &Organization) -> ClResult<TnId> {
		tenant::resolve(&self.db, org).await
	}

	async fn ensure_tenant_loaded(&self, tn_id: TnId) -> ClResult<()> {
		tenant::ensure_loaded(&self.db, tn_id).await
	}
}

#[async_trait]
impl AccessAdapter for UserAdapterSqlite {
	async fn deny_role(
		&self,
		tn_id: TnId,
		role: &str,
		absolute_path: &str,
		action: Action,
	) -> ClResult<()> {
		permission::deny(&self.db, tn_id, role, absolute_path, action).await
	}
}

#[async_trait]
impl UserAdapter for UserAdapterSqlite {
	async fn authenticate(&self, tn_id: TnId, user_name: &str, password: &str) -> ClResult<bool> {
		user::authenticate(&self.db, &self.worker, tn_id, user_name, password).await
	}

	async fn role_list_of_user(&self, tn_id: TnId, user_name: &str) -> ClResult<Box<[Box<str>]>> {
		user::roles(&self.db, tn_id, user_name).await
	}

	async fn user_store_domain(&self, tn_id: TnId, user_name: &str) -> ClResult<Option<Box<str>>> {
		user::user_store(&self.db, tn_id, user_name).await
	}
}


// vim: ts=4
