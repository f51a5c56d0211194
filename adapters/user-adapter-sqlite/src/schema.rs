//! Database schema initialization

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Tenants
	//*********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS tenants (
		tn_id integer NOT NULL,
		domain text NOT NULL,
		loaded_at datetime,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(tn_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_tenants_domain ON tenants(domain)")
		.execute(&mut *tx)
		.await?;

	// Users
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
		tn_id integer NOT NULL,
		user_name text NOT NULL,
		user_store text NOT NULL DEFAULT 'PRIMARY',
		password text NOT NULL,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(tn_id, user_name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS user_roles (
		tn_id integer NOT NULL,
		user_name text NOT NULL,
		role text NOT NULL,
		PRIMARY KEY(tn_id, user_name, role)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Permissions
	//*************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS permissions (
		tn_id integer NOT NULL,
		role text NOT NULL,
		path text NOT NULL,
		action text NOT NULL,
		allowed integer NOT NULL,
		PRIMARY KEY(tn_id, role, path, action)
	)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
