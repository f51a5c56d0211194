//! Users, passwords and role membership

use sqlx::{Row, SqlitePool};

use apimcfg_types::{
	access_adapter::EVERYONE_ROLE, prelude::*, user_adapter::PRIMARY_DOMAIN, worker::WorkerPool,
};

use crate::{crypto, inspect};

/// Splits an optional user store prefix: `LDAP/bob` -> `(Some("LDAP"), "bob")`
pub(crate) fn split_user_store(user_name: &str) -> (Option<&str>, &str) {
	match user_name.split_once('/') {
		Some((store, name)) if !store.is_empty() => (Some(store), name),
		_ => (None, user_name),
	}
}

struct UserRow {
	user_store: Box<str>,
	password: Box<str>,
}

/// Looks a user up, honoring an explicit user store prefix
async fn read_user(db: &SqlitePool, tn_id: TnId, user_name: &str) -> ClResult<Option<UserRow>> {
	let (store, name) = split_user_store(user_name);
	let row = sqlx::query("SELECT user_store, password FROM users WHERE tn_id = ?1 AND user_name = ?2")
		.bind(tn_id.0)
		.bind(name)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let Some(row) = row else {
		return Ok(None);
	};
	let user = UserRow {
		user_store: row.try_get("user_store").inspect_err(inspect).map_err(|_| Error::DbError)?,
		password: row.try_get("password").inspect_err(inspect).map_err(|_| Error::DbError)?,
	};

	match store {
		Some(store) if !store.eq_ignore_ascii_case(&user.user_store) => Ok(None),
		_ => Ok(Some(user)),
	}
}

pub(crate) async fn authenticate(
	db: &SqlitePool,
	worker: &WorkerPool,
	tn_id: TnId,
	user_name: &str,
	password: &str,
) -> ClResult<bool> {
	let Some(user) = read_user(db, tn_id, user_name).await? else {
		debug!(tn_id = %tn_id, user_name = %user_name, "Unknown user");
		return Ok(false);
	};

	crypto::check_password(worker, password.into(), user.password).await
}

/// Roles of a user. Every existing user also belongs to the everyone role.
pub(crate) async fn roles(db: &SqlitePool, tn_id: TnId, user_name: &str) -> ClResult<Box<[Box<str>]>> {
	if read_user(db, tn_id, user_name).await?.is_none() {
		return Err(Error::NotFound);
	}
	let (_, name) = split_user_store(user_name);

	let rows = sqlx::query("SELECT role FROM user_roles WHERE tn_id = ?1 AND user_name = ?2 ORDER BY role")
		.bind(tn_id.0)
		.bind(name)
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let mut roles = Vec::with_capacity(rows.len() + 1);
	for row in rows {
		let role: Box<str> = row.try_get("role").inspect_err(inspect).map_err(|_| Error::DbError)?;
		roles.push(role);
	}
	roles.push(EVERYONE_ROLE.into());

	Ok(roles.into_boxed_slice())
}

pub(crate) async fn user_store(
	db: &SqlitePool,
	tn_id: TnId,
	user_name: &str,
) -> ClResult<Option<Box<str>>> {
	Ok(read_user(db, tn_id, user_name).await?.map(|user| user.user_store))
}

pub(crate) async fn create(
	db: &SqlitePool,
	worker: &WorkerPool,
	tn_id: TnId,
	user_name: &str,
	password: &str,
	user_store: Option<&str>,
) -> ClResult<()> {
	if user_name.is_empty() || user_name.contains('/') || user_name.contains('@') {
		return Err(Error::ValidationError(format!("invalid user name: '{}'", user_name)));
	}
	let user_store = user_store.unwrap_or(PRIMARY_DOMAIN).to_uppercase();
	let password_hash = crypto::generate_password_hash(worker, password.into()).await?;

	sqlx::query("INSERT INTO users (tn_id, user_name, user_store, password) VALUES (?1, ?2, ?3, ?4)")
		.bind(tn_id.0)
		.bind(user_name)
		.bind(&user_store)
		.bind(password_hash.as_ref())
		.execute(db)
		.await
		.map_err(|err| match err {
			sqlx::Error::Database(e) if e.is_unique_violation() => {
				Error::ValidationError(format!("user already exists: {}", user_name))
			}
			err => {
				inspect(&err);
				Error::DbError
			}
		})?;

	info!(tn_id = %tn_id, user_name = %user_name, user_store = %user_store, "User created");
	Ok(())
}

pub(crate) async fn add_role(db: &SqlitePool, tn_id: TnId, user_name: &str, role: &str) -> ClResult<()> {
	sqlx::query("INSERT OR IGNORE INTO user_roles (tn_id, user_name, role) VALUES (?1, ?2, ?3)")
		.bind(tn_id.0)
		.bind(user_name)
		.bind(role)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(())
}


// vim: ts=4
