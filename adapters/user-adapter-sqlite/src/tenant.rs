//! Tenant registry: domain to tenant id mapping and lazy provisioning

use sqlx::{Row, SqlitePool};

use apimcfg_types::prelude::*;

use crate::inspect;

/// Resolve an organization to its tenant id
pub(crate) async fn resolve(db: &SqlitePool, org: &Organization) -> ClResult<TnId> {
	if org.is_super_tenant() {
		return Ok(TnId::SUPER);
	}

	let row = sqlx::query("SELECT tn_id FROM tenants WHERE domain = ?1")
		.bind(org.as_str())
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	match row {
		Some(row) => row.try_get("tn_id").map(TnId).inspect_err(inspect).map_err(|_| Error::DbError),
		None => {
			debug!(org = %org, "Unknown tenant domain");
			Err(Error::NotFound)
		}
	}
}

/// Mark a tenant's storage as loaded, first call wins
pub(crate) async fn ensure_loaded(db: &SqlitePool, tn_id: TnId) -> ClResult<()> {
	let res = sqlx::query(
		"UPDATE tenants SET loaded_at = unixepoch() WHERE tn_id = ?1 AND loaded_at IS NULL",
	)
	.bind(tn_id.0)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() > 0 {
		info!(tn_id = %tn_id, "Tenant storage loaded");
		return Ok(());
	}

	// Either already loaded or unknown
	if is_loaded(db, tn_id).await? { Ok(()) } else { Err(Error::NotFound) }
}

pub(crate) async fn is_loaded(db: &SqlitePool, tn_id: TnId) -> ClResult<bool> {
	let row = sqlx::query("SELECT loaded_at FROM tenants WHERE tn_id = ?1")
		.bind(tn_id.0)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	match row {
		Some(row) => {
			let loaded_at: Option<i64> =
				row.try_get("loaded_at").inspect_err(inspect).map_err(|_| Error::DbError)?;
			Ok(loaded_at.is_some())
		}
		None => Err(Error::NotFound),
	}
}

/// Register a new tenant domain
pub(crate) async fn create(db: &SqlitePool, domain: &str) -> ClResult<TnId> {
	let org = Organization::normalize(Some(domain));
	if org.is_super_tenant() || org.as_str() != domain {
		return Err(Error::ValidationError(format!("invalid tenant domain: '{}'", domain)));
	}

	let row = sqlx::query("INSERT INTO tenants (domain) VALUES (?1) RETURNING tn_id")
		.bind(domain)
		.fetch_one(db)
		.await
		.map_err(|err| match err {
			sqlx::Error::Database(e) if e.is_unique_violation() => {
				Error::ValidationError(format!("tenant already exists: {}", domain))
			}
			err => {
				inspect(&err);
				Error::DbError
			}
		})?;

	let tn_id = row.try_get("tn_id").map(TnId).inspect_err(inspect).map_err(|_| Error::DbError)?;
	info!(tn_id = %tn_id, domain = %domain, "Tenant created");
	Ok(tn_id)
}

// vim: ts=4
