//! Role permissions on registry paths

use sqlx::{Row, SqlitePool};

use apimcfg_types::{prelude::*, types::Action};

use crate::inspect;

/// Store a deny rule, replacing any earlier rule for the same role, path and action
pub(crate) async fn deny(
	db: &SqlitePool,
	tn_id: TnId,
	role: &str,
	path: &str,
	action: Action,
) -> ClResult<()> {
	sqlx::query(
		"INSERT OR REPLACE INTO permissions (tn_id, role, path, action, allowed)
		VALUES (?1, ?2, ?3, ?4, 0)",
	)
	.bind(tn_id.0)
	.bind(role)
	.bind(path)
	.bind(action.as_str())
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	Ok(())
}

pub(crate) async fn is_denied(
	db: &SqlitePool,
	tn_id: TnId,
	role: &str,
	path: &str,
	action: Action,
) -> ClResult<bool> {
	let row = sqlx::query(
		"SELECT allowed FROM permissions WHERE tn_id = ?1 AND role = ?2 AND path = ?3 AND action = ?4",
	)
	.bind(tn_id.0)
	.bind(role)
	.bind(path)
	.bind(action.as_str())
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	match row {
		Some(row) => {
			let allowed: bool = row.try_get("allowed").inspect_err(inspect).map_err(|_| Error::DbError)?;
			Ok(!allowed)
		}
		None => Ok(false),
	}
}

// vim: ts=4
