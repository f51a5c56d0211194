//! Password hashing, always run on the worker pool

use apimcfg_types::{
	prelude::*,
	worker::{Priority, WorkerPool},
};

const BCRYPT_COST: u32 = 10;

fn generate_password_hash_sync(password: Box<str>) -> ClResult<Box<str>> {
	let hash = bcrypt::hash(password.as_ref(), BCRYPT_COST)
		.map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))?;
	Ok(hash.into())
}

pub(crate) async fn generate_password_hash(
	worker: &WorkerPool,
	password: Box<str>,
) -> ClResult<Box<str>> {
	worker.try_spawn(Priority::Low, move || generate_password_hash_sync(password)).await
}

fn check_password_sync(password: Box<str>, password_hash: Box<str>) -> ClResult<bool> {
	bcrypt::verify(password.as_ref(), &password_hash).map_err(|e| {
		debug!("Stored password hash is invalid: {}", e);
		Error::DbError
	})
}

pub(crate) async fn check_password(
	worker: &WorkerPool,
	password: Box<str>,
	password_hash: Box<str>,
) -> ClResult<bool> {
	worker.try_spawn(Priority::High, move || check_password_sync(password, password_hash)).await
}

// vim: ts=4
