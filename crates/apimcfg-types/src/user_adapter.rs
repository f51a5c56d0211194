//! Adapter that verifies credentials and lists roles of users in a tenant's user store.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

/// Name of the primary user store. Users in it carry no domain prefix.
pub const PRIMARY_DOMAIN: &str = "PRIMARY";

#[async_trait]
pub trait UserAdapter: Debug + Send + Sync {
	/// Checks a tenant-aware username (no tenant domain suffix) and password
	async fn authenticate(&self, tn_id: TnId, user_name: &str, password: &str) -> ClResult<bool>;

	async fn role_list_of_user(&self, tn_id: TnId, user_name: &str) -> ClResult<Box<[Box<str>]>>;

	/// Name of the user store holding `user_name`, `None` if the user is unknown
	async fn user_store_domain(&self, tn_id: TnId, user_name: &str) -> ClResult<Option<Box<str>>>;

	/// Qualifies a name with its user store domain (`STORE/name`)
	fn add_domain_to_name(&self, user_name: &str, domain: Option<&str>) -> Box<str> {
		crate::utils::add_domain_to_name(user_name, domain)
	}
}

// vim: ts=4
