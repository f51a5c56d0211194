//! Remote user store facade. Validates credentials and lists roles for users of any tenant.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::sync::Arc;

use apimcfg_types::{
	tenant_adapter::TenantAdapter,
	user_adapter::UserAdapter,
	utils::{split_tenant_domain, tenant_aware_username},
};

use crate::prelude::*;

/// Result of a combined credential check and role lookup
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationInfo {
	pub authenticated: bool,
	pub domain_qualified_username: Option<Box<str>>,
	pub roles: Vec<Box<str>>,
}

#[derive(Debug)]
pub struct UserStoreService {
	tenants: Arc<dyn TenantAdapter>,
	users: Arc<dyn UserAdapter>,
}

/// Logs a user management failure and turns it into an `Error::Auth`
fn auth_error(msg: String, err: &Error) -> Error {
	error!(error = %err, "{}", msg);
	Error::Auth(msg)
}

impl UserStoreService {
	pub fn new(tenants: Arc<dyn TenantAdapter>, users: Arc<dyn UserAdapter>) -> Self {
		Self { tenants, users }
	}

	/// Splits a qualified username into its tenant id and tenant-aware name
	async fn resolve_user<'a>(&self, username: &'a str) -> ClResult<(TnId, &'a str)> {
		let (user_name, domain) = split_tenant_domain(username);
		let tn_id = self.tenants.resolve_tenant_id(&Organization::normalize(domain)).await?;
		Ok((tn_id, user_name))
	}

	/// Validates a username (including tenant domain) and password
	pub async fn authenticate(&self, username: &str, password: &str) -> ClResult<bool> {
		let res = async {
			let (tn_id, user_name) = self.resolve_user(username).await?;
			self.users.authenticate(tn_id, user_name, password).await
		}
		.await;

		res.map_err(|err| {
			auth_error(format!("Error occurred while validating credentials of user {}", username), &err)
		})
	}

	/// Roles of a user (including tenant domain)
	pub async fn user_roles(&self, username: &str) -> ClResult<Vec<Box<str>>> {
		let res = async {
			let (tn_id, user_name) = self.resolve_user(username).await?;
			self.users.role_list_of_user(tn_id, user_name).await
		}
		.await;

		res.map(Vec::from).map_err(|err| {
			auth_error(format!("Error occurred retrieving roles of user {}", username), &err)
		})
	}

	/// Validates credentials and, on success, returns the user-store-qualified name and roles
	pub async fn authentication_info(
		&self,
		username: &str,
		password: &str,
	) -> ClResult<AuthenticationInfo> {
		let res = async {
			let (tn_id, user_name) = self.resolve_user(username).await?;
			if !self.users.authenticate(tn_id, user_name, password).await? {
				debug!(username = %username, "Authentication failed");
				return Ok(AuthenticationInfo::default());
			}

			let domain = self.users.user_store_domain(tn_id, user_name).await?;
			let qualified = self.users.add_domain_to_name(username, domain.as_deref());
			// Roles must be looked up with the user store qualified name
			let roles = self.users.role_list_of_user(tn_id, tenant_aware_username(&qualified)).await?;

			Ok::<_, Error>(AuthenticationInfo {
				authenticated: true,
				domain_qualified_username: Some(qualified),
				roles: roles.into(),
			})
		}
		.await;

		res.map_err(|err| {
			auth_error(
				format!("Error occurred while retrieving user authentication info of user {}", username),
				&err,
			)
		})
	}
}

// vim: ts=4
