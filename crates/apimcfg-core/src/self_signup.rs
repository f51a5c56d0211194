//! Self-signup configuration embedded in a tenant config document

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prelude::*;

/// Key of the self-signup object inside the tenant config
pub const SELF_SIGN_UP_NAME: &str = "SelfSignUp";
/// Key of the role list inside the self-signup object
pub const SELF_SIGN_UP_REG_ROLES_ELEM: &str = "RoleNames";

/// Roles assigned to users registering themselves
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfSignupConfig {
	pub roles: Vec<Box<str>>,
}

/// Extracts the self-signup configuration from a tenant config document.
///
/// Returns `Ok(None)` when the document has no `SelfSignUp` key. A missing
/// role list yields an empty config.
pub fn parse_self_signup(tenant_config: &str) -> ClResult<Option<SelfSignupConfig>> {
	let value: Value = serde_json::from_str(tenant_config)?;
	let Value::Object(tenant_config) = value else {
		return Err(Error::Parse("tenant config is not a JSON object".into()));
	};

	let Some(self_signup) = tenant_config.get(SELF_SIGN_UP_NAME) else {
		return Ok(None);
	};
	let Value::Object(self_signup) = self_signup else {
		return Err(Error::Parse(format!("{} is not a JSON object", SELF_SIGN_UP_NAME)));
	};

	let roles = match self_signup.get(SELF_SIGN_UP_REG_ROLES_ELEM) {
		None | Some(Value::Null) => Vec::new(),
		Some(Value::Array(roles)) => roles.iter().map(role_name).collect::<ClResult<_>>()?,
		Some(_) => {
			return Err(Error::Parse(format!(
				"{}.{} is not an array",
				SELF_SIGN_UP_NAME, SELF_SIGN_UP_REG_ROLES_ELEM
			)));
		}
	};

	Ok(Some(SelfSignupConfig { roles }))
}

fn role_name(value: &Value) -> ClResult<Box<str>> {
	match value {
		Value::String(s) => Ok(s.as_str().into()),
		Value::Number(n) => Ok(n.to_string().into()),
		Value::Bool(b) => Ok(b.to_string().into()),
		_ => Err(Error::Parse(format!("invalid role name: {}", value))),
	}
}


// vim: ts=4
