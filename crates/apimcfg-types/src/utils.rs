//! Username helpers for tenant-qualified and user-store-qualified names

use crate::user_adapter::PRIMARY_DOMAIN;

/// Splits `alice@wso2.com` into `("alice", Some("wso2.com"))`.
///
/// The tenant domain is whatever follows the last `@`.
pub fn split_tenant_domain(username: &str) -> (&str, Option<&str>) {
	match username.rsplit_once('@') {
		Some((user, domain)) if !domain.is_empty() => (user, Some(domain)),
		Some((user, _)) => (user, None),
		None => (username, None),
	}
}

/// Username with the tenant domain suffix stripped
pub fn tenant_aware_username(username: &str) -> &str {
	split_tenant_domain(username).0
}

/// Prefixes a name with its (upper-cased) user store domain.
///
/// Names already carrying a domain and users of the primary store are returned unchanged.
pub fn add_domain_to_name(user_name: &str, domain: Option<&str>) -> Box<str> {
	match domain {
		Some(domain)
			if !domain.is_empty()
				&& !user_name.contains('/')
				&& !domain.eq_ignore_ascii_case(PRIMARY_DOMAIN) =>
		{
			format!("{}/{}", domain.to_uppercase(), user_name).into()
		}
		_ => user_name.into(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_split_tenant_domain() {
		assert_eq!(split_tenant_domain("alice@wso2.com"), ("alice", Some("wso2.com")));
		assert_eq!(split_tenant_domain("alice"), ("alice", None));
		assert_eq!(split_tenant_domain("alice@"), ("alice", None));
		assert_eq!(
			split_tenant_domain("alice@mail.com@wso2.com"),
			("alice@mail.com", Some("wso2.com"))
		);
	}

	#[test]
	fn test_tenant_aware_username() {
		assert_eq!(tenant_aware_username("bob@acme.org"), "bob");
		assert_eq!(tenant_aware_username("LDAP/bob@acme.org"), "LDAP/bob");
		assert_eq!(tenant_aware_username("bob"), "bob");
	}

	#[test]
	fn test_add_domain_to_name() {
		assert_eq!(&*add_domain_to_name("bob", Some("ldap")), "LDAP/bob");
		assert_eq!(&*add_domain_to_name("bob", Some("PRIMARY")), "bob");
		assert_eq!(&*add_domain_to_name("bob", Some("primary")), "bob");
		assert_eq!(&*add_domain_to_name("LDAP/bob", Some("other")), "LDAP/bob");
		assert_eq!(&*add_domain_to_name("bob", None), "bob");
		assert_eq!(&*add_domain_to_name("bob@acme.org", Some("ldap")), "LDAP/bob@acme.org");
	}
}

// vim: ts=4
