//! Common types used throughout apimcfg.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::{fmt, str::FromStr};

use crate::prelude::*;

/// Domain name of the super tenant. Missing organizations normalize to this.
pub const SUPER_TENANT_DOMAIN: &str = "carbon.super";

// TnId //
//******//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TnId(pub i32);

impl TnId {
	pub const SUPER: TnId = TnId(-1234);

	pub fn is_super(self) -> bool {
		self == Self::SUPER
	}
}

impl fmt::Display for TnId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

// Organization //
//**************//
/// Tenant domain name, always normalized (never empty)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Organization(Box<str>);

impl Organization {
	/// Normalizes an optional organization name. `None` and blank names map to the super tenant.
	pub fn normalize(org: Option<&str>) -> Self {
		match org.map(str::trim) {
			Some(name) if !name.is_empty() => Organization(name.into()),
			_ => Self::super_tenant(),
		}
	}

	pub fn super_tenant() -> Self {
		Organization(SUPER_TENANT_DOMAIN.into())
	}

	pub fn is_super_tenant(&self) -> bool {
		&*self.0 == SUPER_TENANT_DOMAIN
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Organization {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Organization {
	fn from(org: &str) -> Self {
		Organization::normalize(Some(org))
	}
}

impl From<Option<&str>> for Organization {
	fn from(org: Option<&str>) -> Self {
		Organization::normalize(org)
	}
}

// ConfigSlot //
//************//
/// One configuration document type. Every slot carries its registry path,
/// media type and whether anonymous reads are denied on creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigSlot {
	ExternalStores,
	TenantConfig,
	WorkflowExecutor,
	AnalyticsConfig,
	SelfSignup,
}

impl ConfigSlot {
	pub const ALL: [ConfigSlot; 5] = [
		ConfigSlot::ExternalStores,
		ConfigSlot::TenantConfig,
		ConfigSlot::WorkflowExecutor,
		ConfigSlot::AnalyticsConfig,
		ConfigSlot::SelfSignup,
	];

	/// Registry path relative to the governance root
	pub fn path(self) -> &'static str {
		match self {
			ConfigSlot::ExternalStores => "/apimgt/externalstores/external-api-stores.xml",
			ConfigSlot::TenantConfig => "/apimgt/applicationdata/tenant-conf.json",
			ConfigSlot::WorkflowExecutor => "/apimgt/applicationdata/workflow-extensions.xml",
			ConfigSlot::AnalyticsConfig => "/apimgt/statistics/ga-config.xml",
			ConfigSlot::SelfSignup => "/apimgt/applicationdata/sign-up-config.xml",
		}
	}

	pub fn media_type(self) -> &'static str {
		match self {
			ConfigSlot::ExternalStores => "application/xml",
			ConfigSlot::TenantConfig => "application/json",
			ConfigSlot::WorkflowExecutor => "workflow-config",
			ConfigSlot::AnalyticsConfig => "ga-config",
			ConfigSlot::SelfSignup => "signup-config",
		}
	}

	/// Whether the everyone role must be denied read access when the slot is created
	pub fn deny_anonymous_read(self) -> bool {
		matches!(self, ConfigSlot::ExternalStores | ConfigSlot::AnalyticsConfig)
	}

	pub fn name(self) -> &'static str {
		match self {
			ConfigSlot::ExternalStores => "external-stores",
			ConfigSlot::TenantConfig => "tenant-config",
			ConfigSlot::WorkflowExecutor => "workflow-executor",
			ConfigSlot::AnalyticsConfig => "analytics-config",
			ConfigSlot::SelfSignup => "self-signup",
		}
	}
}

impl fmt::Display for ConfigSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for ConfigSlot {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		ConfigSlot::ALL
			.into_iter()
			.find(|slot| slot.name() == s)
			.ok_or_else(|| Error::ValidationError(format!("Unknown config slot: {}", s)))
	}
}

// Resource //
//**********//
/// A registry resource: raw content plus optional media type
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resource {
	pub content: Box<[u8]>,
	pub media_type: Option<Box<str>>,
}

impl Resource {
	pub fn new(content: impl Into<Box<[u8]>>, media_type: Option<&str>) -> Self {
		Self { content: content.into(), media_type: media_type.map(Box::from) }
	}
}

/// A stored configuration document
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
	pub content: String,
	pub media_type: Option<Box<str>>,
}

impl TryFrom<Resource> for ConfigDocument {
	type Error = Error;

	fn try_from(resource: Resource) -> ClResult<Self> {
		let content = String::from_utf8(resource.content.into_vec())?;
		Ok(ConfigDocument { content, media_type: resource.media_type })
	}
}

// Action //
//********//
/// Registry action an access-control rule applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
	Get,
	Put,
	Delete,
}

impl Action {
	pub fn as_str(self) -> &'static str {
		match self {
			Action::Get => "get",
			Action::Put => "put",
			Action::Delete => "delete",
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}


// vim: ts=4
