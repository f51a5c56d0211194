//! Adapter that manages role permissions on registry paths.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::Action;

/// Role every user (including anonymous ones) belongs to
pub const EVERYONE_ROLE: &str = "internal/everyone";

#[async_trait]
pub trait AccessAdapter: Debug + Send + Sync {
	/// Denies `role` the given action on an absolute registry path
	async fn deny_role(
		&self,
		tn_id: TnId,
		role: &str,
		absolute_path: &str,
		action: Action,
	) -> ClResult<()>;
}

// vim: ts=4
