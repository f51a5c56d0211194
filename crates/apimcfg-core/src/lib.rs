//! Tenant configuration store and remote user store facade.
//!
//! [`ConfigStore`] keeps one configuration document per organization and
//! [`ConfigSlot`](apimcfg_types::types::ConfigSlot) in a resource registry.
//! [`UserStoreService`] checks credentials and roles of tenant-qualified users.
//! Both take their collaborators as adapter trait objects; [`AppBuilder`]
//! wires them together.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod cache;
pub mod config_store;
pub mod logging;
pub mod opts;
pub mod prelude;
pub mod self_signup;
pub mod user_store;

pub use app::{App, AppBuilder};
pub use cache::TenantConfigCache;
pub use config_store::ConfigStore;
pub use opts::ConfigStoreOpts;
pub use self_signup::SelfSignupConfig;
pub use user_store::{AuthenticationInfo, UserStoreService};

// vim: ts=4
