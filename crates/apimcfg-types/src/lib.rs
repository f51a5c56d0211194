//! Shared types, adapter traits, and core utilities for apimcfg.
//!
//! The core services and every adapter implementation depend on this crate
//! only, so adapters compile independently of the services that use them.

#![forbid(unsafe_code)]

pub mod access_adapter;
pub mod cache;
pub mod error;
pub mod prelude;
pub mod registry_adapter;
pub mod tenant_adapter;
pub mod types;
pub mod user_adapter;
pub mod utils;
pub mod worker;

// vim: ts=4
