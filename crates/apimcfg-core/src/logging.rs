//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a global fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once, later calls are ignored.
pub fn init_tracing() {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Subscriber for tests, output is captured by the test harness
pub fn init_test_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

// vim: ts=4
