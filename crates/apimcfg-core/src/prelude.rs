pub use apimcfg_types::error::{ClResult, Error};
pub use apimcfg_types::types::{ConfigSlot, Organization, TnId};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
