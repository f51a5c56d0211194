//! Error type shared by the config store, the user store facade and all adapters.

use std::fmt;

pub type ClResult<T> = std::result::Result<T, Error>;

/// Boxed source error carried by `Error::ConfigStore`
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Machine-readable codes attached to config store failures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
	RetrieveExternalStoreConfig,
	AddConfig,
	UpdateConfig,
	RetrieveConfig,
}

impl ErrorCode {
	pub fn as_str(self) -> &'static str {
		match self {
			ErrorCode::RetrieveExternalStoreConfig => "ERROR_RETRIEVE_EXTERNAL_STORE_CONFIG",
			ErrorCode::AddConfig => "ERROR_ADD_CONFIG",
			ErrorCode::UpdateConfig => "ERROR_UPDATE_CONFIG",
			ErrorCode::RetrieveConfig => "ERROR_RETRIEVE_CONFIG",
		}
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug)]
pub enum Error {
	NotFound,
	DbError,
	ValidationError(String),
	ConfigError(String),
	Internal(String),
	Unimplemented(&'static str),

	/// Config store failure wrapping a storage, tenant or access-control error
	ConfigStore {
		msg: Box<str>,
		code: Option<ErrorCode>,
		source: Option<BoxError>,
	},
	/// Malformed stored document
	Parse(String),
	/// User management failure surfaced by the user store facade
	Auth(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Wraps `cause` into a config store error with a human-readable message
	pub fn config_store(msg: impl Into<Box<str>>, cause: Error) -> Self {
		Error::ConfigStore { msg: msg.into(), code: None, source: Some(Box::new(cause)) }
	}

	/// Attaches a machine-readable code (only meaningful for `ConfigStore`)
	pub fn with_code(self, code: ErrorCode) -> Self {
		match self {
			Error::ConfigStore { msg, source, .. } => {
				Error::ConfigStore { msg, code: Some(code), source }
			}
			other => other,
		}
	}

	pub fn code(&self) -> Option<ErrorCode> {
		match self {
			Error::ConfigStore { code, .. } => *code,
			_ => None,
		}
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::DbError => write!(f, "database error"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Unimplemented(what) => write!(f, "not implemented: {}", what),
			Error::ConfigStore { msg, code: Some(code), source: Some(source) } => {
				write!(f, "{} [{}]: {}", msg, code, source)
			}
			Error::ConfigStore { msg, code: Some(code), source: None } => {
				write!(f, "{} [{}]", msg, code)
			}
			Error::ConfigStore { msg, code: None, source: Some(source) } => {
				write!(f, "{}: {}", msg, source)
			}
			Error::ConfigStore { msg, code: None, source: None } => write!(f, "{}", msg),
			Error::Parse(msg) => write!(f, "parse error: {}", msg),
			Error::Auth(msg) => write!(f, "{}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::ConfigStore { source: Some(source), .. } => Some(source.as_ref()),
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		if err.kind() == std::io::ErrorKind::NotFound { Self::NotFound } else { Self::Io(err) }
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Parse(err.to_string())
	}
}

impl From<std::string::FromUtf8Error> for Error {
	fn from(err: std::string::FromUtf8Error) -> Self {
		Self::Parse(err.to_string())
	}
}


// vim: ts=4
