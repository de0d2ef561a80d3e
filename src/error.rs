//! Gatekeeper-level error types shared across decoding, refresh, storage, and transport.

// self
use crate::_prelude::*;

/// Gatekeeper-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gatekeeper error exposed by public APIs.
///
/// An absent token is not an error; requests without a token are forwarded unchanged.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Stored token is malformed and the policy rejects it.
	#[error(transparent)]
	Decode(#[from] crate::auth::DecodeError),
	/// Token refresher failed; there is no fallback credential.
	#[error("Token refresh failed: {0}")]
	Refresh(
		#[from]
		#[source]
		crate::refresh::RefreshError,
	),
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Normalized transport or server failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// Returns `true` when the server rejected the presented credential with 401.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Transport(err) if err.is_unauthorized())
	}
}

/// Configuration and validation failures raised by the gatekeeper.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Token contains characters that cannot be sent in an HTTP header.
	#[error("Token cannot be encoded as an Authorization header value.")]
	InvalidHeader(#[from] http::header::InvalidHeaderValue),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Normalized transport failures surfaced to callers.
///
/// The display string is the human-readable message alone: the server's embedded message
/// when one was supplied, otherwise the HTTP status text.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Server answered with a non-success status.
	#[error("{message}")]
	Status {
		/// Normalized message.
		message: String,
		/// HTTP status code.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Request never produced a response (DNS, TCP, TLS, I/O).
	#[error("{message}")]
	Network {
		/// Normalized message.
		message: String,
		/// Transport-specific failure.
		#[source]
		source: Option<BoxError>,
	},
}
impl TransportError {
	/// Returns the normalized message.
	pub fn message(&self) -> &str {
		match self {
			Self::Status { message, .. } | Self::Network { message, .. } => message,
		}
	}

	/// Returns the HTTP status code, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			Self::Network { .. } => None,
		}
	}

	/// Returns `true` for a 401 response.
	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(401)
	}
}
