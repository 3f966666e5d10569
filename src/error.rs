//! Client-level error types shared by the signer, executor, and routing layer.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) before a response was obtained.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Caller-side contract violation caught before any request was made.
	#[error(transparent)]
	Usage(#[from] UsageError),
	/// Request body could not be encoded as JSON.
	#[error("Request body could not be serialized to JSON.")]
	Serialize(#[from] serde_json::Error),

	/// Remote service answered with a status outside 200/202.
	#[error("Remote service rejected the request with HTTP {status}.")]
	Rejected {
		/// HTTP status code returned by the service.
		status: u16,
		/// Raw response body, left for the caller to interpret.
		body: String,
	},
}
impl Error {
	/// Returns the raw response body when the service rejected the call.
	pub fn rejection_body(&self) -> Option<&str> {
		match self {
			Self::Rejected { body, .. } => Some(body),
			_ => None,
		}
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Signed query could not be parsed into a request URL.
	#[error("Signed request URL is invalid: {url}.")]
	InvalidUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP method string is not a valid token.
	#[error("HTTP method `{method}` is invalid.")]
	InvalidMethod {
		/// Offending method string.
		method: String,
	},
	/// Header name or value cannot be sent on the wire.
	#[error("Header `{name}` cannot be encoded.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
}

/// Transport-level failures raised before a response was obtained.
///
/// The transport's own error is kept as the source so callers can recover it with
/// [`TransportError::downcast_ref`].
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Borrows the original transport error when it has type `E`.
	pub fn downcast_ref<E>(&self) -> Option<&E>
	where
		E: 'static + std::error::Error,
	{
		match self {
			Self::Network { source } => source.downcast_ref::<E>(),
		}
	}
}

/// Caller-side contract violations detected by the routing layer.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum UsageError {
	/// Document batch exceeds the service limit.
	#[error("Document batch of {len} exceeds the limit of {max}.")]
	BatchTooLarge {
		/// Number of documents supplied.
		len: usize,
		/// Maximum documents accepted per batch.
		max: usize,
	},
}
