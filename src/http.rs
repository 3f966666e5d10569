//! Transport primitives for signed calls.
//!
//! The module exposes [`HttpTransport`] alongside [`OutboundRequest`] and
//! [`InboundResponse`] so downstream crates can plug in custom HTTP stacks while the
//! executor keeps ownership of signing and response classification. A transport
//! performs exactly one exchange per [`HttpTransport::send`] call: it must not retry,
//! and it must read the response body to completion before resolving.

// crates.io
use http::{HeaderMap, Method};
// self
use crate::_prelude::*;

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a, Error> =
	Pin<Box<dyn Future<Output = Result<InboundResponse, Error>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to carry one signed request.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be
/// shared by concurrent calls behind an [`Arc`]. Errors returned from `send` are
/// surfaced to callers unchanged inside [`TransportError`](crate::error::TransportError).
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Issues `request` and resolves once the response body was read.
	fn send(&self, request: OutboundRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Fully framed request handed to a transport.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Signed target URL.
	pub url: Url,
	/// Signed headers merged with body framing headers.
	pub headers: HeaderMap,
	/// Serialized body, if any.
	pub body: Option<Vec<u8>>,
}

/// Status and fully read body of a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as UTF-8.
	pub body: String,
}
impl InboundResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Enable redirects or timeouts on the wrapped client as needed; the executor does not
/// add any of its own.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn send(&self, request: OutboundRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let OutboundRequest { method, url, headers, body } = request;
			let mut builder = client.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let bytes = response.bytes().await?;

			Ok(InboundResponse { status, body: String::from_utf8_lossy(&bytes).into_owned() })
		})
	}
}
