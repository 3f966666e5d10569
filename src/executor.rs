//! One authenticated request/response cycle per call.
//!
//! [`Executor::execute`] signs the target, frames an optional JSON body, issues a single
//! transport call, and classifies the response:
//!
//! | status      | result                                   | processed listeners |
//! |-------------|------------------------------------------|---------------------|
//! | `200`       | `Ok(CallOutcome::Processed(body))`       | notified once       |
//! | `202`       | `Ok(CallOutcome::Accepted(body))`        | not notified        |
//! | other       | `Err(Error::Rejected { status, body })`  | not notified        |
//! | no response | `Err(Error::Transport(..))`              | not notified        |
//!
//! Each call resolves exactly once. The body framing headers (`Content-Length`,
//! `Content-Type`) are added after signing and are never covered by the signature.

pub mod listener;

pub use listener::*;

// crates.io
use http::{
	HeaderMap, Method,
	header::{HeaderName, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::{ConfigError, TransportError},
	http::{HttpTransport, InboundResponse, OutboundRequest},
	obs::{self, CallSpan, CallState},
	sign::{self, RequestHeaders, SignedRequest, Signer},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Executor specialized for the crate's default reqwest transport.
pub type ReqwestExecutor = Executor<ReqwestTransport>;

/// Method used when the caller passes an empty one.
pub const DEFAULT_METHOD: &str = "POST";

/// Successful resolution of a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutcome {
	/// HTTP 200: the service returned analysis results synchronously.
	Processed(String),
	/// HTTP 202: the request was queued; results must be polled later.
	Accepted(String),
}
impl CallOutcome {
	/// Borrows the raw response body.
	pub fn body(&self) -> &str {
		match self {
			Self::Processed(body) | Self::Accepted(body) => body,
		}
	}

	/// Returns the raw response body.
	pub fn into_body(self) -> String {
		match self {
			Self::Processed(body) | Self::Accepted(body) => body,
		}
	}

	/// Whether the service answered synchronously.
	pub fn is_processed(&self) -> bool {
		matches!(self, Self::Processed(_))
	}

	/// Whether the service queued the request.
	pub fn is_accepted(&self) -> bool {
		matches!(self, Self::Accepted(_))
	}

	/// Terminal state reached by this outcome.
	pub fn state(&self) -> CallState {
		match self {
			Self::Processed(_) => CallState::Succeeded,
			Self::Accepted(_) => CallState::Accepted,
		}
	}
}

/// Maps a fully read response onto the three-way outcome.
pub fn classify(response: InboundResponse) -> Result<CallOutcome> {
	match response.status {
		200 => Ok(CallOutcome::Processed(response.body)),
		202 => Ok(CallOutcome::Accepted(response.body)),
		status => Err(Error::Rejected { status, body: response.body }),
	}
}

/// Signs and executes calls against the remote service.
///
/// The executor owns the signer (and through it the shared credentials), the
/// transport, and the processed-listener registry. Clones share all three, so a
/// listener registered on one clone observes calls made through any of them.
pub struct Executor<T>
where
	T: ?Sized + HttpTransport,
{
	signer: Signer,
	transport: Arc<T>,
	listeners: Arc<ProcessedListeners>,
}
impl<T> Executor<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an executor that reuses the caller-provided transport.
	pub fn with_transport(credentials: Arc<Credentials>, transport: impl Into<Arc<T>>) -> Self {
		Self {
			signer: Signer::new(credentials),
			transport: transport.into(),
			listeners: Default::default(),
		}
	}

	/// Returns the signer used for every call.
	pub fn signer(&self) -> &Signer {
		&self.signer
	}

	/// Returns the shared credentials.
	pub fn credentials(&self) -> &Credentials {
		self.signer.credentials()
	}

	/// Returns the underlying transport.
	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Returns the processed-listener registry.
	pub fn listeners(&self) -> &ProcessedListeners {
		&self.listeners
	}

	/// Registers a listener for synchronous (HTTP 200) results.
	///
	/// Listeners run inline on the calling task once the outcome is fixed, so `execute`
	/// does not resolve until every listener has returned. They must not block; hand slow
	/// work off to a channel or a spawned task.
	pub fn on_processed<F>(&self, listener: F) -> ListenerId
	where
		F: 'static + Fn(&str) + Send + Sync,
	{
		self.listeners.subscribe(listener)
	}

	/// Unregisters a processed listener; returns whether it was registered.
	pub fn remove_listener(&self, id: ListenerId) -> bool {
		self.listeners.remove(id)
	}

	/// Produces the signed query and headers for `method` + `url` with fresh randomness.
	pub fn sign(&self, method: &str, url: &str) -> SignedRequest {
		self.signer.sign(method, url)
	}

	/// Executes a call without a body.
	pub async fn execute_empty(&self, method: &str, url: &str) -> Result<CallOutcome> {
		self.execute(method, url, None::<&()>).await
	}

	/// Signs `url`, serializes `body` as JSON when present, and performs one exchange.
	///
	/// `method` is signed as given; an empty one is sent as `POST` without the form
	/// content type.
	pub async fn execute<B>(
		&self,
		method: &str,
		url: &str,
		body: Option<&B>,
	) -> Result<CallOutcome>
	where
		B: ?Sized + Serialize,
	{
		let payload = body.map(serde_json::to_vec).transpose()?;
		let signed = self.sign(method, url);

		self.execute_signed(method, signed, payload).await
	}

	/// Performs one exchange with caller-supplied signing material.
	///
	/// `body` must already be JSON; its framing headers are added here.
	pub async fn execute_signed(
		&self,
		method: &str,
		signed: SignedRequest,
		body: Option<Vec<u8>>,
	) -> Result<CallOutcome> {
		let span = CallSpan::new(method, "execute");

		span.instrument(async move {
			let SignedRequest { query, mut headers } = signed;

			if let Some(payload) = &body {
				headers.insert(sign::CONTENT_LENGTH, payload.len().to_string());
				headers.insert(sign::JSON_CONTENT_TYPE, "application/json");
			}

			let request = build_request(method, &query, &headers, body)?;

			obs::record_call_state(method, CallState::Built);

			let sent = self.transport.send(request);

			obs::record_call_state(method, CallState::Sent);

			let response = match sent.await {
				Ok(response) => response,
				Err(e) => {
					obs::record_call_state(method, CallState::TransportFailed);

					return Err(TransportError::network(e).into());
				},
			};
			let outcome = classify(response);

			match &outcome {
				Ok(resolved) => {
					obs::record_call_state(method, resolved.state());

					if let CallOutcome::Processed(body) = resolved {
						self.listeners.notify(body);
					}
				},
				Err(_) => obs::record_call_state(method, CallState::Rejected),
			}

			outcome
		})
		.await
	}
}
#[cfg(feature = "reqwest")]
impl Executor<ReqwestTransport> {
	/// Creates an executor backed by a default reqwest client.
	pub fn new(credentials: Arc<Credentials>) -> Self {
		Self::with_transport(credentials, ReqwestTransport::default())
	}
}
impl<T> Clone for Executor<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			signer: self.signer.clone(),
			transport: self.transport.clone(),
			listeners: self.listeners.clone(),
		}
	}
}
impl<T> Debug for Executor<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Executor")
			.field("credentials", self.signer.credentials())
			.field("listeners", &self.listeners.len())
			.finish()
	}
}

fn build_request(
	method: &str,
	query: &str,
	headers: &RequestHeaders,
	body: Option<Vec<u8>>,
) -> Result<OutboundRequest> {
	let method = if method.is_empty() { DEFAULT_METHOD } else { method };
	let method = Method::from_bytes(method.as_bytes())
		.map_err(|_| ConfigError::InvalidMethod { method: method.to_owned() })?;
	let url = Url::parse(query)
		.map_err(|source| ConfigError::InvalidUrl { url: query.to_owned(), source })?;

	Ok(OutboundRequest { method, url, headers: header_map(headers)?, body })
}

// Later entries replace earlier ones with the same case-insensitive name.
fn header_map(headers: &RequestHeaders) -> Result<HeaderMap> {
	let mut map = HeaderMap::with_capacity(headers.len());

	for (name, value) in headers.iter() {
		let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
		let key = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let value = HeaderValue::from_str(value).map_err(|_| invalid())?;

		map.insert(key, value);
	}

	Ok(map)
}
