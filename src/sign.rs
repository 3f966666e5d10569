//! Request signing for the Semantria OAuth 1.0 dialect.
//!
//! The service authenticates every call with a query-string parameter set plus an
//! `Authorization` header whose signature is
//! `percent(base64(HMAC-SHA1(key = hex(MD5(consumer_secret)), msg = percent(query))))`.
//! The construction is fixed by the remote protocol and must be reproduced byte for
//! byte; it is not a general-purpose signing recommendation.
//!
//! [`Signer::sign`] draws a fresh [`SigningContext`] for every call. The lower-level
//! builders take the nonce and timestamp explicitly so the output is deterministic
//! for a fixed context.

pub mod headers;

pub use headers::*;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use sha1::Sha1;
// self
use crate::{_prelude::*, auth::Credentials};

type HmacSha1 = Hmac<Sha1>;

/// Protocol version sent in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";
/// Signature method sent in `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// Marker that opens the `Authorization` header.
pub const OAUTH_MARKER: &str = "OAuth";
/// Exclusive upper bound for generated nonces.
pub const NONCE_UPPER_BOUND: u32 = 9_999_999;

const KEY_CONSUMER_KEY: &str = "oauth_consumer_key";
const KEY_NONCE: &str = "oauth_nonce";
const KEY_SIGNATURE: &str = "oauth_signature";
const KEY_SIGNATURE_METHOD: &str = "oauth_signature_method";
const KEY_TIMESTAMP: &str = "oauth_timestamp";
const KEY_VERSION: &str = "oauth_version";

// Mirrors `encodeURIComponent`: ALPHA, DIGIT and `-_.!~*'()` stay literal.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Per-call randomness and target; never reused across calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningContext {
	/// HTTP method of the outbound request.
	pub method: String,
	/// Target URL before signing parameters are appended.
	pub url: String,
	/// Milliseconds since the Unix epoch.
	pub timestamp: i64,
	/// Pseudo-random value in `[0, 9_999_999)`.
	pub nonce: u32,
}
impl SigningContext {
	/// Builds a context with caller-chosen randomness.
	pub fn new(
		method: impl Into<String>,
		url: impl Into<String>,
		timestamp: i64,
		nonce: u32,
	) -> Self {
		Self { method: method.into(), url: url.into(), timestamp, nonce }
	}
}

/// Signing material for one outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// Target URL with the normalized parameters appended.
	pub query: String,
	/// Headers to send alongside the request.
	pub headers: RequestHeaders,
}

/// Produces request-authenticating material without touching the network.
#[derive(Clone, Debug)]
pub struct Signer {
	credentials: Arc<Credentials>,
}
impl Signer {
	/// Creates a signer over shared read-only credentials.
	pub fn new(credentials: Arc<Credentials>) -> Self {
		Self { credentials }
	}

	/// Returns the credentials used for signing.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Returns a non-cryptographic pseudo-random nonce in `[0, 9_999_999)`.
	pub fn generate_nonce(&self) -> u32 {
		rand::rng().random_range(0..NONCE_UPPER_BOUND)
	}

	/// Returns the current time in milliseconds since the Unix epoch.
	pub fn generate_timestamp(&self) -> i64 {
		let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

		i64::try_from(millis).unwrap_or(i64::MAX)
	}

	/// Draws a fresh [`SigningContext`] for `method` and `url`.
	pub fn context(&self, method: &str, url: &str) -> SigningContext {
		SigningContext::new(method, url, self.generate_timestamp(), self.generate_nonce())
	}

	/// Signs a request with fresh randomness.
	pub fn sign(&self, method: &str, url: &str) -> SignedRequest {
		self.sign_with(&self.context(method, url))
	}

	/// Signs a request with the randomness held by `ctx`.
	pub fn sign_with(&self, ctx: &SigningContext) -> SignedRequest {
		let query = self.signed_query(&ctx.method, &ctx.url, ctx.timestamp, ctx.nonce);
		let headers = self.request_headers(&ctx.method, ctx.nonce, ctx.timestamp, &query);

		SignedRequest { query, headers }
	}

	/// Serializes the five OAuth parameters as raw `key=value` pairs joined with `&`.
	///
	/// The order is fixed: consumer key, nonce, signature method, timestamp, version.
	pub fn normalized_parameters(&self, timestamp: i64, nonce: u32) -> String {
		let items = [
			(KEY_CONSUMER_KEY, self.credentials.consumer_key().to_owned()),
			(KEY_NONCE, nonce.to_string()),
			(KEY_SIGNATURE_METHOD, OAUTH_SIGNATURE_METHOD.to_owned()),
			(KEY_TIMESTAMP, timestamp.to_string()),
			(KEY_VERSION, OAUTH_VERSION.to_owned()),
		];

		items.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("&")
	}

	/// Appends the normalized parameters to `url`, using `&` when it already has a query.
	///
	/// The method is not part of the signed parameters.
	pub fn signed_query(&self, _method: &str, url: &str, timestamp: i64, nonce: u32) -> String {
		let separator = if url.contains('?') { '&' } else { '?' };

		format!("{url}{separator}{}", self.normalized_parameters(timestamp, nonce))
	}

	/// Computes the percent-encoded signature over `query`.
	pub fn signature(&self, query: &str) -> String {
		let escaped = encode_component(query);
		let key = hex_md5(self.credentials.consumer_secret().expose().as_bytes());
		let digest = base64_hmac_sha1(key.as_bytes(), escaped.as_bytes());

		encode_component(&digest)
	}

	/// Builds the `Authorization` header value for `query`.
	pub fn authorization_header(&self, query: &str, timestamp: i64, nonce: u32) -> String {
		let signature = self.signature(query);
		let fields: [(&str, Option<String>); 7] = [
			(OAUTH_MARKER, None),
			(KEY_VERSION, Some(OAUTH_VERSION.to_owned())),
			(KEY_SIGNATURE_METHOD, Some(OAUTH_SIGNATURE_METHOD.to_owned())),
			(KEY_NONCE, Some(nonce.to_string())),
			(KEY_CONSUMER_KEY, Some(self.credentials.consumer_key().to_owned())),
			(KEY_TIMESTAMP, Some(timestamp.to_string())),
			(KEY_SIGNATURE, Some(signature)),
		];

		fields
			.iter()
			.map(|(key, value)| match value {
				Some(value) => format!("{key}=\"{value}\""),
				None => (*key).to_owned(),
			})
			.collect::<Vec<_>>()
			.join(",")
	}

	/// Builds the full signed header set for one request.
	pub fn request_headers(
		&self,
		method: &str,
		nonce: u32,
		timestamp: i64,
		query: &str,
	) -> RequestHeaders {
		let mut headers = RequestHeaders::new();

		headers.insert(AUTHORIZATION, self.authorization_header(query, timestamp, nonce));

		if method == "POST" {
			headers.insert(FORM_CONTENT_TYPE, "application/x-www-form-urlencoded");
		}

		headers.insert(APP_NAME, self.credentials.application_name());
		headers.insert(ACCEPT_ENCODING, self.credentials.accept_encoding());

		headers
	}
}

fn encode_component(value: &str) -> String {
	utf8_percent_encode(value, URI_COMPONENT).to_string()
}

fn hex_md5(content: &[u8]) -> String {
	hex::encode(Md5::digest(content))
}

fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> String {
	let mut mac =
		<HmacSha1 as Mac>::new_from_slice(key).expect("HMAC-SHA1 accepts keys of any length.");

	mac.update(content);

	BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const DOCUMENT_URL: &str = "https://api30.semantria.com/document.json";

	fn signer(key: &str, secret: &str) -> Signer {
		Signer::new(Arc::new(Credentials::new(key, secret)))
	}

	#[test]
	fn normalized_parameters_use_fixed_key_order() {
		let expected = "oauth_consumer_key=&oauth_nonce=1&oauth_signature_method=HMAC-SHA1&oauth_timestamp=42&oauth_version=1.0";

		assert_eq!(signer("", "").normalized_parameters(42, 1), expected);
	}

	#[test]
	fn signed_query_picks_separator() {
		let signer = signer("k", "s");
		let params = signer.normalized_parameters(7, 3);

		assert_eq!(signer.signed_query("GET", "http://x/y", 7, 3), format!("http://x/y?{params}"));
		assert_eq!(
			signer.signed_query("GET", "http://x/y?a=1", 7, 3),
			format!("http://x/y?a=1&{params}")
		);
		assert_eq!(
			signer.signed_query("GET", "mockUrl?=test", 7, 3),
			format!("mockUrl?=test&{params}")
		);
	}

	#[test]
	fn encode_component_matches_uri_component_rules() {
		assert_eq!(
			encode_component("https://x/y?a=1&b=\u{e9} c"),
			"https%3A%2F%2Fx%2Fy%3Fa%3D1%26b%3D%C3%A9%20c"
		);
		assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
		assert_eq!(encode_component("a+b/c="), "a%2Bb%2Fc%3D");
	}

	#[test]
	fn md5_key_is_lowercase_hex() {
		assert_eq!(hex_md5(b""), "d41d8cd98f00b204e9800998ecf8427e");
		assert_eq!(hex_md5(b"secret"), "5ebe2294ecd0e0f08eab7690d2a6ee69");
	}

	#[test]
	fn authorization_header_matches_known_vector() {
		let signer = signer("key", "secret");
		let query = signer.signed_query("POST", DOCUMENT_URL, 1_700_000_000_000, 1_234_567);

		assert_eq!(
			signer.authorization_header(&query, 1_700_000_000_000, 1_234_567),
			"OAuth,oauth_version=\"1.0\",oauth_signature_method=\"HMAC-SHA1\",oauth_nonce=\"1234567\",oauth_consumer_key=\"key\",oauth_timestamp=\"1700000000000\",oauth_signature=\"YG74vcICIK11tDAst%2BAy2J43BSM%3D\""
		);
	}

	#[test]
	fn signature_covers_existing_query() {
		let signer = signer("key", "secret");
		let query = signer.signed_query(
			"GET",
			"https://api30.semantria.com/document/1234.json?config_id=abc",
			42,
			1,
		);

		assert_eq!(signer.signature(&query), "uC0EaExTPV8nb4vGd4VKqZH%2B7gA%3D");
	}

	#[test]
	fn request_headers_add_form_content_type_for_post_only() {
		let signer = signer("key", "secret");
		let post = signer.request_headers("POST", 1, 2, "q");
		let get = signer.request_headers("GET", 1, 2, "q");

		assert_eq!(
			post.names(),
			vec![AUTHORIZATION, FORM_CONTENT_TYPE, APP_NAME, ACCEPT_ENCODING]
		);
		assert_eq!(post.get_exact(FORM_CONTENT_TYPE), Some("application/x-www-form-urlencoded"));
		assert_eq!(get.names(), vec![AUTHORIZATION, APP_NAME, ACCEPT_ENCODING]);
		assert_eq!(get.get_exact(APP_NAME), Some(""));
		assert_eq!(get.get_exact(ACCEPT_ENCODING), Some("identity"));
	}

	#[test]
	fn generated_nonces_stay_in_range() {
		let signer = signer("key", "secret");

		for _ in 0..1_000 {
			assert!(signer.generate_nonce() < NONCE_UPPER_BOUND);
		}

		assert!(signer.generate_timestamp() > 1_600_000_000_000);
	}
}
