//! Immutable consumer key/secret pair plus the display fields derived at construction.

// self
use crate::{_prelude::*, auth::ConsumerSecret};

/// `Accept-Encoding` value advertised when compression was requested.
pub const ACCEPT_ENCODING_COMPRESSED: &str = "gzip, deflate";
/// `Accept-Encoding` value advertised when compression is off.
pub const ACCEPT_ENCODING_IDENTITY: &str = "identity";

/// Consumer credentials used to sign every outbound request.
///
/// Values are created once and never mutated; executors hold them behind an [`Arc`]
/// so concurrent calls share a single read-only copy.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	consumer_key: String,
	consumer_secret: ConsumerSecret,
	application_name: String,
	accept_encoding: &'static str,
}
impl Credentials {
	/// Creates credentials without an application name and with compression disabled.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: ConsumerSecret::new(consumer_secret),
			application_name: String::new(),
			accept_encoding: ACCEPT_ENCODING_IDENTITY,
		}
	}

	/// Sets the application identifier reported through `x-app-name`.
	///
	/// A non-empty name is stored with a trailing `/`; an empty one clears the field.
	pub fn with_application_name(mut self, name: impl AsRef<str>) -> Self {
		let name = name.as_ref();

		self.application_name = if name.is_empty() { String::new() } else { format!("{name}/") };

		self
	}

	/// Toggles the compression preference advertised through `Accept-Encoding`.
	pub fn with_compression(mut self, enabled: bool) -> Self {
		self.accept_encoding =
			if enabled { ACCEPT_ENCODING_COMPRESSED } else { ACCEPT_ENCODING_IDENTITY };

		self
	}

	/// Returns the consumer key.
	pub fn consumer_key(&self) -> &str {
		&self.consumer_key
	}

	/// Returns the redacted consumer secret.
	pub fn consumer_secret(&self) -> &ConsumerSecret {
		&self.consumer_secret
	}

	/// Returns the application identifier (possibly empty).
	pub fn application_name(&self) -> &str {
		&self.application_name
	}

	/// Returns the accepted content-encoding string.
	pub fn accept_encoding(&self) -> &'static str {
		self.accept_encoding
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &self.consumer_secret)
			.field("application_name", &self.application_name)
			.field("accept_encoding", &self.accept_encoding)
			.finish()
	}
}
