//! Client configuration and its validating builder.

// self
use crate::{_prelude::*, auth::Credentials};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api30.semantria.com";

/// Application identity reported through `x-app-name` unless overridden.
pub fn default_application_name() -> String {
	format!("{}/{}/json", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// The consumer key was not supplied.
	#[error("Missing consumer key.")]
	MissingConsumerKey,
	/// The consumer secret was not supplied.
	#[error("Missing consumer secret.")]
	MissingConsumerSecret,
	/// A credential was supplied but empty.
	#[error("The {field} cannot be empty.")]
	EmptyCredential {
		/// Which credential failed validation.
		field: &'static str,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid: {url}.")]
	InvalidBaseUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than HTTP(S).
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Offending URL string.
		url: String,
	},
}

/// Validated settings for a [`SemantriaClient`](crate::client::SemantriaClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Credentials shared by every signed call.
	pub credentials: Arc<Credentials>,
	/// API root without a trailing slash.
	pub base_url: String,
}
impl ClientConfig {
	/// Starts a builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::new()
	}

	/// Joins `path` onto the API root.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Consumer key issued by the service.
	pub consumer_key: Option<String>,
	/// Consumer secret issued by the service.
	pub consumer_secret: Option<String>,
	/// Application identity; `None` keeps [`default_application_name`].
	pub application_name: Option<String>,
	/// Whether to advertise gzip/deflate support.
	pub use_compression: bool,
	/// API root.
	pub base_url: String,
}
impl ClientConfigBuilder {
	/// Creates a builder pointed at [`DEFAULT_BASE_URL`].
	pub fn new() -> Self {
		Self {
			consumer_key: None,
			consumer_secret: None,
			application_name: None,
			use_compression: false,
			base_url: DEFAULT_BASE_URL.into(),
		}
	}

	/// Sets the consumer key.
	pub fn consumer_key(mut self, key: impl Into<String>) -> Self {
		self.consumer_key = Some(key.into());

		self
	}

	/// Sets the consumer secret.
	pub fn consumer_secret(mut self, secret: impl Into<String>) -> Self {
		self.consumer_secret = Some(secret.into());

		self
	}

	/// Overrides the application identity (an empty string sends an empty header).
	pub fn application_name(mut self, name: impl Into<String>) -> Self {
		self.application_name = Some(name.into());

		self
	}

	/// Toggles response compression.
	pub fn use_compression(mut self, enabled: bool) -> Self {
		self.use_compression = enabled;

		self
	}

	/// Overrides the API root.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Validates the settings and produces a [`ClientConfig`].
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let key = self.consumer_key.ok_or(ClientConfigError::MissingConsumerKey)?;
		let secret = self.consumer_secret.ok_or(ClientConfigError::MissingConsumerSecret)?;

		if key.is_empty() {
			return Err(ClientConfigError::EmptyCredential { field: "consumer key" });
		}
		if secret.is_empty() {
			return Err(ClientConfigError::EmptyCredential { field: "consumer secret" });
		}

		let parsed = Url::parse(&self.base_url).map_err(|source| {
			ClientConfigError::InvalidBaseUrl { url: self.base_url.clone(), source }
		})?;

		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ClientConfigError::UnsupportedScheme { url: self.base_url });
		}

		let application_name = self.application_name.unwrap_or_else(default_application_name);
		let credentials = Credentials::new(key, secret)
			.with_application_name(application_name)
			.with_compression(self.use_compression);

		Ok(ClientConfig {
			credentials: Arc::new(credentials),
			base_url: self.base_url.trim_end_matches('/').to_owned(),
		})
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_requires_credentials() {
		assert_eq!(
			ClientConfig::builder().consumer_secret("s").build().expect_err("Key is required."),
			ClientConfigError::MissingConsumerKey
		);
		assert_eq!(
			ClientConfig::builder().consumer_key("k").build().expect_err("Secret is required."),
			ClientConfigError::MissingConsumerSecret
		);
		assert_eq!(
			ClientConfig::builder()
				.consumer_key("")
				.consumer_secret("s")
				.build()
				.expect_err("Empty keys are rejected."),
			ClientConfigError::EmptyCredential { field: "consumer key" }
		);
	}

	#[test]
	fn builder_validates_base_url() {
		let base = || ClientConfig::builder().consumer_key("k").consumer_secret("s");

		assert!(matches!(
			base().base_url("not a url").build(),
			Err(ClientConfigError::InvalidBaseUrl { .. })
		));
		assert!(matches!(
			base().base_url("ftp://example.com").build(),
			Err(ClientConfigError::UnsupportedScheme { .. })
		));
	}

	#[test]
	fn defaults_fill_identity_and_endpoint() {
		let config = ClientConfig::builder()
			.consumer_key("k")
			.consumer_secret("s")
			.base_url("http://127.0.0.1:8080/")
			.build()
			.expect("Config should build.");

		assert_eq!(config.base_url, "http://127.0.0.1:8080");
		assert_eq!(config.endpoint("/document.json"), "http://127.0.0.1:8080/document.json");
		assert_eq!(
			config.credentials.application_name(),
			format!("{}/", default_application_name())
		);
		assert_eq!(config.credentials.accept_encoding(), "identity");
	}
}
