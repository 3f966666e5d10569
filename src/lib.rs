//! Signed request executor for the Semantria document-analysis API - MD5/HMAC-SHA1 request
//! signing, a pluggable transport, and deterministic 200/202/error classification.
//!
//! [`sign::Signer`] turns a method and URL into a signed query plus headers;
//! [`executor::Executor`] performs exactly one authenticated exchange per call and maps the
//! response onto [`executor::CallOutcome`] or [`error::Error`]; [`client::SemantriaClient`]
//! routes the service's document, configuration, and category endpoints over the executor.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod obs;
pub mod sign;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		client::ReqwestSemantriaClient,
		config::ClientConfig,
		executor::ReqwestExecutor,
		http::ReqwestTransport,
	};

	/// Consumer key used by test fixtures.
	pub const TEST_CONSUMER_KEY: &str = "test-consumer-key";
	/// Consumer secret used by test fixtures.
	pub const TEST_CONSUMER_SECRET: &str = "test-consumer-secret";

	/// Shared credentials for tests.
	pub fn test_credentials() -> Arc<Credentials> {
		Arc::new(Credentials::new(TEST_CONSUMER_KEY, TEST_CONSUMER_SECRET))
	}

	/// Builds a reqwest transport that never follows redirects, so mocks see every call.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs an executor signing with [`test_credentials`].
	pub fn build_reqwest_test_executor() -> ReqwestExecutor {
		ReqwestExecutor::with_transport(test_credentials(), test_reqwest_transport())
	}

	/// Constructs a routing client whose API root is `base_url` (typically a mock server).
	pub fn build_reqwest_test_client(base_url: &str) -> ReqwestSemantriaClient {
		let config = ClientConfig::builder()
			.consumer_key(TEST_CONSUMER_KEY)
			.consumer_secret(TEST_CONSUMER_SECRET)
			.base_url(base_url)
			.build()
			.expect("Failed to build test client configuration.");

		ReqwestSemantriaClient::with_transport(config, test_reqwest_transport())
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
