//! Endpoint routing over the [`Executor`].
//!
//! Each method maps one service operation onto a method, URL, and optional JSON body;
//! signing, transport, and response classification stay inside the executor.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::UsageError,
	executor::{CallOutcome, Executor, ListenerId},
	http::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Maximum number of documents accepted by one batch call.
pub const MAX_BATCH_SIZE: usize = 10;

const PATH_SEGMENT: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Single document queued for analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	/// Caller-chosen document identifier.
	pub id: String,
	/// Text to analyze.
	pub text: String,
}
impl Document {
	/// Creates a document.
	pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
		Self { id: id.into(), text: text.into() }
	}
}

#[derive(Serialize)]
struct CategoriesQuery<'a> {
	config_id: &'a str,
}

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestSemantriaClient = SemantriaClient<ReqwestTransport>;

/// Typed entry points for the document, configuration, and category endpoints.
pub struct SemantriaClient<T>
where
	T: ?Sized + HttpTransport,
{
	executor: Executor<T>,
	config: ClientConfig,
}
impl<T> SemantriaClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<T>>) -> Self {
		let executor = Executor::with_transport(config.credentials.clone(), transport);

		Self { executor, config }
	}

	/// Returns the underlying executor.
	pub fn executor(&self) -> &Executor<T> {
		&self.executor
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Registers a listener for synchronous (HTTP 200) results.
	///
	/// See [`Executor::on_processed`]: listeners run inline and must not block.
	pub fn on_processed<F>(&self, listener: F) -> ListenerId
	where
		F: 'static + Fn(&str) + Send + Sync,
	{
		self.executor.on_processed(listener)
	}

	/// Unregisters a processed listener.
	pub fn remove_listener(&self, id: ListenerId) -> bool {
		self.executor.remove_listener(id)
	}

	/// Queues one document (`POST /document.json`).
	pub async fn queue_document(&self, text: &str, id: &str) -> Result<CallOutcome> {
		let document = Document::new(id, text);

		self.executor
			.execute("POST", &self.config.endpoint("document.json"), Some(&document))
			.await
	}

	/// Queues up to [`MAX_BATCH_SIZE`] documents (`POST /document/batch.json`).
	///
	/// Oversized batches fail with [`UsageError::BatchTooLarge`] before any request is made.
	pub async fn queue_document_batch<D>(&self, docs: &[D]) -> Result<CallOutcome>
	where
		D: Serialize,
	{
		if docs.len() > MAX_BATCH_SIZE {
			return Err(UsageError::BatchTooLarge { len: docs.len(), max: MAX_BATCH_SIZE }.into());
		}

		self.executor
			.execute("POST", &self.config.endpoint("document/batch.json"), Some(docs))
			.await
	}

	/// Fetches the analysis of one document (`GET /document/<id>.json`).
	pub async fn retrieve_document(&self, id: &str) -> Result<CallOutcome> {
		let path = format!("document/{}.json", utf8_percent_encode(id, PATH_SEGMENT));

		self.executor.execute_empty("GET", &self.config.endpoint(&path)).await
	}

	/// Lists every configuration (`GET /configurations.json`).
	pub async fn retrieve_configurations(&self) -> Result<CallOutcome> {
		self.executor.execute_empty("GET", &self.config.endpoint("configurations.json")).await
	}

	/// Updates configurations from a settings payload (`POST /configurations.json`).
	pub async fn update_configuration<S>(&self, settings: &S) -> Result<CallOutcome>
	where
		S: ?Sized + Serialize,
	{
		self.executor
			.execute("POST", &self.config.endpoint("configurations.json"), Some(settings))
			.await
	}

	/// Deletes configurations by id (`DELETE /configurations.json`).
	pub async fn delete_configuration<I>(&self, config_ids: &[I]) -> Result<CallOutcome>
	where
		I: Serialize,
	{
		self.executor
			.execute("DELETE", &self.config.endpoint("configurations.json"), Some(config_ids))
			.await
	}

	/// Lists active categories (`GET /categories.json`), optionally for one configuration.
	pub async fn retrieve_categories(&self, config_id: Option<&str>) -> Result<CallOutcome> {
		let query = CategoriesQuery { config_id: config_id.unwrap_or_default() };

		self.executor
			.execute("GET", &self.config.endpoint("categories.json"), Some(&query))
			.await
	}
}
#[cfg(feature = "reqwest")]
impl SemantriaClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest client.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_transport(config, ReqwestTransport::default())
	}
}
impl<T> Debug for SemantriaClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SemantriaClient")
			.field("base_url", &self.config.base_url)
			.field("executor", &self.executor)
			.finish()
	}
}
