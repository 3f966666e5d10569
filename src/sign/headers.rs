//! Ordered header list produced by the signer and extended by the executor.

// std
use std::slice::Iter;

/// Header carrying the signed `OAuth` field list.
pub const AUTHORIZATION: &str = "Authorization";
/// Content type advertised by the signer for `POST` calls.
pub const FORM_CONTENT_TYPE: &str = "Content-type";
/// Content type attached by the executor whenever a JSON body is sent.
pub const JSON_CONTENT_TYPE: &str = "Content-Type";
/// Byte length of the JSON body.
pub const CONTENT_LENGTH: &str = "Content-Length";
/// Application identity header.
pub const APP_NAME: &str = "x-app-name";
/// Compression preference header.
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";

/// Insertion-ordered header name/value pairs.
///
/// Lookups are ASCII case-insensitive. [`RequestHeaders::insert`] only replaces an
/// entry whose name matches exactly, so `Content-type` and `Content-Type` can coexist
/// until a transport folds them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestHeaders(Vec<(&'static str, String)>);
impl RequestHeaders {
	/// Creates an empty header list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name` to `value`, replacing an existing entry with the exact same name.
	pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
		let value = value.into();

		match self.0.iter_mut().find(|(key, _)| *key == name) {
			Some((_, slot)) => *slot = value,
			None => self.0.push((name, value)),
		}
	}

	/// Returns the first value whose name matches `name` case-insensitively.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
	}

	/// Returns the value stored under exactly `name`.
	pub fn get_exact(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(key, _)| *key == name).map(|(_, v)| v.as_str())
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the list is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
		self.0.iter().map(|(k, v)| (*k, v.as_str()))
	}

	/// Header names in insertion order.
	pub fn names(&self) -> Vec<&'static str> {
		self.0.iter().map(|(k, _)| *k).collect()
	}
}
impl<'a> IntoIterator for &'a RequestHeaders {
	type IntoIter = Iter<'a, (&'static str, String)>;
	type Item = &'a (&'static str, String);

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn insert_replaces_exact_names_only() {
		let mut headers = RequestHeaders::new();

		headers.insert(FORM_CONTENT_TYPE, "application/x-www-form-urlencoded");
		headers.insert(APP_NAME, "a/");
		headers.insert(APP_NAME, "b/");
		headers.insert(JSON_CONTENT_TYPE, "application/json");

		assert_eq!(headers.len(), 3);
		assert_eq!(headers.get_exact(APP_NAME), Some("b/"));
		assert_eq!(headers.get("content-type"), Some("application/x-www-form-urlencoded"));
		assert_eq!(headers.get_exact(JSON_CONTENT_TYPE), Some("application/json"));
		assert_eq!(headers.names(), vec![FORM_CONTENT_TYPE, APP_NAME, JSON_CONTENT_TYPE]);
	}
}
