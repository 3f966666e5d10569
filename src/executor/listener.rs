//! Fan-out registry for the "processed" side channel.
//!
//! Listeners observe synchronous (HTTP 200) results only. They run after the call's
//! outcome is fixed, in registration order, on the task that completed the call, and the
//! call does not resolve until they return. A listener must not block; slow work belongs
//! on a channel or a spawned task. A panicking listener is isolated and logged so it
//! cannot alter the result handed back to the caller.

// std
use std::{
	panic::{self, AssertUnwindSafe},
	sync::atomic::{AtomicU64, Ordering},
};
// self
use crate::{_prelude::*, obs};

/// Callback invoked with the raw body of every processed response.
pub type ProcessedListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle returned by [`ProcessedListeners::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);
impl ListenerId {
	/// Returns the raw identifier.
	pub fn get(self) -> u64 {
		self.0
	}
}

/// Thread-safe listener registry shared by clones of an executor.
#[derive(Default)]
pub struct ProcessedListeners {
	next_id: AtomicU64,
	entries: RwLock<Vec<(ListenerId, ProcessedListener)>>,
}
impl ProcessedListeners {
	/// Registers `listener` and returns its handle.
	pub fn subscribe<F>(&self, listener: F) -> ListenerId
	where
		F: 'static + Fn(&str) + Send + Sync,
	{
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));

		self.entries.write().push((id, Arc::new(listener)));

		id
	}

	/// Removes the listener registered under `id`; returns whether it existed.
	pub fn remove(&self, id: ListenerId) -> bool {
		let mut entries = self.entries.write();
		let before = entries.len();

		entries.retain(|(existing, _)| *existing != id);

		entries.len() != before
	}

	/// Number of registered listeners.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Whether no listener is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Delivers `body` to every listener and returns how many returned normally.
	pub fn notify(&self, body: &str) -> usize {
		// Snapshot so listeners may (un)subscribe without deadlocking.
		let snapshot = self.entries.read().clone();
		let mut delivered = 0;

		for (id, listener) in snapshot {
			match panic::catch_unwind(AssertUnwindSafe(|| listener(body))) {
				Ok(()) => delivered += 1,
				Err(_) => obs::warn_listener_panic(id.get()),
			}
		}

		delivered
	}
}
impl Debug for ProcessedListeners {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProcessedListeners").field("len", &self.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::AtomicUsize;
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;

	#[test]
	fn notify_reaches_every_listener_in_order() {
		let listeners = ProcessedListeners::default();
		let seen = Arc::new(Mutex::new(Vec::new()));
		let first = seen.clone();
		let second = seen.clone();

		listeners.subscribe(move |body| first.lock().push(format!("a:{body}")));
		listeners.subscribe(move |body| second.lock().push(format!("b:{body}")));

		assert_eq!(listeners.notify("hi"), 2);
		assert_eq!(*seen.lock(), vec!["a:hi".to_owned(), "b:hi".to_owned()]);
	}

	#[test]
	fn remove_stops_delivery() {
		let listeners = ProcessedListeners::default();
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = hits.clone();
		let id = listeners.subscribe(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		assert!(listeners.remove(id));
		assert!(!listeners.remove(id));
		assert_eq!(listeners.notify("ignored"), 0);
		assert_eq!(hits.load(Ordering::SeqCst), 0);
		assert!(listeners.is_empty());
	}

	#[test]
	fn panicking_listener_is_isolated() {
		let listeners = ProcessedListeners::default();
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = hits.clone();

		listeners.subscribe(|_| panic!("listener failure"));
		listeners.subscribe(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		assert_eq!(listeners.notify("body"), 1);
		assert_eq!(hits.load(Ordering::SeqCst), 1);
	}
}
