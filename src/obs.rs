//! Optional observability helpers for signed calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `semantria.call` with the `method` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `semantria_call_total` counter for every state a call
//!   passes through, labeled by `method` + `state`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// States a single call moves through; the last four are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallState {
	/// Signed and framed, not yet handed to the transport.
	Built,
	/// Handed to the transport.
	Sent,
	/// HTTP 200 with a synchronous result.
	Succeeded,
	/// HTTP 202; the result will be polled later.
	Accepted,
	/// Any other HTTP status.
	Rejected,
	/// Transport failed before a status was received.
	TransportFailed,
}
impl CallState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallState::Built => "built",
			CallState::Sent => "sent",
			CallState::Succeeded => "succeeded",
			CallState::Accepted => "accepted",
			CallState::Rejected => "rejected",
			CallState::TransportFailed => "transport_failed",
		}
	}
}
impl Display for CallState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn call_state_labels_are_stable() {
		assert_eq!(CallState::Succeeded.as_str(), "succeeded");
		assert_eq!(CallState::TransportFailed.to_string(), "transport_failed");
	}
}
