// self
use crate::obs::CallState;

/// Records a call state transition via the global metrics recorder (when enabled).
pub fn record_call_state(method: &str, state: CallState) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"semantria_call_total",
			"method" => method.to_owned(),
			"state" => state.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, state);
	}
}
