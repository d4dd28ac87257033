// self
use crate::obs::{OperationKind, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"abm_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts an API response by endpoint and status class.
pub fn record_api_response(endpoint: &'static str, status: u16) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"abm_api_response_total",
			"endpoint" => endpoint,
			"status_class" => status_class(status)
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (endpoint, status);
	}
}

/// Records how many pages a finished walk fetched.
pub fn record_pagination_finished(pages: usize, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("abm_pagination_pages", "outcome" => outcome.as_str())
			.record(pages as f64);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (pages, outcome);
	}
}

/// Collapses a status code into its `Nxx` class label.
pub fn status_class(status: u16) -> &'static str {
	match status {
		100..=199 => "1xx",
		200..=299 => "2xx",
		300..=399 => "3xx",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_operation_outcome(OperationKind::Pagination, OperationOutcome::Failure);
		record_api_response("get_org_devices", 200);
		record_pagination_finished(3, OperationOutcome::Success);
	}

	#[test]
	fn status_classes_group_by_hundreds() {
		assert_eq!(status_class(201), "2xx");
		assert_eq!(status_class(404), "4xx");
		assert_eq!(status_class(503), "5xx");
		assert_eq!(status_class(999), "other");
	}
}
