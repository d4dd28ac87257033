//! Optional observability helpers for signing, token exchanges, pagination, and API requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `abm.operation` with the `operation` and `stage`
//!   fields. Page fetches add `page` and `url` to their span and emit a `debug` event.
//! - Enable `metrics` to increment the `abm_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`. API responses are counted in
//!   `abm_api_response_total` by `endpoint` and `status_class`, and every finished page walk
//!   records its page count in the `abm_pagination_pages` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Client assertion signing.
	Assertion,
	/// Client-credentials token exchange.
	TokenExchange,
	/// Cursor pagination over a list endpoint.
	Pagination,
	/// Single typed API request.
	Request,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Assertion => "assertion",
			OperationKind::TokenExchange => "token_exchange",
			OperationKind::Pagination => "pagination",
			OperationKind::Request => "request",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto [`Success`](Self::Success) or [`Failure`](Self::Failure).
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
