// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// Span wrapper tagging work with an operation kind and stage.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("abm.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Creates a pagination span carrying the 1-based page number and its URL.
	pub fn page(page: usize, url: &Url) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"abm.operation",
				operation = OperationKind::Pagination.as_str(),
				stage = "fetch_page",
				page,
				url = %url
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (page, url);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> OperationSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OperationSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			OperationSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`OperationSpan::entered`].
pub struct OperationSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for OperationSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OperationSpanGuard(..)")
	}
}

/// Emits a `debug` event for a fetched page (when tracing is enabled).
pub fn record_page_fetched(page: usize, url: &Url) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(page, url = %url, "Fetching page.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (page, url);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn operation_span_noop_without_tracing() {
		let _guard = OperationSpan::new(OperationKind::Assertion, "test").entered();
	}

	#[test]
	fn page_span_accepts_page_fields() {
		let url = Url::parse("https://api.test/v1/orgDevices").expect("Fixture URL should parse.");
		let _guard = OperationSpan::page(2, &url).entered();

		record_page_fetched(2, &url);
	}

	#[tokio::test]
	async fn instrument_passes_output_through() {
		let span = OperationSpan::new(OperationKind::Request, "instrument_passes_output_through");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
