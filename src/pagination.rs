//! Lazy, cancellable cursor pagination over JSON:API list endpoints.
//!
//! A [`Paginator`] performs one GET per [`next_page`](Paginator::next_page) call, hands the body
//! to a [`PageDecoder`], and remembers the page's `next` link. Links are resolved (absolute or
//! relative to the page that produced them) only when the caller asks for the following page,
//! so stopping early never triggers another request. The first error ends the sequence.

// std
use std::marker::PhantomData;
// crates.io
use futures::stream::{self, Stream};
use reqwest::{
	Method, Request,
	header::{ACCEPT, HeaderValue},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ApiError, DecodeError, TransportError},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	transport::ApiTransport,
};

/// Maximum number of pages fetched by one paginator.
pub const MAX_PAGES: usize = 1000;

/// One decoded page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
	/// Items carried by the page.
	pub items: Vec<T>,
	/// Link to the following page; empty on the final page.
	pub next: String,
}
impl<T> Page<T> {
	/// Builds a page.
	pub fn new(items: Vec<T>, next: impl Into<String>) -> Self {
		Self { items, next: next.into() }
	}

	/// Builds a final page.
	pub fn last(items: Vec<T>) -> Self {
		Self::new(items, String::new())
	}

	/// Maps every item, keeping the link.
	pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
		Page { items: self.items.into_iter().map(f).collect(), next: self.next }
	}
}

/// Turns one response body into a [`Page`].
pub trait PageDecoder<T>: Send + Sync {
	/// Decodes `payload`.
	fn decode(&self, payload: &[u8]) -> Result<Page<T>>;
}
impl<T, F> PageDecoder<T> for F
where
	F: Fn(&[u8]) -> Result<Page<T>> + Send + Sync,
{
	fn decode(&self, payload: &[u8]) -> Result<Page<T>> {
		self(payload)
	}
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "R: Deserialize<'de>"))]
struct Envelope<R> {
	#[serde(default)]
	data: Option<Vec<R>>,
	#[serde(default)]
	links: Option<EnvelopeLinks>,
}

#[derive(Deserialize)]
struct EnvelopeLinks {
	#[serde(default)]
	next: Option<String>,
}

/// Decoder for the `{data: [...], links: {next}}` envelope; failures are tagged with `step`.
pub fn json_api_page<R>(
	step: &'static str,
) -> impl Fn(&[u8]) -> Result<Page<R>> + Clone + Send + Sync
where
	R: DeserializeOwned,
{
	move |payload: &[u8]| {
		let envelope = DecodeError::json::<Envelope<R>>(step, payload)?;

		let next = envelope.links.and_then(|links| links.next).unwrap_or_default();

		Ok(Page::new(envelope.data.unwrap_or_default(), next))
	}
}

enum Cursor {
	Start(Url),
	Pending { base: Url, link: String },
	Finished,
}

/// Pull-based, single-pass page sequence.
///
/// Each call to [`next_page`](Self::next_page) yields one page's items, one terminal error, or
/// `None` once the sequence is over. Not restartable.
pub struct Paginator<T, D> {
	transport: Arc<dyn ApiTransport>,
	decoder: D,
	cancel: CancellationToken,
	cursor: Cursor,
	fetched: usize,
	_items: PhantomData<fn() -> T>,
}
impl<T, D> Paginator<T, D>
where
	D: PageDecoder<T>,
{
	/// Creates a paginator starting at `start`.
	pub fn new(
		transport: Arc<dyn ApiTransport>,
		decoder: D,
		cancel: CancellationToken,
		start: Url,
	) -> Self {
		Self {
			transport,
			decoder,
			cancel,
			cursor: Cursor::Start(start),
			fetched: 0,
			_items: PhantomData,
		}
	}

	/// Number of fetches attempted so far.
	pub fn pages_fetched(&self) -> usize {
		self.fetched
	}

	/// Returns `true` once the sequence has ended (cleanly or with an error).
	pub fn is_finished(&self) -> bool {
		matches!(self.cursor, Cursor::Finished)
	}

	/// Fetches and decodes the next page.
	pub async fn next_page(&mut self) -> Option<Result<Vec<T>>> {
		let result = match std::mem::replace(&mut self.cursor, Cursor::Finished) {
			Cursor::Finished => return None,
			cursor => self.advance(cursor).await,
		};

		match result {
			Ok(Some(items)) => {
				if self.is_finished() {
					obs::record_pagination_finished(self.fetched, OperationOutcome::Success);
				}

				Some(Ok(items))
			},
			Ok(None) => {
				obs::record_pagination_finished(self.fetched, OperationOutcome::Success);

				None
			},
			Err(e) => {
				obs::record_pagination_finished(self.fetched, OperationOutcome::Failure);

				Some(Err(e))
			},
		}
	}

	async fn advance(&mut self, cursor: Cursor) -> Result<Option<Vec<T>>> {
		if self.cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		let url = match cursor {
			Cursor::Finished => return Ok(None),
			Cursor::Start(url) => url,
			Cursor::Pending { base, link } => match resolve_next(&base, &link)? {
				Some(url) => url,
				None => return Ok(None),
			},
		};

		if self.fetched >= MAX_PAGES {
			return Err(Error::PageLimitExceeded { max_pages: MAX_PAGES });
		}

		self.fetched += 1;

		const KIND: OperationKind = OperationKind::Pagination;

		let span = OperationSpan::page(self.fetched, &url);

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
		obs::record_page_fetched(self.fetched, &url);

		let result = span.instrument(self.fetch(url.clone())).await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		let page = result?;

		if !page.next.is_empty() {
			self.cursor = Cursor::Pending { base: url, link: page.next };
		}

		Ok(Some(page.items))
	}

	/// Drains the sequence, concatenating every page.
	pub async fn collect_all(mut self) -> Result<Vec<T>> {
		let mut items = Vec::new();

		while let Some(page) = self.next_page().await {
			items.extend(page?);
		}

		Ok(items)
	}

	/// Converts the paginator into a [`Stream`] of pages.
	pub fn into_stream(self) -> impl Stream<Item = Result<Vec<T>>> {
		stream::unfold(self, |mut paginator| async move {
			paginator.next_page().await.map(|page| (page, paginator))
		})
	}

	async fn fetch(&self, url: Url) -> Result<Page<T>> {
		let mut request = Request::new(Method::GET, url);

		request.headers_mut().insert(ACCEPT, HeaderValue::from_static("application/json"));

		let (status, payload) = tokio::select! {
			biased;
			_ = self.cancel.cancelled() => return Err(Error::Cancelled),
			result = read_response(self.transport.as_ref(), request) => result?,
		};

		obs::record_api_response("fetch_page", status.as_u16());

		if !status.is_success() {
			return Err(ApiError::from_payload(status.as_u16(), status.canonical_reason(), &payload)
				.into());
		}

		self.decoder.decode(&payload)
	}
}

pub(crate) async fn read_response(
	transport: &dyn ApiTransport,
	request: Request,
) -> Result<(reqwest::StatusCode, Vec<u8>)> {
	let response = transport.execute(request).await?;
	let status = response.status();
	let payload = response.bytes().await.map_err(TransportError::from)?;

	Ok((status, payload.to_vec()))
}

fn resolve_next(base: &Url, link: &str) -> Result<Option<Url>> {
	if link.is_empty() {
		return Ok(None);
	}

	base.join(link)
		.map(Some)
		.map_err(|source| Error::InvalidNextLink { link: link.to_owned(), source })
}
