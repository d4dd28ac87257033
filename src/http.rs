//! HTTP plumbing shared by the token exchange and the API transport.
//!
//! The token exchange talks to `oauth2` through [`TokenHttpClient`], which hands out one
//! handle per exchange. The handle reports the response status through a
//! [`ResponseMetadataSlot`] so a garbled error body still maps to an error carrying the status.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use reqwest::redirect::Policy;
// self
use crate::_prelude::*;

/// `User-Agent` sent by clients built with [`ReqwestHttpClient::new`].
pub const USER_AGENT: &str = concat!("abm/", env!("CARGO_PKG_VERSION"));

/// HTTP stack able to run client-credentials exchanges.
///
/// Handles must own their state so the request futures stay `Send`.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Per-exchange handle reporting into a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle that clears `slot` before dispatching and fills it once a status arrives.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// What the token endpoint told us besides the body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code, if a response arrived.
	pub status: Option<u16>,
}

/// Shared cell carrying [`ResponseMetadata`] from the handle to error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Replaces the stored metadata.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Removes and returns the stored metadata.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// reqwest client used for both the token exchange and API requests.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client that never follows redirects and identifies itself with [`USER_AGENT`].
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.user_agent(USER_AGENT)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing client. Token exchanges expect redirects to be disabled.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl TokenHttpClient for ReqwestHttpClient {
	type Handle = ReqwestTokenHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ReqwestTokenHandle { client: self.0.clone(), slot }
	}
}

/// [`TokenHttpClient::Handle`] for [`ReqwestHttpClient`].
#[derive(Clone, Debug)]
pub struct ReqwestTokenHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for ReqwestTokenHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.slot.take();

			let response =
				self.client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			self.slot.store(ResponseMetadata { status: Some(status.as_u16()) });

			let body = response.bytes().await.map_err(Box::new)?;
			let mut converted = HttpResponse::new(body.to_vec());

			*converted.status_mut() = status;
			*converted.headers_mut() = headers;

			Ok(converted)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn slot_take_clears_the_previous_exchange() {
		let slot = ResponseMetadataSlot::default();
		let shared = slot.clone();

		shared.store(ResponseMetadata { status: Some(401) });

		assert_eq!(slot.take(), Some(ResponseMetadata { status: Some(401) }));
		assert_eq!(slot.take(), None);
	}

	#[test]
	fn user_agent_names_the_crate() {
		assert!(USER_AGENT.starts_with("abm/"));

		ReqwestHttpClient::new().expect("Default client should build.");
	}
}
