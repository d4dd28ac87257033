//! Transports executing API requests.
//!
//! [`ApiTransport`] is the seam between the typed request layer (and the paginator) and the
//! HTTP stack. [`BearerTransport`] decorates any transport with an `Authorization` header
//! drawn from a shared [`TokenSource`], so nothing above it handles raw credentials.

// crates.io
use reqwest::{
	Request, Response,
	header::{AUTHORIZATION, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http::ReqwestHttpClient,
	source::TokenSource,
};

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<Response>> + 'a + Send>>;

/// Executes a fully-built request and returns the raw response.
pub trait ApiTransport: Send + Sync {
	/// Sends `request`. Non-2xx statuses are not errors at this layer.
	fn execute(&self, request: Request) -> TransportFuture<'_>;
}
impl ApiTransport for ReqwestHttpClient {
	fn execute(&self, request: Request) -> TransportFuture<'_> {
		Box::pin(async move { self.0.execute(request).await.map_err(map_reqwest_error) })
	}
}
impl<T> ApiTransport for Arc<T>
where
	T: ?Sized + ApiTransport,
{
	fn execute(&self, request: Request) -> TransportFuture<'_> {
		(**self).execute(request)
	}
}

/// Transport that injects a bearer token into every request.
pub struct BearerTransport<T> {
	inner: T,
	source: Arc<dyn TokenSource>,
}
impl<T> BearerTransport<T> {
	/// Wraps `inner`, drawing tokens from `source`.
	pub fn new(inner: T, source: Arc<dyn TokenSource>) -> Self {
		Self { inner, source }
	}
}
impl<T> ApiTransport for BearerTransport<T>
where
	T: ApiTransport,
{
	fn execute(&self, mut request: Request) -> TransportFuture<'_> {
		Box::pin(async move {
			let token = self.source.token().await?;
			let mut value = HeaderValue::from_str(&token.authorization_value())
				.map_err(|_| ConfigError::InvalidAuthorizationHeader)?;

			value.set_sensitive(true);
			request.headers_mut().insert(AUTHORIZATION, value);

			self.inner.execute(request).await
		})
	}
}

fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() { ConfigError::from(err).into() } else { TransportError::from(err).into() }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{oauth::oauth2::http, source::StaticTokenSource};

	struct HeaderEcho;
	impl ApiTransport for HeaderEcho {
		fn execute(&self, request: Request) -> TransportFuture<'_> {
			Box::pin(async move {
				let header = request
					.headers()
					.get(AUTHORIZATION)
					.map(|value| {
						assert!(value.is_sensitive());

						value.to_str().unwrap_or_default().to_owned()
					})
					.unwrap_or_default();

				Ok(Response::from(http::Response::new(header)))
			})
		}
	}

	#[tokio::test]
	async fn bearer_transport_sets_sensitive_authorization_header() {
		let transport =
			BearerTransport::new(HeaderEcho, Arc::new(StaticTokenSource::bearer("abc")));
		let request = Request::new(
			reqwest::Method::GET,
			Url::parse("https://api-business.apple.com/v1/orgDevices")
				.expect("Request URL fixture should parse."),
		);
		let response = transport.execute(request).await.expect("Echo transport never fails.");

		assert_eq!(response.text().await.expect("Echo body should be readable."), "Bearer abc");
	}

	#[tokio::test]
	async fn bearer_transport_rejects_tokens_unfit_for_headers() {
		let transport =
			BearerTransport::new(HeaderEcho, Arc::new(StaticTokenSource::bearer("bad\ntoken")));
		let request = Request::new(
			reqwest::Method::GET,
			Url::parse("https://api-business.apple.com/v1/orgDevices")
				.expect("Request URL fixture should parse."),
		);
		let err =
			transport.execute(request).await.expect_err("Newlines are not valid header bytes.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidAuthorizationHeader)));
	}
}
