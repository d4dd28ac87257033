//! Bearer token sources.
//!
//! [`ClientAssertionSource`] performs one client-credentials exchange per call;
//! [`ReuseTokenSource`] wraps any source with a single-flight cache so concurrent callers
//! share one exchange and reuse the token until it nears expiry. [`new_token_source`] wires
//! both together against the production ABM token endpoint.

mod client_assertion;
mod reuse;

pub use client_assertion::*;
pub use reuse::*;

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, TokenSecret},
	http::ReqwestHttpClient,
	provider::ProviderDescriptor,
};

/// Boxed future returned by [`TokenSource::token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<BearerToken>> + 'a + Send>>;

/// Provider of bearer tokens.
///
/// Implementations must be safe to call repeatedly and from several tasks at once.
pub trait TokenSource: Send + Sync {
	/// Returns a usable bearer token, exchanging for a new one when required.
	fn token(&self) -> TokenFuture<'_>;
}
impl<T> TokenSource for Arc<T>
where
	T: ?Sized + TokenSource,
{
	fn token(&self) -> TokenFuture<'_> {
		(**self).token()
	}
}

/// Source that always yields the same token. Useful for tests and pre-issued tokens.
#[derive(Clone, Debug)]
pub struct StaticTokenSource {
	token: BearerToken,
}
impl StaticTokenSource {
	/// Wraps an existing token.
	pub fn new(token: BearerToken) -> Self {
		Self { token }
	}

	/// Wraps a raw access token that is treated as valid for a year.
	pub fn bearer(access_token: impl Into<String>) -> Self {
		let issued_at = OffsetDateTime::now_utc();

		Self::new(BearerToken {
			access_token: TokenSecret::new(access_token),
			token_type: "Bearer".into(),
			issued_at,
			expires_at: issued_at + Duration::days(365),
		})
	}
}
impl TokenSource for StaticTokenSource {
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(async move { Ok(self.token.clone()) })
	}
}

/// Builds a cached client-assertion token source for the production ABM token endpoint.
///
/// `client_id` and `assertion` must be non-empty; an empty `scope` falls back to
/// `business.api`. Every exchange runs on `http_client` and stops once `cancel` fires.
pub fn new_token_source(
	http_client: ReqwestHttpClient,
	cancel: CancellationToken,
	client_id: &str,
	assertion: &str,
	scope: &str,
) -> Result<ReuseTokenSource<ClientAssertionSource>> {
	let credentials = AssertionCredentials::new(client_id, assertion, scope)?;
	let descriptor = ProviderDescriptor::abm().map_err(crate::error::ConfigError::from)?;
	let source = ClientAssertionSource::new(&descriptor, credentials, http_client, cancel)?;

	Ok(ReuseTokenSource::new(source))
}
