//! Client-credentials exchange built on the `oauth2` crate.
//!
//! The facade authenticates with a signed client assertion instead of a shared secret:
//! `client_id` travels in the form body, the assertion and its type URN are added as extra
//! parameters, and no `client_secret` field is ever produced.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, EndpointNotSet, EndpointSet, HttpClientError, RequestTokenError, Scope,
	TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	error::{ConfigError, TokenError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	provider::{
		CLIENT_ASSERTION_TYPE, ProviderDescriptor, ProviderErrorContext, ProviderErrorKind,
		ProviderStrategy,
	},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

const RESERVED_FORM_KEYS: [&str; 6] = [
	"grant_type",
	"client_id",
	"client_secret",
	"client_assertion_type",
	"client_assertion",
	"scope",
];

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) =>
				if inner.is_builder() {
					ConfigError::from(*inner).into()
				} else {
					TransportError::network(*inner).into()
				},
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TokenError::Endpoint {
				message: format!("HTTP client error: {message}"),
				status: meta_status(meta),
			}
			.into(),
			_ => TokenError::Endpoint {
				message: "HTTP client error".into(),
				status: meta_status(meta),
			}
			.into(),
		}
	}
}

pub(crate) struct BasicFacade<C = ReqwestHttpClient, M = ReqwestTransportErrorMapper>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> BasicFacade<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn from_descriptor(
		descriptor: &ProviderDescriptor,
		client_id: &str,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let token_url = TokenUrl::new(descriptor.token_endpoint.to_string())
			.map_err(|source| ConfigError::InvalidTokenUrl { source })?;
		let oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self {
			oauth_client,
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
		})
	}

	/// Exchanges `assertion` for a bearer token covering `scope`.
	pub(crate) fn exchange_client_assertion<'a>(
		&'a self,
		strategy: &'a dyn ProviderStrategy,
		scope: &'a str,
		assertion: &'a str,
	) -> FacadeFuture<'a, BearerToken> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let mut extra = BTreeMap::new();

			strategy.augment_token_request(&mut extra);

			let mut request = self
				.oauth_client
				.exchange_client_credentials()
				.add_scope(Scope::new(scope.to_owned()))
				.add_extra_param("client_assertion_type", CLIENT_ASSERTION_TYPE)
				.add_extra_param("client_assertion", assertion);

			for (key, value) in &extra {
				if !RESERVED_FORM_KEYS.contains(&key.as_str()) {
					request = request.add_extra_param(key.as_str(), value.as_str());
				}
			}

			let response = request.request_async(&instrumented).await.map_err(|err| {
				map_request_error(strategy, meta.take(), err, self.error_mapper.as_ref())
			})?;

			map_token_response(response)
		})
	}
}

fn map_token_response(response: BasicTokenResponse) -> Result<BearerToken> {
	let expires_in = response.expires_in().ok_or(ConfigError::MissingExpiresIn)?.as_secs();
	let expires_in = i64::try_from(expires_in).map_err(|_| ConfigError::ExpiresInOutOfRange)?;

	if expires_in <= 0 {
		return Err(ConfigError::NonPositiveExpiresIn.into());
	}

	BearerToken::builder()
		.access_token(response.access_token().secret().to_owned())
		.token_type(response.token_type().as_ref())
		.issued_at(OffsetDateTime::now_utc())
		.expires_in(Duration::seconds(expires_in))
		.build()
		.map_err(|err| ConfigError::from(err).into())
}

fn map_request_error<E, M>(
	strategy: &dyn ProviderStrategy,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(strategy, response, meta_ref),
		RequestTokenError::Request(error) => mapper.map_transport_error(meta_ref, error),
		RequestTokenError::Parse(error, _body) =>
			TokenError::ResponseParse { source: error, status: meta_status(meta_ref) }.into(),
		RequestTokenError::Other(message) =>
			TokenError::Endpoint { message, status: meta_status(meta_ref) }.into(),
	}
}

fn map_server_response_error(
	strategy: &dyn ProviderStrategy,
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let mut ctx = ProviderErrorContext::default().with_oauth_error(response.error().as_ref());

	if let Some(description) = response.error_description() {
		ctx = ctx.with_error_description(description.clone());
	}
	if let Some(status) = meta_status(meta) {
		ctx = ctx.with_http_status(status);
	}

	let message = match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	match strategy.classify_token_error(&ctx) {
		ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason: message },
		ProviderErrorKind::InvalidClient => Error::InvalidClient { reason: message },
		ProviderErrorKind::InsufficientScope => Error::InsufficientScope { reason: message },
		ProviderErrorKind::Unexpected =>
			TokenError::Endpoint { message, status: meta_status(meta) }.into(),
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn descriptor() -> ProviderDescriptor {
		ProviderDescriptor::builder()
			.token_endpoint(
				Url::parse("https://example.com/oauth2/token")
					.expect("Failed to parse token endpoint URL."),
			)
			.build()
			.expect("Failed to build provider descriptor.")
	}

	#[test]
	fn builds_request_body_client() {
		let result = <BasicFacade<ReqwestHttpClient, ReqwestTransportErrorMapper>>::from_descriptor(
			&descriptor(),
			"BUSINESSAPI.client",
			Arc::new(ReqwestHttpClient::default()),
			Arc::new(ReqwestTransportErrorMapper),
		);

		assert!(result.is_ok());
	}

	#[test]
	fn token_response_requires_positive_expiry() {
		let response: BasicTokenResponse = serde_json::from_str(
			r#"{"access_token":"abc","token_type":"bearer","expires_in":3600}"#,
		)
		.expect("Token response fixture should deserialize.");
		let token = map_token_response(response).expect("Valid token responses should map.");

		assert_eq!(token.access_token.expose(), "abc");
		assert_eq!(token.expires_at - token.issued_at, Duration::hours(1));
		assert_eq!(token.authorization_value(), "Bearer abc");

		let response: BasicTokenResponse =
			serde_json::from_str(r#"{"access_token":"abc","token_type":"bearer"}"#)
				.expect("Token response fixture should deserialize.");
		let err = map_token_response(response).expect_err("Missing expires_in should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingExpiresIn)));
	}
}
