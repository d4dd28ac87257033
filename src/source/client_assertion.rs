// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::ConfigError,
	http::{ReqwestHttpClient, TokenHttpClient},
	oauth::{BasicFacade, ReqwestTransportErrorMapper, TransportErrorMapper},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	provider::{DefaultProviderStrategy, ProviderDescriptor, ProviderStrategy},
	source::{TokenFuture, TokenSource},
};

/// Validated inputs for a client-assertion exchange.
#[derive(Clone)]
pub struct AssertionCredentials {
	client_id: String,
	assertion: TokenSecret,
	scope: Option<String>,
}
impl AssertionCredentials {
	/// Validates the client identifier and assertion; an empty `scope` means "use the default".
	pub fn new(
		client_id: impl Into<String>,
		assertion: impl Into<String>,
		scope: impl Into<String>,
	) -> Result<Self> {
		let client_id = client_id.into();
		let assertion = TokenSecret::new(assertion);
		let scope = scope.into();

		if client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId.into());
		}
		if assertion.expose().trim().is_empty() {
			return Err(ConfigError::MissingAssertion.into());
		}

		Ok(Self { client_id, assertion, scope: Some(scope).filter(|s| !s.trim().is_empty()) })
	}

	/// Client identifier sent as `client_id`.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}
}
impl Debug for AssertionCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssertionCredentials")
			.field("client_id", &self.client_id)
			.field("assertion", &"<redacted>")
			.field("scope", &self.scope)
			.finish()
	}
}

/// Token source performing one client-credentials exchange per [`token`](TokenSource::token)
/// call.
///
/// The source is bound to a [`CancellationToken`]: once it fires, no further requests are
/// sent and an in-flight exchange is dropped.
pub struct ClientAssertionSource<C = ReqwestHttpClient, M = ReqwestTransportErrorMapper>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	facade: BasicFacade<C, M>,
	strategy: Arc<dyn ProviderStrategy>,
	assertion: TokenSecret,
	scope: String,
	cancel: CancellationToken,
}
impl ClientAssertionSource {
	/// Builds a source backed by reqwest.
	pub fn new(
		descriptor: &ProviderDescriptor,
		credentials: AssertionCredentials,
		http_client: ReqwestHttpClient,
		cancel: CancellationToken,
	) -> Result<Self> {
		Self::with_http_client(
			descriptor,
			credentials,
			http_client,
			ReqwestTransportErrorMapper,
			cancel,
		)
	}
}
impl<C, M> ClientAssertionSource<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds a source on a caller-supplied HTTP client and error mapper.
	pub fn with_http_client(
		descriptor: &ProviderDescriptor,
		credentials: AssertionCredentials,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
		cancel: CancellationToken,
	) -> Result<Self> {
		let scope = descriptor.resolve_scope(credentials.scope.as_deref()).to_owned();
		let facade = <BasicFacade<C, M>>::from_descriptor(
			descriptor,
			&credentials.client_id,
			http_client,
			mapper,
		)?;

		Ok(Self {
			facade,
			strategy: Arc::new(DefaultProviderStrategy),
			assertion: credentials.assertion,
			scope,
			cancel,
		})
	}

	/// Replaces the error-classification strategy.
	pub fn with_strategy(mut self, strategy: Arc<dyn ProviderStrategy>) -> Self {
		self.strategy = strategy;

		self
	}

	/// Scope sent with every exchange.
	pub fn scope(&self) -> &str {
		&self.scope
	}
}
impl<C, M> TokenSource for ClientAssertionSource<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(async move {
			if self.cancel.is_cancelled() {
				return Err(Error::Cancelled);
			}

			const KIND: OperationKind = OperationKind::TokenExchange;

			let span = OperationSpan::new(KIND, "client_assertion");

			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

			let result = span
				.instrument(async {
					tokio::select! {
						biased;
						_ = self.cancel.cancelled() => Err(Error::Cancelled),
						result = self.facade.exchange_client_assertion(
							self.strategy.as_ref(),
							&self.scope,
							self.assertion.expose(),
						) => result,
					}
				})
				.await;

			obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

			result
		})
	}
}
