//! Token endpoint descriptor consumed by client-assertion token sources.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Production ABM OAuth 2.0 token endpoint.
pub const TOKEN_URL: &str = "https://account.apple.com/auth/oauth2/token";
/// Scope granting access to the ABM API.
pub const SCOPE_BUSINESS_API: &str = "business.api";
/// `client_assertion_type` value identifying JWT-bearer client assertions.
pub const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Immutable token endpoint descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Token endpoint receiving client-credentials exchanges.
	pub token_endpoint: Url,
	/// Scope requested when the caller does not supply one.
	pub default_scope: String,
}
impl ProviderDescriptor {
	/// Creates a new builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::default()
	}

	/// Descriptor for the production ABM token endpoint and the `business.api` scope.
	pub fn abm() -> Result<Self, ProviderDescriptorError> {
		let token_endpoint = Url::parse(TOKEN_URL).map_err(|source| {
			ProviderDescriptorError::InvalidEndpoint { endpoint: "token", source }
		})?;

		Self::builder().token_endpoint(token_endpoint).default_scope(SCOPE_BUSINESS_API).build()
	}

	/// Returns `scope` when non-empty, otherwise [`default_scope`](Self::default_scope).
	pub fn resolve_scope<'a>(&'a self, scope: Option<&'a str>) -> &'a str {
		match scope.map(str::trim) {
			Some(scope) if !scope.is_empty() => scope,
			_ => &self.default_scope,
		}
	}
}
