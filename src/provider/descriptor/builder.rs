// self
use crate::{
	_prelude::*,
	provider::{ProviderDescriptor, SCOPE_BUSINESS_API},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Endpoint string could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Default scope must hold at least one non-whitespace character.
	#[error("Default scope must not be empty.")]
	EmptyDefaultScope,
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Token endpoint used for client-credentials exchanges.
	pub token_endpoint: Option<Url>,
	/// Scope requested when callers leave it empty.
	pub default_scope: String,
}
impl ProviderDescriptorBuilder {
	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Overrides the default scope.
	pub fn default_scope(mut self, scope: impl Into<String>) -> Self {
		self.default_scope = scope.into();

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let token_endpoint =
			self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let descriptor = ProviderDescriptor {
			token_endpoint,
			default_scope: self.default_scope.trim().to_owned(),
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}
impl Default for ProviderDescriptorBuilder {
	fn default() -> Self {
		Self { token_endpoint: None, default_scope: SCOPE_BUSINESS_API.into() }
	}
}

impl ProviderDescriptor {
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		if self.token_endpoint.scheme() != "https" {
			return Err(ProviderDescriptorError::InsecureEndpoint {
				endpoint: "token",
				url: self.token_endpoint.to_string(),
			});
		}
		if self.default_scope.is_empty() {
			return Err(ProviderDescriptorError::EmptyDefaultScope);
		}

		Ok(())
	}
}
