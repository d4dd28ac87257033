//! Strategy hooks that customize client-credentials token exchanges.
//!
//! Implementations decorate outgoing token requests and classify OAuth error bodies
//! without tying the token source to any particular HTTP client.

// self
use crate::_prelude::*;

/// Strategy hook that allows callers to decorate token requests and classify errors.
///
/// Implementors are required to be `Send + Sync`, and the hooks only see crate-owned
/// data so downstream crates never depend on reqwest-specific structures.
pub trait ProviderStrategy: Send + Sync {
	/// Maps an OAuth error response into the crate taxonomy.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;

	/// Adds custom form parameters before the request is dispatched.
	///
	/// The default implementation does nothing. Keys that collide with the fields the
	/// exchange already sets (`grant_type`, `client_id`, `client_assertion_type`,
	/// `client_assertion`, `scope`) are skipped.
	fn augment_token_request(&self, _form: &mut BTreeMap<String, String>) {}
}

/// Canonical token error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the client-credentials grant.
	InvalidGrant,
	/// Client authentication failed (bad or expired assertion, unknown client).
	InvalidClient,
	/// Requested scope is not available.
	InsufficientScope,
	/// Anything else; surfaced as an unexpected token-endpoint response.
	Unexpected,
}

/// Context passed to strategies when classifying token errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// HTTP status code returned by the endpoint, when available.
	pub http_status: Option<u16>,
	/// OAuth `error` field.
	pub oauth_error: Option<String>,
	/// OAuth `error_description` field.
	pub error_description: Option<String>,
}
impl ProviderErrorContext {
	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}
}

/// Default strategy: OAuth `error` code first, then the description, then the HTTP status.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		ctx.oauth_error
			.as_deref()
			.and_then(match_error_code)
			.or_else(|| ctx.error_description.as_deref().and_then(match_description))
			.unwrap_or_else(|| classify_status(ctx.http_status))
	}
}

fn match_error_code(value: &str) -> Option<ProviderErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(ProviderErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(ProviderErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("insufficient_scope")
	{
		Some(ProviderErrorKind::InsufficientScope)
	} else {
		None
	}
}

fn match_description(description: &str) -> Option<ProviderErrorKind> {
	let lowered = description.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") => Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") || text.contains("assertion") =>
			Some(ProviderErrorKind::InvalidClient),
		text if text.contains("invalid_scope") || text.contains("insufficient_scope") =>
			Some(ProviderErrorKind::InsufficientScope),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(401) => ProviderErrorKind::InvalidClient,
		Some(403) => ProviderErrorKind::InsufficientScope,
		_ => ProviderErrorKind::Unexpected,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn oauth_error_code_wins_over_status() {
		let strategy = DefaultProviderStrategy;
		let ctx = ProviderErrorContext::default()
			.with_http_status(401)
			.with_oauth_error("invalid_grant");

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::InvalidGrant);

		let ctx = ProviderErrorContext::default()
			.with_http_status(400)
			.with_oauth_error("invalid_client");

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::InvalidClient);
	}

	#[test]
	fn falls_back_to_description_then_status() {
		let strategy = DefaultProviderStrategy;
		let ctx = ProviderErrorContext::default()
			.with_oauth_error("custom_error")
			.with_error_description("Client assertion has expired.");

		assert_eq!(strategy.classify_token_error(&ctx), ProviderErrorKind::InvalidClient);
		assert_eq!(
			strategy.classify_token_error(&ProviderErrorContext::default().with_http_status(403)),
			ProviderErrorKind::InsufficientScope
		);
		assert_eq!(
			strategy.classify_token_error(&ProviderErrorContext::default().with_http_status(503)),
			ProviderErrorKind::Unexpected
		);
	}
}
