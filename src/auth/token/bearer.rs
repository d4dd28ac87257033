//! Bearer token issued by the token endpoint, lifecycle helpers, and builder.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Lifecycle status of a [`BearerToken`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// Issued-at instant lies in the future.
	Pending,
	/// Token is usable.
	Active,
	/// Token reached its expiry instant.
	Expired,
}

/// Errors produced by [`BearerTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum BearerTokenBuilderError {
	/// No access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// No expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
}

/// Access token plus the metadata needed to decide when it must be replaced.
#[derive(Clone)]
pub struct BearerToken {
	/// Access token secret.
	pub access_token: TokenSecret,
	/// Token type reported by the endpoint, usually `Bearer`.
	pub token_type: String,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Instant the token stops being accepted.
	pub expires_at: OffsetDateTime,
}
impl BearerToken {
	/// Returns a builder.
	pub fn builder() -> BearerTokenBuilder {
		BearerTokenBuilder::default()
	}

	/// Computes the lifecycle status at `instant`.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant < self.issued_at {
			return TokenStatus::Pending;
		}
		if instant >= self.expires_at {
			return TokenStatus::Expired;
		}

		TokenStatus::Active
	}

	/// Returns `true` if the token is expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` if the token is expired now.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` when the token expires within `window` of `instant`.
	pub fn expires_within(&self, window: Duration, instant: OffsetDateTime) -> bool {
		self.access_token.is_empty() || self.expires_at - window <= instant
	}

	/// Renders the `Authorization` header value.
	///
	/// Any casing of `bearer` (or an empty type) is normalized to `Bearer`.
	pub fn authorization_value(&self) -> String {
		let scheme = if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer")
		{
			"Bearer"
		} else {
			self.token_type.as_str()
		};

		format!("{scheme} {}", self.access_token.expose())
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerToken")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`BearerToken`].
#[derive(Clone, Debug, Default)]
pub struct BearerTokenBuilder {
	access_token: Option<TokenSecret>,
	token_type: Option<String>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl BearerTokenBuilder {
	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets the token type; defaults to `Bearer`.
	pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}

	/// Sets the issued-at instant; defaults to now.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry measured from the issued-at instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces a [`BearerToken`].
	pub fn build(self) -> Result<BearerToken, BearerTokenBuilderError> {
		let access_token = self.access_token.ok_or(BearerTokenBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at + delta,
			(None, None) => return Err(BearerTokenBuilderError::MissingExpiry),
		};

		Ok(BearerToken {
			access_token,
			token_type: self.token_type.unwrap_or_else(|| "Bearer".into()),
			issued_at,
			expires_at,
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn status_follows_issue_and_expiry_instants() {
		let token = BearerToken::builder()
			.access_token("access")
			.issued_at(macros::datetime!(2026-01-01 00:00 UTC))
			.expires_in(Duration::hours(1))
			.build()
			.expect("Bearer token builder should succeed with a relative expiry.");

		assert_eq!(token.expires_at, macros::datetime!(2026-01-01 01:00 UTC));
		assert_eq!(token.status_at(macros::datetime!(2025-12-31 23:59 UTC)), TokenStatus::Pending);
		assert_eq!(token.status_at(macros::datetime!(2026-01-01 00:30 UTC)), TokenStatus::Active);
		assert!(token.is_expired_at(macros::datetime!(2026-01-01 01:00 UTC)));
		let window = Duration::seconds(10);

		assert!(token.expires_within(window, macros::datetime!(2026-01-01 00:59:51 UTC)));
		assert!(!token.expires_within(window, macros::datetime!(2026-01-01 00:59:49 UTC)));
	}

	#[test]
	fn builder_requires_token_and_expiry() {
		assert_eq!(
			BearerToken::builder().expires_in(Duration::minutes(1)).build().map(|_| ()),
			Err(BearerTokenBuilderError::MissingAccessToken)
		);
		assert_eq!(
			BearerToken::builder().access_token("access").build().map(|_| ()),
			Err(BearerTokenBuilderError::MissingExpiry)
		);
	}

	#[test]
	fn authorization_value_normalizes_bearer_scheme() {
		let token = BearerToken::builder()
			.access_token("abc")
			.token_type("bearer")
			.expires_in(Duration::minutes(5))
			.build()
			.expect("Bearer token builder should succeed.");

		assert_eq!(token.authorization_value(), "Bearer abc");
		assert!(!format!("{token:?}").contains("abc"));
	}
}
