//! Signed JWT client assertions presented to the ABM token endpoint.
//!
//! An assertion names the client as both issuer and subject, targets the fixed
//! [`AUDIENCE`], and stays valid for [`ASSERTION_LIFETIME`]. Each one carries a fresh
//! random `jti` so two assertions minted in the same second never collide.

// std
use std::path::Path;
// crates.io
use jsonwebtoken::{Algorithm, Header};
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	auth::{KeyError, SigningKey, TokenSecret},
	error::ConfigError,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// Audience every ABM client assertion must target.
pub const AUDIENCE: &str = "https://account.apple.com/auth/oauth2/v2/token";
/// Fixed validity window (`exp - iat`) of a client assertion.
pub const ASSERTION_LIFETIME: Duration = Duration::days(180);

/// Registered claims carried by a client assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Issuer; always the client identifier.
	pub iss: String,
	/// Subject; always the client identifier.
	pub sub: String,
	/// Single-element audience list holding [`AUDIENCE`].
	pub aud: Vec<String>,
	/// Issued-at, seconds since the Unix epoch.
	pub iat: i64,
	/// Expiry, seconds since the Unix epoch.
	pub exp: i64,
	/// Random unique identifier.
	pub jti: String,
}
impl AssertionClaims {
	/// Builds the claim set for `client_id` issued at `now`.
	pub fn new(client_id: &str, now: OffsetDateTime) -> Self {
		let issued_at = now.unix_timestamp();

		Self {
			iss: client_id.to_owned(),
			sub: client_id.to_owned(),
			aud: vec![AUDIENCE.to_owned()],
			iat: issued_at,
			exp: issued_at + ASSERTION_LIFETIME.whole_seconds(),
			jti: Uuid::new_v4().to_string(),
		}
	}
}

/// Signed ES256 client assertion.
#[derive(Clone)]
pub struct ClientAssertion {
	jwt: TokenSecret,
	key_id: String,
	claims: AssertionClaims,
}
impl ClientAssertion {
	/// Signs a new assertion for `client_id` with `key`, tagging the header with `key_id`.
	///
	/// Returns [`Error::Cancelled`] without doing any work when `cancel` already fired.
	pub fn create(
		cancel: &CancellationToken,
		client_id: &str,
		key_id: &str,
		key: &SigningKey,
		now: OffsetDateTime,
	) -> Result<Self> {
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		const KIND: OperationKind = OperationKind::Assertion;

		let _span = OperationSpan::new(KIND, "create").entered();

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = Self::sign(client_id, key_id, key, now);

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	/// Reads the PEM key at `path`, parses it, and signs an assertion issued now.
	pub fn from_key_file(
		cancel: &CancellationToken,
		client_id: &str,
		key_id: &str,
		path: impl AsRef<Path>,
	) -> Result<Self> {
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		let path = path.as_ref();
		let bytes = std::fs::read(path)
			.map_err(|source| ConfigError::ReadKey { path: path.to_path_buf(), source })?;
		let key = SigningKey::from_pem(&bytes)?;

		Self::create(cancel, client_id, key_id, &key, OffsetDateTime::now_utc())
	}

	/// Returns the compact JWT. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.jwt.expose()
	}

	/// Key identifier placed in the JWT header.
	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	/// Claims embedded in the assertion.
	pub fn claims(&self) -> &AssertionClaims {
		&self.claims
	}

	/// Instant after which the token endpoint rejects the assertion.
	pub fn expires_at(&self) -> OffsetDateTime {
		OffsetDateTime::from_unix_timestamp(self.claims.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
	}

	fn sign(client_id: &str, key_id: &str, key: &SigningKey, now: OffsetDateTime) -> Result<Self> {
		if client_id.is_empty() {
			return Err(ConfigError::MissingClientId.into());
		}

		let claims = AssertionClaims::new(client_id, now);
		let mut header = Header::new(Algorithm::ES256);

		header.typ = Some("JWT".into());
		header.kid = Some(key_id.to_owned());

		let jwt = jsonwebtoken::encode(&header, &claims, &key.encoding_key())
			.map_err(|source| KeyError::Signing { source })?;

		Ok(Self { jwt: TokenSecret::new(jwt), key_id: key_id.to_owned(), claims })
	}
}
impl Debug for ClientAssertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientAssertion")
			.field("jwt", &"<redacted>")
			.field("key_id", &self.key_id)
			.field("claims", &self.claims)
			.finish()
	}
}
impl Display for ClientAssertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "client assertion for {} (kid {}, <redacted>)", self.claims.iss, self.key_id)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use jsonwebtoken::{DecodingKey, Validation};
	use time::macros;
	// self
	use super::*;

	const P256_PKCS8: &str = include_str!("../../tests/fixtures/p256_pkcs8.pem");
	const P256_PUBLIC: &str = include_str!("../../tests/fixtures/p256_public.pem");

	fn signing_key() -> SigningKey {
		SigningKey::from_pem(P256_PKCS8.as_bytes()).expect("Fixture key should parse.")
	}

	#[test]
	fn assertion_verifies_with_matching_public_key() {
		let now = OffsetDateTime::now_utc();
		let cancel = CancellationToken::new();
		let assertion =
			ClientAssertion::create(&cancel, "BUSINESSAPI.client", "key-1", &signing_key(), now)
				.expect("Assertion should sign with a P-256 key.");
		let header = jsonwebtoken::decode_header(assertion.expose())
			.expect("Assertion header should decode.");

		assert_eq!(header.alg, Algorithm::ES256);
		assert_eq!(header.typ.as_deref(), Some("JWT"));
		assert_eq!(header.kid.as_deref(), Some("key-1"));

		let mut validation = Validation::new(Algorithm::ES256);

		validation.set_audience(&[AUDIENCE]);
		validation.set_issuer(&["BUSINESSAPI.client"]);

		let decoding_key = DecodingKey::from_ec_pem(P256_PUBLIC.as_bytes())
			.expect("Fixture public key should parse.");
		let decoded =
			jsonwebtoken::decode::<AssertionClaims>(assertion.expose(), &decoding_key, &validation)
				.expect("Assertion should verify against the matching public key.");
		let claims = decoded.claims;

		assert_eq!(claims.sub, "BUSINESSAPI.client");
		assert_eq!(claims.aud, vec![AUDIENCE.to_owned()]);
		assert_eq!(claims.iat, now.unix_timestamp());
		assert_eq!(claims.exp - claims.iat, 180 * 24 * 60 * 60);
		assert!(!claims.jti.is_empty());
		assert_eq!(&claims, assertion.claims());
	}

	#[test]
	fn each_assertion_gets_a_unique_identifier() {
		let now = macros::datetime!(2026-01-01 00:00 UTC);
		let key = signing_key();
		let cancel = CancellationToken::new();
		let first = ClientAssertion::create(&cancel, "client", "kid", &key, now)
			.expect("First assertion should sign.");
		let second = ClientAssertion::create(&cancel, "client", "kid", &key, now)
			.expect("Second assertion should sign.");

		assert_ne!(first.claims().jti, second.claims().jti);
		assert_eq!(first.expires_at(), macros::datetime!(2026-06-30 00:00 UTC));
	}

	#[test]
	fn cancelled_token_short_circuits() {
		let cancel = CancellationToken::new();

		cancel.cancel();

		let now = OffsetDateTime::now_utc();
		let err = ClientAssertion::create(&cancel, "client", "kid", &signing_key(), now)
			.expect_err("A cancelled token should stop assertion creation.");

		assert!(err.is_cancelled());

		let err = ClientAssertion::from_key_file(&cancel, "client", "kid", "/nonexistent/key.p8")
			.expect_err("Cancellation is checked before the key file is read.");

		assert!(err.is_cancelled());
	}

	#[test]
	fn missing_key_file_and_client_id_are_config_errors() {
		let cancel = CancellationToken::new();
		let err = ClientAssertion::from_key_file(&cancel, "client", "kid", "/nonexistent/key.p8")
			.expect_err("Unreadable key files should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::ReadKey { .. })));

		let now = OffsetDateTime::now_utc();
		let err = ClientAssertion::create(&cancel, "", "kid", &signing_key(), now)
			.expect_err("An empty client ID should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingClientId)));
	}

	#[test]
	fn formatted_output_redacts_the_jwt() {
		let assertion = ClientAssertion::create(
			&CancellationToken::new(),
			"client",
			"kid",
			&signing_key(),
			OffsetDateTime::now_utc(),
		)
		.expect("Assertion should sign.");

		assert!(!format!("{assertion:?}").contains(assertion.expose()));

		let shown = assertion.to_string();

		assert_eq!(shown, "client assertion for client (kid kid, <redacted>)");
		assert!(!shown.contains(assertion.expose()));
	}
}
