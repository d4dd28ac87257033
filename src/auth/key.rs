//! Elliptic-curve private key parsing for client assertions.
//!
//! ABM keys are PKCS#8 DER payloads, but the downloaded `.pem` files carry either the
//! `PRIVATE KEY` or the `EC PRIVATE KEY` label. Both labels are decoded as PKCS#8 (never as
//! SEC1), and the curve named by the algorithm parameters must be P-256.

// crates.io
use jsonwebtoken::EncodingKey;
use pkcs8::{ObjectIdentifier, PrivateKeyInfo};
// self
use crate::_prelude::*;

const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");
const SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

/// PEM labels accepted for PKCS#8 payloads.
pub const ACCEPTED_PEM_LABELS: [&str; 2] = ["EC PRIVATE KEY", "PRIVATE KEY"];

/// Failures raised while turning PEM bytes into a [`SigningKey`].
#[derive(Debug, ThisError)]
pub enum KeyError {
	/// Input does not contain a PEM block.
	#[error("Missing PEM block.")]
	MissingPemBlock {
		/// Underlying PEM framing failure.
		#[source]
		source: pem::PemError,
	},
	/// PEM block carries a label other than [`ACCEPTED_PEM_LABELS`].
	#[error("Unsupported PEM block type: {label:?}.")]
	UnsupportedLabel {
		/// Label found in the PEM header.
		label: String,
	},
	/// Payload is not valid PKCS#8 DER.
	#[error("Failed to parse {label:?} private key.")]
	Malformed {
		/// Label found in the PEM header.
		label: String,
		/// Underlying DER failure.
		#[source]
		source: pkcs8::Error,
	},
	/// PKCS#8 payload holds a non-EC key.
	#[error("Unexpected private key algorithm: {oid}.")]
	UnexpectedAlgorithm {
		/// Algorithm OID in dotted form.
		oid: String,
	},
	/// EC key omits or garbles its named-curve parameters.
	#[error("EC private key does not name a curve.")]
	MissingCurve {
		/// Underlying algorithm-parameter failure.
		#[source]
		source: pkcs8::spki::Error,
	},
	/// EC key sits on a curve other than [`SigningKey::CURVE`].
	#[error("Unexpected elliptic curve: {curve}.")]
	WrongCurve {
		/// Curve name, or the dotted OID when the curve is not recognized.
		curve: String,
	},
	/// Signing the assertion failed.
	#[error("Failed to sign client assertion.")]
	Signing {
		/// Underlying JWT failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// P-256 private key held as validated PKCS#8 DER.
///
/// Parsed fresh for every assertion and never cached.
#[derive(Clone)]
pub struct SigningKey {
	der: Vec<u8>,
	curve: &'static str,
}
impl SigningKey {
	/// The only curve accepted for ABM client assertions.
	pub const CURVE: &'static str = "P-256";

	/// Parses a PEM container holding a PKCS#8 EC key.
	pub fn from_pem(bytes: &[u8]) -> Result<Self, KeyError> {
		let block = pem::parse(bytes).map_err(|source| KeyError::MissingPemBlock { source })?;
		let label = block.tag();

		if !ACCEPTED_PEM_LABELS.contains(&label) {
			return Err(KeyError::UnsupportedLabel { label: label.to_owned() });
		}

		Self::decode(label, block.contents())
	}

	/// Parses raw PKCS#8 DER bytes.
	pub fn from_pkcs8_der(der: &[u8]) -> Result<Self, KeyError> {
		Self::decode("PRIVATE KEY", der)
	}

	/// Name of the curve the key lives on.
	pub fn curve(&self) -> &'static str {
		self.curve
	}

	pub(crate) fn encoding_key(&self) -> EncodingKey {
		EncodingKey::from_ec_der(&self.der)
	}

	fn decode(label: &str, der: &[u8]) -> Result<Self, KeyError> {
		let info = PrivateKeyInfo::try_from(der)
			.map_err(|source| KeyError::Malformed { label: label.to_owned(), source })?;

		if info.algorithm.oid != ID_EC_PUBLIC_KEY {
			return Err(KeyError::UnexpectedAlgorithm { oid: info.algorithm.oid.to_string() });
		}

		let curve_oid =
			info.algorithm.parameters_oid().map_err(|source| KeyError::MissingCurve { source })?;
		let curve = curve_name(curve_oid);

		if curve != Some(Self::CURVE) {
			return Err(KeyError::WrongCurve {
				curve: curve.map(str::to_owned).unwrap_or_else(|| curve_oid.to_string()),
			});
		}

		Ok(Self { der: der.to_vec(), curve: Self::CURVE })
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningKey").field("curve", &self.curve).finish_non_exhaustive()
	}
}

/// Parses PEM bytes into a [`SigningKey`].
pub fn parse_private_key(bytes: &[u8]) -> Result<SigningKey, KeyError> {
	SigningKey::from_pem(bytes)
}

fn curve_name(oid: ObjectIdentifier) -> Option<&'static str> {
	[(SECP256R1, "P-256"), (SECP384R1, "P-384"), (SECP521R1, "P-521"), (SECP256K1, "secp256k1")]
		.into_iter()
		.find_map(|(known, name)| (known == oid).then_some(name))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const P256_PKCS8: &str = include_str!("../../tests/fixtures/p256_pkcs8.pem");
	const P256_EC_LABEL: &str = include_str!("../../tests/fixtures/p256_pkcs8_ec_label.pem");
	const P256_SEC1: &str = include_str!("../../tests/fixtures/p256_sec1.pem");
	const P384_PKCS8: &str = include_str!("../../tests/fixtures/p384_pkcs8.pem");
	const ED25519_PKCS8: &str = include_str!("../../tests/fixtures/ed25519_pkcs8.pem");

	#[test]
	fn accepts_both_pkcs8_labels() {
		for pem in [P256_PKCS8, P256_EC_LABEL] {
			let key = parse_private_key(pem.as_bytes())
				.expect("P-256 PKCS#8 keys should parse under either label.");

			assert_eq!(key.curve(), SigningKey::CURVE);
		}
	}

	#[test]
	fn rejects_other_curves_explicitly() {
		let err = parse_private_key(P384_PKCS8.as_bytes())
			.expect_err("P-384 keys must never be accepted.");

		assert!(matches!(err, KeyError::WrongCurve { ref curve } if curve == "P-384"));
	}

	#[test]
	fn rejects_sec1_payloads_as_malformed() {
		let err = parse_private_key(P256_SEC1.as_bytes())
			.expect_err("SEC1 payloads are not decoded with the PKCS#8 parser.");

		assert!(matches!(err, KeyError::Malformed { ref label, .. } if label == "EC PRIVATE KEY"));
	}

	#[test]
	fn rejects_non_ec_keys() {
		let err = parse_private_key(ED25519_PKCS8.as_bytes())
			.expect_err("Ed25519 keys are not elliptic-curve ECDSA keys.");

		assert!(matches!(err, KeyError::UnexpectedAlgorithm { ref oid } if oid == "1.3.101.112"));
	}

	#[test]
	fn rejects_missing_blocks_and_unknown_labels() {
		let err = parse_private_key(b"not a pem file")
			.expect_err("Input without a PEM block should be rejected.");

		assert!(matches!(err, KeyError::MissingPemBlock { .. }));

		let relabeled = P256_PKCS8.replace("PRIVATE KEY", "RSA PRIVATE KEY");
		let err = parse_private_key(relabeled.as_bytes())
			.expect_err("Unsupported PEM labels should be rejected.");

		assert!(matches!(
			err,
			KeyError::UnsupportedLabel { ref label } if label == "RSA PRIVATE KEY"
		));
	}

	#[test]
	fn debug_output_hides_key_material() {
		let key = parse_private_key(P256_PKCS8.as_bytes()).expect("Fixture key should parse.");

		assert_eq!(format!("{key:?}"), "SigningKey { curve: \"P-256\", .. }");
	}
}
