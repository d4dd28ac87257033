//! Crate-level error types shared by the signer, token sources, transports, and paginators.

// std
use std::path::PathBuf;
// self
use crate::{
	_prelude::*,
	auth::{BearerTokenBuilderError, KeyError},
	model::ErrorResponse,
	provider::ProviderDescriptorError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected before any I/O.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Private key could not be used to sign a client assertion.
	#[error(transparent)]
	Key(#[from] KeyError),
	/// Token endpoint returned something the exchange could not use.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// API responded with an unexpected status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Response payload could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// The governing cancellation token fired before or during the operation.
	#[error("Operation was cancelled.")]
	Cancelled,
	/// The API kept returning `next` links past the page ceiling.
	#[error("Pagination exceeded {max_pages} pages.")]
	PageLimitExceeded {
		/// Ceiling that was reached.
		max_pages: usize,
	},
	/// A page advertised a `next` link that is not a valid URL reference.
	#[error("Next page link `{link}` is not a valid URL.")]
	InvalidNextLink {
		/// Raw link value returned by the API.
		link: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Client authentication failed or the assertion was rejected.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Provider rejected the client-credentials grant.
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Requested scope is not available to the client.
	#[error("Token lacks the required scopes: {reason}.")]
	InsufficientScope {
		/// Provider-supplied reason string.
		reason: String,
	},
}
impl Error {
	/// Returns `true` when the error stems from cancellation rather than a failure.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

/// Configuration and validation failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] ProviderDescriptorError),
	/// Token endpoint URL cannot be used by the OAuth client.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenUrl {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},

	/// Client identifier was empty.
	#[error("Client ID is required.")]
	MissingClientId,
	/// Client assertion was empty.
	#[error("Client assertion is required.")]
	MissingAssertion,
	/// A path identifier was empty after trimming.
	#[error("The {name} is required.")]
	MissingId {
		/// Human-readable identifier name.
		name: &'static str,
	},
	/// Page-size limit exceeds the API maximum.
	#[error("The limit must be <= {max}: {limit}.")]
	LimitOutOfRange {
		/// Requested limit.
		limit: u32,
		/// Maximum accepted by the API.
		max: u32,
	},
	/// API base URL could not be parsed.
	#[error("Base URL `{url}` cannot be parsed.")]
	InvalidBaseUrl {
		/// Raw base URL.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// API base URL is not absolute.
	#[error("Base URL must be absolute: {url}.")]
	RelativeBaseUrl {
		/// Raw base URL.
		url: String,
	},
	/// API base URL does not name a host.
	#[error("Base URL host is required: {url}.")]
	MissingBaseUrlHost {
		/// Raw base URL.
		url: String,
	},
	/// Private key file could not be read.
	#[error("Private key file `{}` cannot be read.", .path.display())]
	ReadKey {
		/// Location of the key file.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// Request body could not be serialized.
	#[error("Request body cannot be encoded.")]
	EncodeBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Access token cannot be carried in an `Authorization` header.
	#[error("Access token contains characters that are not valid in an HTTP header.")]
	InvalidAuthorizationHeader,
	/// Token builder validation failed.
	#[error("Unable to build bearer token.")]
	TokenBuild(#[from] BearerTokenBuilderError),
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token endpoint failures that are not OAuth error classifications.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Provider returned an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Endpoint {
		/// Provider- or client-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {target}.")]
	Network {
		/// Which endpoint family was being called.
		target: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a network error raised while calling the token endpoint.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { target: "the token endpoint", source: Box::new(src) }
	}

	/// Wraps a network error raised while calling the management API.
	pub fn api(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { target: "the API", source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::api(e)
	}
}

/// Non-2xx API response with the raw body and the parsed error document.
#[derive(Clone, Debug)]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Canonical reason phrase for [`status`](Self::status), when known.
	pub reason: Option<&'static str>,
	/// Response body with surrounding whitespace trimmed.
	pub body: String,
	/// Parsed `{errors: [...]}` document; empty when the body was not parseable.
	pub response: ErrorResponse,
}
impl ApiError {
	/// Builds an error from a status and raw payload, parsing the error document when possible.
	pub fn from_payload(status: u16, reason: Option<&'static str>, payload: &[u8]) -> Self {
		let body = String::from_utf8_lossy(payload).trim().to_owned();
		let response = if payload.is_empty() {
			ErrorResponse::default()
		} else {
			serde_json::from_slice(payload).unwrap_or_default()
		};

		Self { status, reason, body, response }
	}

	/// Returns the status line (`404 Not Found`) for diagnostics.
	pub fn status_line(&self) -> String {
		match self.reason {
			Some(reason) => format!("{} {reason}", self.status),
			None => self.status.to_string(),
		}
	}
}
impl Display for ApiError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		if let Some(item) = self.response.errors.first() {
			if !item.code.is_empty() || !item.detail.is_empty() {
				return write!(
					f,
					"ABM API error: status={} code={:?} detail={:?}.",
					self.status_line(),
					item.code,
					item.detail
				);
			}
		}
		if self.body.is_empty() {
			return write!(f, "ABM API error: status={}.", self.status_line());
		}

		write!(f, "ABM API error: status={} body={:?}.", self.status_line(), self.body)
	}
}
impl StdError for ApiError {}

/// Payload decoding failure tagged with the decoding step.
#[derive(Debug, ThisError)]
#[error("Failed to decode the {step} payload.")]
pub struct DecodeError {
	/// Name of the decoding step (usually the resource being decoded).
	pub step: &'static str,
	/// Structured parsing failure including the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}
impl DecodeError {
	/// Deserializes `payload` as JSON, tagging failures with `step`.
	pub fn json<T>(step: &'static str, payload: &[u8]) -> Result<T, Self>
	where
		T: serde::de::DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(payload);

		serde_path_to_error::deserialize(&mut de).map_err(|source| Self { step, source })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_prefers_parsed_error_details() {
		let payload = br#"{"errors":[{"code":"NOT_FOUND","detail":"Unknown device.","status":"404","title":"Not Found"}]}"#;
		let err = ApiError::from_payload(404, Some("Not Found"), payload);

		assert_eq!(err.response.errors.len(), 1);
		assert_eq!(
			err.to_string(),
			"ABM API error: status=404 Not Found code=\"NOT_FOUND\" detail=\"Unknown device.\"."
		);
	}

	#[test]
	fn api_error_falls_back_to_trimmed_body() {
		let err = ApiError::from_payload(502, Some("Bad Gateway"), b"  upstream unavailable \n");

		assert!(err.response.errors.is_empty());
		assert_eq!(err.body, "upstream unavailable");
		assert_eq!(
			err.to_string(),
			"ABM API error: status=502 Bad Gateway body=\"upstream unavailable\"."
		);

		let empty = ApiError::from_payload(500, None, b"");

		assert_eq!(empty.to_string(), "ABM API error: status=500.");
	}

	#[test]
	fn decode_error_reports_step_and_path() {
		#[derive(Debug, Deserialize)]
		struct Envelope {
			#[allow(dead_code)]
			data: Vec<u32>,
		}

		let err = DecodeError::json::<Envelope>("orgDevices", br#"{"data":[1,"two"]}"#)
			.expect_err("Mismatched element types should fail to decode.");

		assert_eq!(err.step, "orgDevices");
		assert_eq!(err.source.path().to_string(), "data[1]");
		assert_eq!(err.to_string(), "Failed to decode the orgDevices payload.");
	}
}
