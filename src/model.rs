//! Serde models for the JSON:API-shaped ABM resources.
//!
//! Timestamps are RFC 3339 and decode into [`OffsetDateTime`]. Closed string enumerations
//! carry an `Unknown` variant so values added by the API later do not break decoding.

pub mod activity;
pub mod coverage;
pub mod device;
pub mod mdm_server;

pub use activity::*;
pub use coverage::*;
pub use device::*;
pub use mdm_server::*;

// crates.io
use serde::Deserializer;
// self
use crate::_prelude::*;

/// Links describing the current document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLinks {
	/// Link to this document.
	#[serde(rename = "self", default, deserialize_with = "nullable")]
	pub self_link: String,
}

/// Self link of a single resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinks {
	/// Link to the resource.
	#[serde(
		rename = "self",
		default,
		deserialize_with = "nullable",
		skip_serializing_if = "String::is_empty"
	)]
	pub self_link: String,
}

/// Links of a relationship block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipLinks {
	/// Link that includes the related resource.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub include: String,
	/// Link to the related resource.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub related: String,
	/// Link to the relationship itself.
	#[serde(
		rename = "self",
		default,
		deserialize_with = "nullable",
		skip_serializing_if = "String::is_empty"
	)]
	pub self_link: String,
}

/// Navigation links of a paged response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedDocumentLinks {
	/// First page.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub first: String,
	/// Next page; empty on the final page.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub next: String,
	/// Current page.
	#[serde(rename = "self", default, deserialize_with = "nullable")]
	pub self_link: String,
}

/// Paging metadata envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInformation {
	/// Paging state.
	pub paging: Paging,
}

/// Paging state values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
	/// Page size in effect.
	#[serde(default, deserialize_with = "nullable")]
	pub limit: u32,
	/// Opaque cursor for the next page.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub next_cursor: String,
	/// Total number of resources, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<u64>,
}

/// Resource identifier object (`{id, type}`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linkage {
	/// Resource identifier.
	pub id: String,
	/// Resource type.
	#[serde(rename = "type")]
	pub kind: String,
}
impl Linkage {
	/// Builds a linkage to `id` of resource type `kind`.
	pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
		Self { id: id.into(), kind: kind.into() }
	}
}

/// Error document returned with non-2xx statuses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Reported errors.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub errors: Vec<ErrorObject>,
}

/// One error object of an [`ErrorResponse`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
	/// Machine-readable error code.
	#[serde(default, deserialize_with = "nullable")]
	pub code: String,
	/// Human-readable explanation.
	#[serde(default, deserialize_with = "nullable")]
	pub detail: String,
	/// Unique identifier of this occurrence.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Related links.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<ErrorLinks>,
	/// Free-form metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<serde_json::Map<String, serde_json::Value>>,
	/// Request location the error refers to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<ErrorSource>,
	/// HTTP status as a string.
	#[serde(default, deserialize_with = "nullable")]
	pub status: String,
	/// Short summary.
	#[serde(default, deserialize_with = "nullable")]
	pub title: String,
}

/// Links attached to an error object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorLinks {
	/// Documentation link.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub about: String,
	/// Either a bare link or an object with `href` and `meta`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub associated: Option<serde_json::Value>,
}

/// JSON Pointer or query parameter an error refers to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
	/// JSON Pointer into the request document.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub pointer: String,
	/// Offending query parameter.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub parameter: String,
}

/// Decodes a field, treating an explicit JSON `null` like a missing key.
///
/// Pair with `#[serde(default)]` so both shapes land on `T::default()`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_response_tolerates_partial_objects() {
		let response: ErrorResponse = serde_json::from_str(
			r#"{"errors":[{"code":"FORBIDDEN","status":"403","links":{"associated":"https://x"},"source":{"parameter":"limit"}}]}"#,
		)
		.expect("Partial error objects should decode.");
		let item = &response.errors[0];

		assert_eq!(item.code, "FORBIDDEN");
		assert!(item.detail.is_empty());
		assert_eq!(item.source.as_ref().map(|s| s.parameter.as_str()), Some("limit"));
	}

	#[test]
	fn paged_links_treat_missing_next_as_empty() {
		let links: PagedDocumentLinks =
			serde_json::from_str(r#"{"self":"https://api/v1/orgDevices"}"#)
				.expect("Links without next should decode.");

		assert!(links.next.is_empty());
		assert_eq!(links.self_link, "https://api/v1/orgDevices");
	}

	#[test]
	fn explicit_nulls_decode_as_empty_values() {
		let links: PagedDocumentLinks =
			serde_json::from_str(r#"{"first":null,"next":null,"self":null}"#)
				.expect("Null links should decode.");

		assert_eq!(links, PagedDocumentLinks::default());

		let response: ErrorResponse =
			serde_json::from_str(r#"{"errors":null}"#).expect("Null error lists should decode.");

		assert!(response.errors.is_empty());
	}
}
