//! AppleCare coverage resources.

// self
use crate::{
	_prelude::*,
	model::{PagedDocumentLinks, PagingInformation, nullable},
};

/// Paged list of AppleCare coverage entries for one device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppleCareCoverageResponse {
	/// Coverage entries.
	#[serde(default, deserialize_with = "nullable")]
	pub data: Vec<AppleCareCoverage>,
	/// Navigation links.
	#[serde(default, deserialize_with = "nullable")]
	pub links: PagedDocumentLinks,
	/// Paging metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<PagingInformation>,
}

/// AppleCare coverage resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppleCareCoverage {
	/// Coverage attributes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attributes: Option<AppleCareCoverageAttributes>,
	/// Coverage identifier.
	pub id: String,
	/// Resource type.
	#[serde(rename = "type", default, deserialize_with = "nullable")]
	pub kind: String,
}

/// How a coverage plan is paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoveragePaymentType {
	/// AppleCare for Enterprise subscription.
	AbeSubscription,
	/// Paid up front.
	PaidUpFront,
	/// Subscription.
	Subscription,
	/// No payment.
	#[serde(rename = "NONE")]
	NoPayment,
	/// Value not known to this crate.
	#[serde(other)]
	Unknown,
}

/// Status of a coverage plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
	/// Coverage is in effect.
	Active,
	/// Coverage lapsed or was cancelled.
	Inactive,
	/// Value not known to this crate.
	#[serde(other)]
	Unknown,
}

/// Attributes of an AppleCare coverage plan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleCareCoverageAttributes {
	/// Agreement number.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub agreement_number: String,
	/// Contract cancellation date.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub contract_cancel_date_time: Option<OffsetDateTime>,
	/// Plan description.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub description: String,
	/// Coverage end date.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub end_date_time: Option<OffsetDateTime>,
	/// Whether the plan was cancelled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_canceled: Option<bool>,
	/// Whether the plan can be renewed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_renewable: Option<bool>,
	/// Payment type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payment_type: Option<CoveragePaymentType>,
	/// Coverage start date.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub start_date_time: Option<OffsetDateTime>,
	/// Coverage status.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<CoverageStatus>,
}
