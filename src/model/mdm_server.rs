//! Device management service (MDM server) resources.

// self
use crate::{
	_prelude::*,
	model::{
		DocumentLinks, Linkage, OrgDevice, PagedDocumentLinks, PagingInformation,
		RelationshipLinks, nullable,
	},
};

/// Resource type of device management services.
pub const MDM_SERVERS_TYPE: &str = "mdmServers";

/// Paged list of device management services.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdmServersResponse {
	/// Servers on this page.
	#[serde(default, deserialize_with = "nullable")]
	pub data: Vec<MdmServer>,
	/// Devices pulled in through `include`.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub included: Vec<OrgDevice>,
	/// Navigation links.
	#[serde(default, deserialize_with = "nullable")]
	pub links: PagedDocumentLinks,
	/// Paging metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<PagingInformation>,
}

/// Single device management service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdmServerResponse {
	/// The server.
	pub data: MdmServer,
	/// Devices pulled in through `include`.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub included: Vec<OrgDevice>,
	/// Document links.
	#[serde(default, deserialize_with = "nullable")]
	pub links: DocumentLinks,
}

/// Device management service resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdmServer {
	/// Server attributes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attributes: Option<MdmServerAttributes>,
	/// Server identifier.
	pub id: String,
	/// Relationship blocks.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relationships: Option<MdmServerRelationships>,
	/// Resource type, `mdmServers`.
	#[serde(rename = "type", default, deserialize_with = "nullable")]
	pub kind: String,
}

/// Attributes of a device management service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdmServerAttributes {
	/// Creation date.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub created_date_time: Option<OffsetDateTime>,
	/// Display name.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub server_name: String,
	/// Server type, e.g. `MDM` or `APPLE_CONFIGURATOR`.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub server_type: String,
	/// Last modification date.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub updated_date_time: Option<OffsetDateTime>,
}

/// Relationship blocks of a device management service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdmServerRelationships {
	/// Devices assigned to the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub devices: Option<MdmServerDevicesRelationship>,
}

/// Devices relationship of a device management service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdmServerDevicesRelationship {
	/// Device linkages.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub data: Vec<Linkage>,
	/// Relationship links.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<RelationshipLinks>,
	/// Paging metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<PagingInformation>,
}

/// Paged list of device linkages for one device management service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdmServerDevicesLinkagesResponse {
	/// Device linkages on this page.
	#[serde(default, deserialize_with = "nullable")]
	pub data: Vec<Linkage>,
	/// Navigation links.
	#[serde(default, deserialize_with = "nullable")]
	pub links: PagedDocumentLinks,
	/// Paging metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<PagingInformation>,
}
