//! Organization device resources.

// self
use crate::{
	_prelude::*,
	model::{
		DocumentLinks, Linkage, PagedDocumentLinks, PagingInformation, RelationshipLinks,
		ResourceLinks, nullable,
	},
};

/// Resource type of organization devices.
pub const ORG_DEVICES_TYPE: &str = "orgDevices";

/// Paged list of organization devices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDevicesResponse {
	/// Devices on this page.
	#[serde(default, deserialize_with = "nullable")]
	pub data: Vec<OrgDevice>,
	/// Navigation links.
	#[serde(default, deserialize_with = "nullable")]
	pub links: PagedDocumentLinks,
	/// Paging metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<PagingInformation>,
}

/// Single organization device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDeviceResponse {
	/// The device.
	pub data: OrgDevice,
	/// Document links.
	#[serde(default, deserialize_with = "nullable")]
	pub links: DocumentLinks,
}

/// Organization device resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDevice {
	/// Device attributes; absent when filtered out by `fields[orgDevices]`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attributes: Option<OrgDeviceAttributes>,
	/// Device identifier (the serial number).
	pub id: String,
	/// Resource links.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<ResourceLinks>,
	/// Relationship links.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relationships: Option<OrgDeviceRelationships>,
	/// Resource type, `orgDevices`.
	#[serde(rename = "type", default, deserialize_with = "nullable")]
	pub kind: String,
}

/// Product family of a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductFamily {
	/// iPhone.
	#[serde(rename = "iPhone")]
	IPhone,
	/// iPad.
	#[serde(rename = "iPad")]
	IPad,
	/// Mac.
	Mac,
	/// Apple TV.
	AppleTV,
	/// Apple Watch.
	Watch,
	/// Apple Vision.
	Vision,
	/// Value not known to this crate.
	#[serde(other)]
	Unknown,
}

/// Where the device was purchased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseSourceType {
	/// Purchased from Apple.
	Apple,
	/// Purchased from a reseller.
	Reseller,
	/// Added manually in Apple Configurator.
	ManuallyAdded,
	/// Value not known to this crate.
	#[serde(other)]
	Unknown,
}

/// Assignment status of a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
	/// Assigned to a device management service.
	Assigned,
	/// Not assigned.
	Unassigned,
	/// Value not known to this crate.
	#[serde(other)]
	Unknown,
}

/// Attributes of an organization device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDeviceAttributes {
	/// Date the device joined the organization.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub added_to_org_date_time: Option<OffsetDateTime>,
	/// Date the device was released from the organization.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub released_from_org_date_time: Option<OffsetDateTime>,
	/// Marketing color name.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub color: String,
	/// Storage capacity, e.g. `256GB`.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub device_capacity: String,
	/// Marketing model name.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub device_model: String,
	/// eSIM identifier.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub eid: String,
	/// IMEI numbers.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub imei: Vec<String>,
	/// MEID numbers.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub meid: Vec<String>,
	/// Wi-Fi MAC addresses.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub wifi_mac_address: Vec<String>,
	/// Bluetooth MAC addresses.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub bluetooth_mac_address: Vec<String>,
	/// Ethernet MAC addresses.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
	pub ethernet_mac_address: Vec<String>,
	/// Date the device was ordered.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub order_date_time: Option<OffsetDateTime>,
	/// Order number.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub order_number: String,
	/// Apple part number.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub part_number: String,
	/// Product family.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub product_family: Option<ProductFamily>,
	/// Product type identifier, e.g. `iPhone16,2`.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub product_type: String,
	/// Purchase channel.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub purchase_source_type: Option<PurchaseSourceType>,
	/// Identifier of the purchase source.
	#[serde(
		rename = "purchaseSourceId",
		default,
		deserialize_with = "nullable",
		skip_serializing_if = "String::is_empty"
	)]
	pub purchase_source_id: String,
	/// Hardware serial number.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub serial_number: String,
	/// Assignment status.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<DeviceStatus>,
	/// Date the record last changed.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub updated_date_time: Option<OffsetDateTime>,
}

/// Relationship blocks of an organization device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDeviceRelationships {
	/// Link to the assigned device management service.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub assigned_server: Option<RelationshipBlock>,
	/// Link to AppleCare coverage.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub apple_care_coverage: Option<RelationshipBlock>,
}

/// Relationship carrying only links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipBlock {
	/// Relationship links.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<RelationshipLinks>,
}

/// Linkage from a device to its assigned device management service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDeviceAssignedServerLinkageResponse {
	/// The linkage.
	pub data: Linkage,
	/// Document links.
	#[serde(default, deserialize_with = "nullable")]
	pub links: DocumentLinks,
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn decodes_device_attributes_and_unknown_enums() {
		let payload = r#"{
			"data": [{
				"id": "C02XYZ",
				"type": "orgDevices",
				"attributes": {
					"serialNumber": "C02XYZ",
					"partNumber": "MX2E2LL/A",
					"productFamily": "iPhone",
					"purchaseSourceType": "CARRIER",
					"purchaseSourceId": "1234",
					"status": "UNASSIGNED",
					"imei": ["356938035643809"],
					"addedToOrgDateTime": "2025-03-04T05:06:07Z"
				}
			}],
			"links": {"self": "https://api-business.apple.com/v1/orgDevices"}
		}"#;
		let response: OrgDevicesResponse =
			serde_json::from_str(payload).expect("Device list fixture should decode.");
		let attributes =
			response.data[0].attributes.as_ref().expect("Attributes should be present.");

		assert_eq!(response.data[0].kind, ORG_DEVICES_TYPE);
		assert_eq!(attributes.part_number, "MX2E2LL/A");
		assert_eq!(attributes.product_family, Some(ProductFamily::IPhone));
		assert_eq!(attributes.purchase_source_type, Some(PurchaseSourceType::Unknown));
		assert_eq!(attributes.purchase_source_id, "1234");
		assert_eq!(attributes.status, Some(DeviceStatus::Unassigned));
		assert_eq!(
			attributes.added_to_org_date_time,
			Some(macros::datetime!(2025-03-04 05:06:07 UTC))
		);
		assert!(response.links.next.is_empty());
	}
}
