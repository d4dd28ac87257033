//! Org-device activities: asynchronous assign/unassign jobs.

// self
use crate::{
	_prelude::*,
	model::{
		DocumentLinks, Linkage, MDM_SERVERS_TYPE, ORG_DEVICES_TYPE, ResourceLinks, nullable,
	},
};

/// Resource type of org-device activities.
pub const ORG_DEVICE_ACTIVITIES_TYPE: &str = "orgDeviceActivities";

/// Single org-device activity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDeviceActivityResponse {
	/// The activity.
	pub data: OrgDeviceActivity,
	/// Document links.
	#[serde(default, deserialize_with = "nullable")]
	pub links: DocumentLinks,
}

/// Org-device activity resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDeviceActivity {
	/// Activity attributes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attributes: Option<OrgDeviceActivityAttributes>,
	/// Activity identifier.
	pub id: String,
	/// Resource links.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<ResourceLinks>,
	/// Resource type, `orgDeviceActivities`.
	#[serde(rename = "type", default, deserialize_with = "nullable")]
	pub kind: String,
}

/// Attributes of an org-device activity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDeviceActivityAttributes {
	/// Completion date.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub completed_date_time: Option<OffsetDateTime>,
	/// Creation date.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub created_date_time: Option<OffsetDateTime>,
	/// Link to the activity log.
	#[serde(
		rename = "downloadUrl",
		default,
		deserialize_with = "nullable",
		skip_serializing_if = "String::is_empty"
	)]
	pub download_url: String,
	/// Overall status.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub status: String,
	/// Detailed status.
	#[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
	pub sub_status: String,
}

/// Kind of org-device activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
	/// Assign devices to a device management service.
	AssignDevices,
	/// Unassign devices from a device management service.
	UnassignDevices,
	/// Value not known to this crate.
	#[serde(other)]
	Unknown,
}

/// Payload creating an org-device activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDeviceActivityCreateRequest {
	/// Request body.
	pub data: OrgDeviceActivityCreateData,
}
impl OrgDeviceActivityCreateRequest {
	/// Builds a request applying `activity_type` to `device_ids` against `mdm_server_id`.
	pub fn new<I, S>(
		activity_type: ActivityType,
		mdm_server_id: impl Into<String>,
		device_ids: I,
	) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			data: OrgDeviceActivityCreateData {
				attributes: OrgDeviceActivityCreateAttributes { activity_type },
				relationships: OrgDeviceActivityCreateRelationships {
					devices: LinkageList {
						data: device_ids
							.into_iter()
							.map(|id| Linkage::new(ORG_DEVICES_TYPE, id))
							.collect(),
					},
					mdm_server: LinkageItem { data: Linkage::new(MDM_SERVERS_TYPE, mdm_server_id) },
				},
				kind: ORG_DEVICE_ACTIVITIES_TYPE.into(),
			},
		}
	}
}

/// Data section of an activity creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDeviceActivityCreateData {
	/// Activity attributes.
	pub attributes: OrgDeviceActivityCreateAttributes,
	/// Devices and target server.
	pub relationships: OrgDeviceActivityCreateRelationships,
	/// Resource type, `orgDeviceActivities`.
	#[serde(rename = "type")]
	pub kind: String,
}

/// Attributes of an activity creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDeviceActivityCreateAttributes {
	/// Requested activity.
	pub activity_type: ActivityType,
}

/// Relationships of an activity creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDeviceActivityCreateRelationships {
	/// Devices the activity applies to.
	pub devices: LinkageList,
	/// Target device management service.
	pub mdm_server: LinkageItem,
}

/// To-many relationship data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageList {
	/// Linkages.
	pub data: Vec<Linkage>,
}

/// To-one relationship data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageItem {
	/// Linkage.
	pub data: Linkage,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn create_request_serializes_json_api_shape() {
		let request = OrgDeviceActivityCreateRequest::new(
			ActivityType::AssignDevices,
			"SERVER-1",
			["C02XYZ", "C02ABC"],
		);
		let value = serde_json::to_value(&request).expect("Create request should serialize.");

		assert_eq!(
			value,
			serde_json::json!({
				"data": {
					"attributes": {"activityType": "ASSIGN_DEVICES"},
					"relationships": {
						"devices": {"data": [
							{"id": "C02XYZ", "type": "orgDevices"},
							{"id": "C02ABC", "type": "orgDevices"}
						]},
						"mdmServer": {"data": {"id": "SERVER-1", "type": "mdmServers"}}
					},
					"type": "orgDeviceActivities"
				}
			})
		);
	}
}
