//! Typed Apple Business Manager API client.
//!
//! Every request is authorized through a [`BearerTransport`], sends `Accept: application/json`,
//! and only succeeds on the status code the endpoint documents. List endpoints can also be walked
//! page by page through [`Paginator`]s.

mod query;

pub use query::*;

// crates.io
use reqwest::{
	Method, Request, StatusCode,
	header::{ACCEPT, CONTENT_TYPE, HeaderValue},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ApiError, ConfigError, DecodeError},
	http::ReqwestHttpClient,
	model::{
		AppleCareCoverageResponse, MDM_SERVERS_TYPE, MdmServer, MdmServerDevicesLinkagesResponse,
		MdmServerResponse, MdmServersResponse, ORG_DEVICE_ACTIVITIES_TYPE, ORG_DEVICES_TYPE,
		OrgDevice, OrgDeviceActivityCreateRequest, OrgDeviceActivityResponse,
		OrgDeviceAssignedServerLinkageResponse, OrgDeviceResponse, OrgDevicesResponse, nullable,
	},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	pagination::{self, Page, PageDecoder, Paginator},
	source::TokenSource,
	transport::{ApiTransport, BearerTransport},
};

/// Production API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api-business.apple.com/";

const V1: &str = "v1";
const APPLE_CARE_COVERAGE_TYPE: &str = "appleCareCoverage";

/// Apple Business Manager API client.
///
/// Cheap to clone; clones share the transport and therefore the token cache.
#[derive(Clone)]
pub struct Client {
	base_url: Url,
	transport: Arc<dyn ApiTransport>,
}
impl Client {
	/// Creates a client for the production API.
	pub fn new(http_client: ReqwestHttpClient, token_source: Arc<dyn TokenSource>) -> Result<Self> {
		Self::with_base_url(http_client, token_source, DEFAULT_API_BASE_URL)
	}

	/// Creates a client rooted at `base_url`; an empty string selects [`DEFAULT_API_BASE_URL`].
	pub fn with_base_url(
		http_client: ReqwestHttpClient,
		token_source: Arc<dyn TokenSource>,
		base_url: &str,
	) -> Result<Self> {
		Self::with_transport(Arc::new(BearerTransport::new(http_client, token_source)), base_url)
	}

	/// Creates a client on a caller-supplied transport, which must handle authorization itself.
	pub fn with_transport(transport: Arc<dyn ApiTransport>, base_url: &str) -> Result<Self> {
		Ok(Self { base_url: parse_base_url(base_url)?, transport })
	}

	/// Resolved base URL, always ending in `/`.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Lists organization devices.
	pub async fn get_org_devices(
		&self,
		cancel: &CancellationToken,
		options: &ListOptions,
	) -> Result<OrgDevicesResponse> {
		let query =
			Query::default().fields(ORG_DEVICES_TYPE, &options.fields).limit(options.limit)?;
		let url = self.endpoint(&[V1, ORG_DEVICES_TYPE], &query)?;

		self.get(cancel, "get_org_devices", url).await
	}

	/// Fetches one organization device.
	pub async fn get_org_device(
		&self,
		cancel: &CancellationToken,
		org_device_id: &str,
		options: &FieldsOptions,
	) -> Result<OrgDeviceResponse> {
		let id = require_id("org device ID", org_device_id)?;
		let query = Query::default().fields(ORG_DEVICES_TYPE, &options.fields);
		let url = self.endpoint(&[V1, ORG_DEVICES_TYPE, id], &query)?;

		self.get(cancel, "get_org_device", url).await
	}

	/// Fetches AppleCare coverage for one organization device.
	pub async fn get_org_device_apple_care_coverage(
		&self,
		cancel: &CancellationToken,
		org_device_id: &str,
		options: &ListOptions,
	) -> Result<AppleCareCoverageResponse> {
		let id = require_id("org device ID", org_device_id)?;
		let query = Query::default()
			.fields(APPLE_CARE_COVERAGE_TYPE, &options.fields)
			.limit(options.limit)?;
		let url = self.endpoint(&[V1, ORG_DEVICES_TYPE, id, APPLE_CARE_COVERAGE_TYPE], &query)?;

		self.get(cancel, "get_org_device_apple_care_coverage", url).await
	}

	/// Lists device management services.
	pub async fn get_mdm_servers(
		&self,
		cancel: &CancellationToken,
		options: &ListOptions,
	) -> Result<MdmServersResponse> {
		let query =
			Query::default().fields(MDM_SERVERS_TYPE, &options.fields).limit(options.limit)?;
		let url = self.endpoint(&[V1, MDM_SERVERS_TYPE], &query)?;

		self.get(cancel, "get_mdm_servers", url).await
	}

	/// Lists the device linkages of one device management service.
	pub async fn get_mdm_server_device_linkages(
		&self,
		cancel: &CancellationToken,
		mdm_server_id: &str,
		limit: Option<u32>,
	) -> Result<MdmServerDevicesLinkagesResponse> {
		let id = require_id("MDM server ID", mdm_server_id)?;
		let query = Query::default().limit(limit)?;
		let url = self.endpoint(&[V1, MDM_SERVERS_TYPE, id, "relationships", "devices"], &query)?;

		self.get(cancel, "get_mdm_server_device_linkages", url).await
	}

	/// Fetches the linkage to the service a device is assigned to.
	pub async fn get_org_device_assigned_server_linkage(
		&self,
		cancel: &CancellationToken,
		org_device_id: &str,
	) -> Result<OrgDeviceAssignedServerLinkageResponse> {
		let id = require_id("org device ID", org_device_id)?;
		let url = self.endpoint(
			&[V1, ORG_DEVICES_TYPE, id, "relationships", "assignedServer"],
			&Query::default(),
		)?;

		self.get(cancel, "get_org_device_assigned_server_linkage", url).await
	}

	/// Fetches the service a device is assigned to.
	pub async fn get_org_device_assigned_server(
		&self,
		cancel: &CancellationToken,
		org_device_id: &str,
		options: &FieldsOptions,
	) -> Result<MdmServerResponse> {
		let id = require_id("org device ID", org_device_id)?;
		let query = Query::default().fields(MDM_SERVERS_TYPE, &options.fields);
		let url = self.endpoint(&[V1, ORG_DEVICES_TYPE, id, "assignedServer"], &query)?;

		self.get(cancel, "get_org_device_assigned_server", url).await
	}

	/// Creates an activity assigning or unassigning devices. Expects `201 Created`.
	pub async fn create_org_device_activity(
		&self,
		cancel: &CancellationToken,
		request: &OrgDeviceActivityCreateRequest,
	) -> Result<OrgDeviceActivityResponse> {
		let body =
			serde_json::to_vec(request).map_err(|source| ConfigError::EncodeBody { source })?;
		let url = self.endpoint(&[V1, ORG_DEVICE_ACTIVITIES_TYPE], &Query::default())?;

		self.send_json(
			cancel,
			"create_org_device_activity",
			Method::POST,
			url,
			Some(body),
			&[StatusCode::CREATED],
		)
		.await
	}

	/// Fetches one organization device activity.
	pub async fn get_org_device_activity(
		&self,
		cancel: &CancellationToken,
		activity_id: &str,
		options: &FieldsOptions,
	) -> Result<OrgDeviceActivityResponse> {
		let id = require_id("org device activity ID", activity_id)?;
		let query = Query::default().fields(ORG_DEVICE_ACTIVITIES_TYPE, &options.fields);
		let url = self.endpoint(&[V1, ORG_DEVICE_ACTIVITIES_TYPE, id], &query)?;

		self.get(cancel, "get_org_device_activity", url).await
	}

	/// Starts a paginator at `start` using this client's transport.
	pub fn paginate<T, D>(
		&self,
		cancel: CancellationToken,
		decoder: D,
		start: Url,
	) -> Paginator<T, D>
	where
		D: PageDecoder<T>,
	{
		Paginator::new(self.transport.clone(), decoder, cancel, start)
	}

	/// Walks `v1/orgDevices` page by page.
	pub fn org_devices_pages(
		&self,
		cancel: CancellationToken,
		options: &ListOptions,
	) -> Result<Paginator<OrgDevice, impl PageDecoder<OrgDevice> + use<>>> {
		let query =
			Query::default().fields(ORG_DEVICES_TYPE, &options.fields).limit(options.limit)?;
		let start = self.endpoint(&[V1, ORG_DEVICES_TYPE], &query)?;

		Ok(self.paginate(cancel, pagination::json_api_page::<OrgDevice>(ORG_DEVICES_TYPE), start))
	}

	/// Walks `v1/mdmServers` page by page.
	pub fn mdm_servers_pages(
		&self,
		cancel: CancellationToken,
		options: &ListOptions,
	) -> Result<Paginator<MdmServer, impl PageDecoder<MdmServer> + use<>>> {
		let query =
			Query::default().fields(MDM_SERVERS_TYPE, &options.fields).limit(options.limit)?;
		let start = self.endpoint(&[V1, MDM_SERVERS_TYPE], &query)?;

		Ok(self.paginate(cancel, pagination::json_api_page::<MdmServer>(MDM_SERVERS_TYPE), start))
	}

	/// Collects the part number of every organization device across all pages.
	///
	/// Devices without attributes contribute an empty string so positions line up with the
	/// device list.
	pub async fn fetch_org_device_part_numbers(
		&self,
		cancel: &CancellationToken,
	) -> Result<Vec<String>> {
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		#[derive(Deserialize)]
		struct PartNumberDevice {
			#[serde(default, deserialize_with = "nullable")]
			attributes: PartNumberAttributes,
		}
		#[derive(Default, Deserialize)]
		#[serde(rename_all = "camelCase")]
		struct PartNumberAttributes {
			#[serde(default, deserialize_with = "nullable")]
			part_number: String,
		}

		let decode = pagination::json_api_page::<PartNumberDevice>(ORG_DEVICES_TYPE);
		let decoder = move |payload: &[u8]| -> Result<Page<String>> {
			Ok(decode(payload)?.map(|device| device.attributes.part_number))
		};
		let start = self.endpoint(&[V1, ORG_DEVICES_TYPE], &Query::default())?;

		self.paginate(cancel.clone(), decoder, start).collect_all().await
	}

	fn endpoint(&self, segments: &[&str], query: &Query) -> Result<Url> {
		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::MissingBaseUrlHost { url: self.base_url.to_string() })?
			.pop_if_empty()
			.extend(segments);
		query.apply(&mut url);

		Ok(url)
	}

	async fn get<T>(&self, cancel: &CancellationToken, step: &'static str, url: Url) -> Result<T>
	where
		T: Default + DeserializeOwned,
	{
		self.send_json(cancel, step, Method::GET, url, None, &[StatusCode::OK]).await
	}

	async fn send_json<T>(
		&self,
		cancel: &CancellationToken,
		step: &'static str,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
		expected: &[StatusCode],
	) -> Result<T>
	where
		T: Default + DeserializeOwned,
	{
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		const KIND: OperationKind = OperationKind::Request;

		let span = OperationSpan::new(KIND, step);

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut request = Request::new(method, url);

				request.headers_mut().insert(ACCEPT, HeaderValue::from_static("application/json"));

				if let Some(body) = body {
					request
						.headers_mut()
						.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
					*request.body_mut() = Some(body.into());
				}

				let (status, payload) = tokio::select! {
					biased;
					_ = cancel.cancelled() => return Err(Error::Cancelled),
					result = pagination::read_response(self.transport.as_ref(), request) => result?,
				};

				obs::record_api_response(step, status.as_u16());

				if !expected.contains(&status) {
					return Err(ApiError::from_payload(
						status.as_u16(),
						status.canonical_reason(),
						&payload,
					)
					.into());
				}
				if payload.is_empty() {
					return Ok(T::default());
				}

				Ok(DecodeError::json::<T>(step, &payload)?)
			})
			.await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("base_url", &self.base_url.as_str()).finish()
	}
}

/// Parses and normalizes an API base URL.
///
/// An empty string selects [`DEFAULT_API_BASE_URL`]. The URL must be absolute with a host, and a
/// trailing `/` is appended to the path when missing so relative endpoints resolve beneath it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
	let raw = if raw.is_empty() { DEFAULT_API_BASE_URL } else { raw };
	let mut url = match Url::parse(raw) {
		Ok(url) => url,
		Err(url::ParseError::RelativeUrlWithoutBase) =>
			return Err(ConfigError::RelativeBaseUrl { url: raw.to_owned() }.into()),
		Err(url::ParseError::EmptyHost) =>
			return Err(ConfigError::MissingBaseUrlHost { url: raw.to_owned() }.into()),
		Err(source) =>
			return Err(ConfigError::InvalidBaseUrl { url: raw.to_owned(), source }.into()),
	};

	if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
		return Err(ConfigError::MissingBaseUrlHost { url: raw.to_owned() }.into());
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::source::StaticTokenSource;

	fn client(base_url: &str) -> Client {
		Client::with_base_url(
			ReqwestHttpClient::default(),
			Arc::new(StaticTokenSource::bearer("token")),
			base_url,
		)
		.expect("Client fixture should build.")
	}

	#[test]
	fn base_url_defaults_and_gains_trailing_slash() {
		assert_eq!(
			parse_base_url("").expect("Empty selects the default.").as_str(),
			DEFAULT_API_BASE_URL
		);
		assert_eq!(
			parse_base_url("https://proxy.test/abm").expect("Paths are kept.").as_str(),
			"https://proxy.test/abm/"
		);
	}

	#[test]
	fn base_url_must_be_absolute_with_host() {
		assert!(matches!(
			parse_base_url("/relative/path"),
			Err(Error::Config(ConfigError::RelativeBaseUrl { .. }))
		));
		assert!(matches!(
			parse_base_url("mailto:ops@example.com"),
			Err(Error::Config(ConfigError::MissingBaseUrlHost { .. }))
		));
		assert!(matches!(
			parse_base_url("http://[::1"),
			Err(Error::Config(ConfigError::InvalidBaseUrl { .. }))
		));
	}

	#[test]
	fn endpoints_resolve_beneath_the_base_path() {
		let client = client("https://proxy.test/abm");
		let query = Query::default().fields(ORG_DEVICES_TYPE, &["serialNumber".into()]);
		let url = client
			.endpoint(&[V1, ORG_DEVICES_TYPE, "A/B C"], &query)
			.expect("Endpoint should resolve.");

		assert_eq!(
			url.as_str(),
			"https://proxy.test/abm/v1/orgDevices/A%2FB%20C?fields%5BorgDevices%5D=serialNumber"
		);
	}

	#[tokio::test]
	async fn validation_happens_before_any_request() {
		let client = client("");
		let cancel = CancellationToken::new();
		let err = client
			.get_org_device(&cancel, "   ", &FieldsOptions::default())
			.await
			.expect_err("Blank IDs are rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingId { name: "org device ID" })));

		let err = client
			.get_org_devices(&cancel, &ListOptions::default().limit(1001))
			.await
			.expect_err("Oversized limits are rejected.");

		assert!(matches!(err, Error::Config(ConfigError::LimitOutOfRange { .. })));

		cancel.cancel();

		let err = client
			.fetch_org_device_part_numbers(&cancel)
			.await
			.expect_err("Cancelled tokens stop before any request.");

		assert!(err.is_cancelled());
	}
}
