//! Calls one Apple Business Manager endpoint and prints the response as pretty JSON.
//!
//! ```sh
//! cargo run --example abm -- \
//! 	--client-id BUSINESSAPI.xxxx --key-id xxxx --private-key ./key.pem \
//! 	--endpoint get-org-devices --fields serialNumber,partNumber --limit 10
//! ```

// std
use std::{path::PathBuf, sync::Arc};
// crates.io
use clap::{Parser, ValueEnum};
use color_eyre::{
	Result,
	eyre::{self, WrapErr},
};
use serde::Serialize;
// self
use abm::{
	CancellationToken,
	auth::ClientAssertion,
	client::{Client, FieldsOptions, ListOptions},
	http::ReqwestHttpClient,
	model::{ActivityType, OrgDeviceActivityCreateRequest},
	source::{self, TokenSource},
};

#[derive(Debug, Parser)]
#[command(about = "Apple Business Manager API demo client.")]
struct Cli {
	/// ABM client ID.
	#[arg(long)]
	client_id: String,
	/// ABM key ID.
	#[arg(long)]
	key_id: String,
	/// Path to the PEM private key.
	#[arg(long)]
	private_key: PathBuf,
	/// Optional API base URL override.
	#[arg(long, default_value = "")]
	api_base_url: String,
	/// Endpoint to call.
	#[arg(long, value_enum, default_value_t = Endpoint::GetOrgDevices)]
	endpoint: Endpoint,
	/// Organization device ID.
	#[arg(long)]
	org_device_id: Option<String>,
	/// MDM server ID.
	#[arg(long)]
	mdm_server_id: Option<String>,
	/// Organization device activity ID.
	#[arg(long)]
	org_device_activity_id: Option<String>,
	/// Comma-separated sparse fieldset.
	#[arg(long, value_delimiter = ',')]
	fields: Vec<String>,
	/// Page size; 0 lets the API decide.
	#[arg(long, default_value_t = 0)]
	limit: u32,
	/// Activity type for `create-org-device-activity`.
	#[arg(long, value_enum, default_value_t = Activity::AssignDevices)]
	activity_type: Activity,
	/// Comma-separated org device IDs for `create-org-device-activity`.
	#[arg(long, value_delimiter = ',')]
	activity_device_ids: Vec<String>,
}
impl Cli {
	fn list_options(&self) -> ListOptions {
		ListOptions { fields: self.fields.clone(), limit: Some(self.limit) }
	}

	fn fields_options(&self) -> FieldsOptions {
		FieldsOptions { fields: self.fields.clone() }
	}

	fn require<'a>(&self, value: &'a Option<String>, flag: &str) -> Result<&'a str> {
		value
			.as_deref()
			.filter(|value| !value.trim().is_empty())
			.ok_or_else(|| eyre::eyre!("--{flag} is required for {:?}.", self.endpoint))
	}
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Endpoint {
	GetOrgDevices,
	GetOrgDevice,
	GetOrgDeviceApplecareCoverage,
	GetMdmServers,
	GetMdmServerDeviceLinkages,
	GetOrgDeviceAssignedServerLinkage,
	GetOrgDeviceAssignedServer,
	CreateOrgDeviceActivity,
	GetOrgDeviceActivity,
	FetchOrgDevicePartNumbers,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Activity {
	AssignDevices,
	UnassignDevices,
}
impl From<Activity> for ActivityType {
	fn from(value: Activity) -> Self {
		match value {
			Activity::AssignDevices => ActivityType::AssignDevices,
			Activity::UnassignDevices => ActivityType::UnassignDevices,
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let cli = Cli::parse();
	let cancel = CancellationToken::new();
	let assertion =
		ClientAssertion::from_key_file(&cancel, &cli.client_id, &cli.key_id, &cli.private_key)
			.wrap_err("Failed to sign the client assertion.")?;
	let http_client = ReqwestHttpClient::new()?;
	let token_source: Arc<dyn TokenSource> = Arc::new(source::new_token_source(
		http_client.clone(),
		cancel.clone(),
		&cli.client_id,
		assertion.expose(),
		"",
	)?);
	let client = Client::with_base_url(http_client, token_source, &cli.api_base_url)?;
	let output = run(&cli, &client, &cancel).await?;

	println!("{output}");

	Ok(())
}

async fn run(cli: &Cli, client: &Client, cancel: &CancellationToken) -> Result<String> {
	match cli.endpoint {
		Endpoint::GetOrgDevices =>
			pretty(&client.get_org_devices(cancel, &cli.list_options()).await?),
		Endpoint::GetOrgDevice => {
			let id = cli.require(&cli.org_device_id, "org-device-id")?;

			pretty(&client.get_org_device(cancel, id, &cli.fields_options()).await?)
		},
		Endpoint::GetOrgDeviceApplecareCoverage => {
			let id = cli.require(&cli.org_device_id, "org-device-id")?;

			let coverage =
				client.get_org_device_apple_care_coverage(cancel, id, &cli.list_options()).await?;

			pretty(&coverage)
		},
		Endpoint::GetMdmServers =>
			pretty(&client.get_mdm_servers(cancel, &cli.list_options()).await?),
		Endpoint::GetMdmServerDeviceLinkages => {
			let id = cli.require(&cli.mdm_server_id, "mdm-server-id")?;

			pretty(&client.get_mdm_server_device_linkages(cancel, id, Some(cli.limit)).await?)
		},
		Endpoint::GetOrgDeviceAssignedServerLinkage => {
			let id = cli.require(&cli.org_device_id, "org-device-id")?;

			pretty(&client.get_org_device_assigned_server_linkage(cancel, id).await?)
		},
		Endpoint::GetOrgDeviceAssignedServer => {
			let id = cli.require(&cli.org_device_id, "org-device-id")?;

			pretty(&client.get_org_device_assigned_server(cancel, id, &cli.fields_options()).await?)
		},
		Endpoint::CreateOrgDeviceActivity => {
			let mdm_server_id = cli.require(&cli.mdm_server_id, "mdm-server-id")?;
			let device_ids = cli
				.activity_device_ids
				.iter()
				.map(|id| id.trim())
				.filter(|id| !id.is_empty())
				.collect::<Vec<_>>();

			if device_ids.is_empty() {
				eyre::bail!("--activity-device-ids is required for {:?}.", cli.endpoint);
			}

			let request = OrgDeviceActivityCreateRequest::new(
				cli.activity_type.into(),
				mdm_server_id,
				device_ids,
			);

			pretty(&client.create_org_device_activity(cancel, &request).await?)
		},
		Endpoint::GetOrgDeviceActivity => {
			let id = cli.require(&cli.org_device_activity_id, "org-device-activity-id")?;

			pretty(&client.get_org_device_activity(cancel, id, &cli.fields_options()).await?)
		},
		Endpoint::FetchOrgDevicePartNumbers =>
			pretty(&client.fetch_org_device_part_numbers(cancel).await?),
	}
}

fn pretty(value: &impl Serialize) -> Result<String> {
	Ok(serde_json::to_string_pretty(value)?)
}
