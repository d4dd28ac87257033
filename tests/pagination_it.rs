// crates.io
use futures::StreamExt;
use httpmock::prelude::*;
// self
use abm::{_preludet::*, client::ListOptions, pagination::Page};

const TOKEN: &str = "page-token";

#[tokio::test]
async fn part_numbers_are_collected_across_pages() {
	let server = MockServer::start_async().await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/orgDevices").header("authorization", "Bearer page-token");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"data": [
						{"id": "S1", "type": "orgDevices", "attributes": {"partNumber": "MX2E2LL/A"}},
						{"id": "S2", "type": "orgDevices", "attributes": {"partNumber": "MQ6Q3LL/A"}}
					],
					"links": {"next": "/v1/orgDevicesNext?cursor=abc"}
				}"#,
			);
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/orgDevicesNext").query_param("cursor", "abc");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[{"id":"S3","type":"orgDevices","attributes":{"partNumber":"Z0YQ"}}],"links":{}}"#,
			);
		})
		.await;
	let client = build_test_client(&server.base_url(), TOKEN);
	let part_numbers = client
		.fetch_org_device_part_numbers(&CancellationToken::new())
		.await
		.expect("Both pages should be collected.");

	assert_eq!(part_numbers, vec!["MX2E2LL/A", "MQ6Q3LL/A", "Z0YQ"]);

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
}

#[tokio::test]
async fn part_numbers_tolerate_null_attributes() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/orgDevices");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"data": [
						{"id": "S1", "type": "orgDevices", "attributes": null},
						{"id": "S2", "type": "orgDevices", "attributes": {"partNumber": null}},
						{"id": "S3", "type": "orgDevices", "attributes": {"partNumber": "X"}}
					],
					"links": {"next": null}
				}"#,
			);
		})
		.await;
	let client = build_test_client(&server.base_url(), TOKEN);
	let part_numbers = client
		.fetch_org_device_part_numbers(&CancellationToken::new())
		.await
		.expect("Null attributes should not end the walk.");

	assert_eq!(part_numbers, vec!["", "", "X"]);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn stopping_after_the_first_page_skips_the_rest() {
	let server = MockServer::start_async().await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/mdmServers").query_param("limit", "1");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[{"id":"MDM1","type":"mdmServers","attributes":{"serverName":"Primary"}}],"links":{"next":"/v1/mdmServersNext"}}"#,
			);
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/mdmServersNext");
			then.status(200).body(r#"{"data":[]}"#);
		})
		.await;
	let client = build_test_client(&server.base_url(), TOKEN);
	let mut pages = client
		.mdm_servers_pages(CancellationToken::new(), &ListOptions::default().limit(1))
		.expect("Paginator should build.");
	let servers = pages
		.next_page()
		.await
		.expect("The first page is yielded.")
		.expect("The first page should decode.");

	assert_eq!(servers[0].id, "MDM1");

	drop(pages);

	first.assert_calls_async(1).await;
	second.assert_calls_async(0).await;
}

#[tokio::test]
async fn server_error_mid_sequence_ends_the_stream() {
	let server = MockServer::start_async().await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/orgDevices");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[{"id":"S1","type":"orgDevices"}],"links":{"next":"/v1/orgDevicesBroken"}}"#,
			);
		})
		.await;
	let broken = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/orgDevicesBroken");
			then.status(500).body(" upstream exploded ");
		})
		.await;
	let client = build_test_client(&server.base_url(), TOKEN);
	let pages: Vec<_> = client
		.org_devices_pages(CancellationToken::new(), &ListOptions::default())
		.expect("Paginator should build.")
		.into_stream()
		.collect()
		.await;

	assert_eq!(pages.len(), 2);
	assert_eq!(pages[0].as_ref().map(Vec::len).expect("First page should decode."), 1);

	match &pages[1] {
		Err(Error::Api(api)) => {
			assert_eq!(api.status, 500);
			assert_eq!(api.body, "upstream exploded");
		},
		other => panic!("Unexpected element: {other:?}."),
	}

	first.assert_calls_async(1).await;
	broken.assert_calls_async(1).await;
}

#[tokio::test]
async fn custom_decoders_drive_the_paginator() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/custom");
			then.status(200).body("a b c");
		})
		.await;
	let client = build_test_client(&server.base_url(), TOKEN);
	let decoder = |payload: &[u8]| -> Result<Page<String>> {
		Ok(Page::last(
			String::from_utf8_lossy(payload).split_whitespace().map(str::to_owned).collect(),
		))
	};
	let start = Url::parse(&server.url("/custom")).expect("Mock URL should parse.");
	let words = client
		.paginate(CancellationToken::new(), decoder, start)
		.collect_all()
		.await
		.expect("Custom decoder should succeed.");

	assert_eq!(words, vec!["a", "b", "c"]);

	mock.assert_async().await;
}
