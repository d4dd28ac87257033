//! Typed Apple Business Manager API client: JWT client assertions exchanged for reusable OAuth 2.0
//! bearer tokens, plus cancellable cursor pagination over the JSON:API-shaped endpoints.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod model;
pub mod oauth;
pub mod obs;
pub mod pagination;
pub mod provider;
pub mod source;
pub mod transport;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::Client,
		http::ReqwestHttpClient,
		source::{StaticTokenSource, TokenSource},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Client`] rooted at `base_url` that authorizes every request with a fixed
	/// bearer token.
	pub fn build_test_client(base_url: &str, access_token: &str) -> Client {
		let source: Arc<dyn TokenSource> = Arc::new(StaticTokenSource::bearer(access_token));

		Client::with_base_url(test_reqwest_http_client(), source, base_url)
			.expect("Test client should build for the mock server base URL.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use {clap as _, color_eyre as _, httpmock as _};
