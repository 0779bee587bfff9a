// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use httpmock::MockServer;
use serde::Deserialize;
// self
use catalog_auth::{
	auth::ClientCredentials,
	config::ClientConfig,
	http::{ReqwestHttpClient, TokenEndpoint, TokenFuture, TokenPayload},
	session::CatalogSession,
	url::Url,
};

pub const CLIENT_ID: &str = "catalog-client";
pub const CLIENT_SECRET: &str = "catalog-secret";
pub const BASIC_HEADER: &str = "Basic Y2F0YWxvZy1jbGllbnQ6Y2F0YWxvZy1zZWNyZXQ=";

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Album {
	pub id: u32,
	pub title: String,
}

pub fn config(token_endpoint: &str, catalog_base: &str) -> ClientConfig {
	ClientConfig::builder()
		.token_endpoint(Url::parse(token_endpoint).expect("Token endpoint should parse."))
		.catalog_base(Url::parse(catalog_base).expect("Catalog base should parse."))
		.credentials(ClientCredentials::new(CLIENT_ID, CLIENT_SECRET))
		.request_timeout(Duration::from_secs(5))
		.build()
		.expect("Test configuration should build.")
}

pub fn session(server: &MockServer) -> CatalogSession {
	CatalogSession::new(config(&server.url("/api/token"), &server.url("/v1")))
		.expect("Session should build from a loopback configuration.")
}

/// Token endpoint issuing `token-<n>` so successive exchanges are distinguishable.
#[derive(Debug, Default)]
pub struct SequentialEndpoint {
	calls: AtomicUsize,
}
impl SequentialEndpoint {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenEndpoint for SequentialEndpoint {
	fn exchange<'a>(&'a self, _encoded_credential: &'a str) -> TokenFuture<'a> {
		Box::pin(async move {
			let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

			Ok(TokenPayload::new(format!("token-{n}"), 3_600))
		})
	}
}

pub fn sequential_session(
	server: &MockServer,
	endpoint: Arc<SequentialEndpoint>,
) -> CatalogSession {
	let config = config(&server.url("/api/token"), &server.url("/v1"));
	let client = ReqwestHttpClient::from_config(&config).expect("HTTP client should build.");

	CatalogSession::with_token_endpoint(config, client, endpoint)
}
