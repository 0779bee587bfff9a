//! Fetches one album through a `CatalogSession`: a single client-credentials exchange, then a
//! bearer-authenticated catalog call, both served by a local mock server.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::Value;
// self
use catalog_auth::{auth::ClientCredentials, config::ClientConfig, session::CatalogSession, url::Url};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/token").body("grant_type=client_credentials");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let album_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/albums/42").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":42,\"title\":\"Blue Train\",\"artist\":\"John Coltrane\"}");
		})
		.await;
	let config = ClientConfig::builder()
		.token_endpoint(Url::parse(&server.url("/api/token"))?)
		.catalog_base(Url::parse(&server.url("/v1"))?)
		.credentials(ClientCredentials::new("demo-client", "demo-secret"))
		.build()?;
	let session = CatalogSession::new(config)?;
	let album = session.fetch::<Value>("albums/42", &[("market", "US")]).await.into_result()?;

	println!("Fetched album: {album}.");

	token_mock.assert_async().await;
	album_mock.assert_async().await;

	Ok(())
}
