//! Bearer-authenticated JSON reads against the catalog API.

// crates.io
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	config::ClientConfig,
	error::TransportError,
	http::{self, ReqwestHttpClient},
};

/// Issues `GET` requests for catalog paths, presenting the caller's bearer token.
#[derive(Clone, Debug)]
pub struct CatalogClient {
	client: ReqwestHttpClient,
	config: Arc<ClientConfig>,
}
impl CatalogClient {
	/// Creates a client resolving paths against `config.catalog_base`.
	pub fn new(client: ReqwestHttpClient, config: Arc<ClientConfig>) -> Self {
		Self { client, config }
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Fetches `path` with the given query pairs and decodes the JSON body into `T`.
	///
	/// Non-success statuses surface as [`Error::Status`]; a body that does not match `T`
	/// surfaces as [`Error::Decode`].
	pub async fn fetch<T>(
		&self,
		token: &BearerToken,
		path: &str,
		query: &[(&str, &str)],
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let url = self.config.catalog_url(path)?;
		let response = self
			.client
			.get(url)
			.header(AUTHORIZATION, token.authorization_header())
			.header(ACCEPT, "application/json")
			.query(query)
			.send()
			.await
			.map_err(TransportError::from)?;

		http::read_json(response).await
	}
}
