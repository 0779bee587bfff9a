//! Wiring for one configured catalog client.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	catalog::CatalogClient,
	color::{ColorCache, ColorExtractor},
	config::{ClientConfig, ConfigError},
	http::{ReqwestHttpClient, ReqwestTokenEndpoint, TokenEndpoint},
	resource::FetchedResource,
	runner::Runner,
	store::TokenStore,
};

/// Owns the token store, runner, and catalog client built from a [`ClientConfig`].
///
/// There is no process-wide state; clone the session (cheap, `Arc`-backed) wherever catalog
/// access is needed and every clone shares one token.
#[derive(Clone, Debug)]
pub struct CatalogSession {
	config: Arc<ClientConfig>,
	store: Arc<TokenStore>,
	runner: Runner,
	catalog: CatalogClient,
}
impl CatalogSession {
	/// Builds a session whose token exchanges go through reqwest.
	pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
		let client = ReqwestHttpClient::from_config(&config)?;
		let endpoint = ReqwestTokenEndpoint::new(client.clone(), config.token_endpoint.clone());

		Ok(Self::assemble(config, client, Arc::new(endpoint)))
	}

	/// Builds a session with a custom token transport; catalog calls still use `client`.
	pub fn with_token_endpoint(
		config: ClientConfig,
		client: ReqwestHttpClient,
		endpoint: Arc<dyn TokenEndpoint>,
	) -> Self {
		Self::assemble(config, client, endpoint)
	}

	fn assemble(
		config: ClientConfig,
		client: ReqwestHttpClient,
		endpoint: Arc<dyn TokenEndpoint>,
	) -> Self {
		let config = Arc::new(config);
		let store = Arc::new(TokenStore::new(endpoint, config.credentials.clone()));

		Self {
			runner: Runner::new(store.clone()),
			catalog: CatalogClient::new(client, config.clone()),
			store,
			config,
		}
	}

	/// Validated configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Shared token store.
	pub fn store(&self) -> &Arc<TokenStore> {
		&self.store
	}

	/// Authenticated-operation runner.
	pub fn runner(&self) -> &Runner {
		&self.runner
	}

	/// Raw catalog client, for callers managing tokens themselves.
	pub fn catalog(&self) -> &CatalogClient {
		&self.catalog
	}

	/// Fetches a catalog resource with token supply and retry-once-on-rejection.
	pub async fn fetch<T>(&self, path: &str, query: &[(&str, &str)]) -> FetchedResource<T>
	where
		T: DeserializeOwned,
	{
		let catalog = &self.catalog;

		self.runner
			.run_with_token(|token| async move { catalog.fetch(&token, path, query).await })
			.await
	}

	/// Creates a color cache sized by `color_cache_capacity`.
	pub fn color_cache(&self, extractor: Arc<dyn ColorExtractor>) -> ColorCache {
		ColorCache::new(extractor, self.config.color_cache_capacity)
	}
}
