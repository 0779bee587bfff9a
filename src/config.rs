//! Validated client configuration shared by the token store, catalog client, and color cache.

// std
use std::{net::IpAddr, time::Duration as StdDuration};
// self
use crate::{_prelude::*, auth::ClientCredentials};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors raised while constructing or validating configuration.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Catalog base URL is mandatory.
	#[error("Missing catalog base URL.")]
	MissingCatalogBase,
	/// Client credentials are mandatory.
	#[error("Missing client credentials.")]
	MissingCredentials,
	/// Client identifier must not be blank.
	#[error("Client identifier must not be empty.")]
	EmptyClientId,
	/// The color cache must hold at least one entry.
	#[error("Color cache capacity must be at least 1.")]
	ZeroCacheCapacity,
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A catalog path could not be joined onto the base URL.
	#[error("Catalog path `{path}` is invalid.")]
	InvalidPath {
		/// Path supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Immutable configuration consumed by [`crate::session::CatalogSession`] and friends.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// OAuth 2.0 token endpoint used for the `client_credentials` exchange.
	pub token_endpoint: Url,
	/// Base URL every catalog path is resolved against.
	pub catalog_base: Url,
	/// Client id/secret pair.
	pub credentials: ClientCredentials,
	/// Maximum number of memoized dominant colors.
	pub color_cache_capacity: usize,
	/// Per-request timeout applied by the HTTP client, if any.
	pub request_timeout: Option<StdDuration>,
}
impl ClientConfig {
	/// Default number of memoized dominant colors.
	pub const DEFAULT_COLOR_CACHE_CAPACITY: usize = 10;

	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Resolves a catalog path (e.g. `v1/albums/42`) against the catalog base.
	pub fn catalog_url(&self, path: &str) -> Result<Url, ConfigError> {
		let relative = path.trim_start_matches('/');

		self.catalog_base
			.join(relative)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.credentials.client_id().trim().is_empty() {
			return Err(ConfigError::EmptyClientId);
		}
		if self.color_cache_capacity == 0 {
			return Err(ConfigError::ZeroCacheCapacity);
		}

		validate_endpoint("token", &self.token_endpoint)?;
		validate_endpoint("catalog", &self.catalog_base)?;

		Ok(())
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	/// Token endpoint used for exchanges.
	pub token_endpoint: Option<Url>,
	/// Catalog base URL.
	pub catalog_base: Option<Url>,
	/// Client id/secret pair.
	pub credentials: Option<ClientCredentials>,
	/// Optional override for the color cache capacity.
	pub color_cache_capacity: Option<usize>,
	/// Optional per-request timeout.
	pub request_timeout: Option<StdDuration>,
}
impl ClientConfigBuilder {
	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the catalog base URL.
	pub fn catalog_base(mut self, url: Url) -> Self {
		self.catalog_base = Some(url);

		self
	}

	/// Sets the client credentials.
	pub fn credentials(mut self, credentials: ClientCredentials) -> Self {
		self.credentials = Some(credentials);

		self
	}

	/// Overrides the color cache capacity (defaults to 10).
	pub fn color_cache_capacity(mut self, capacity: usize) -> Self {
		self.color_cache_capacity = Some(capacity);

		self
	}

	/// Applies a per-request timeout to the HTTP client.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let token_endpoint = self.token_endpoint.ok_or(ConfigError::MissingTokenEndpoint)?;
		let mut catalog_base = self.catalog_base.ok_or(ConfigError::MissingCatalogBase)?;
		let credentials = self.credentials.ok_or(ConfigError::MissingCredentials)?;

		// `Url::join` drops the last segment unless the base ends with a slash.
		if !catalog_base.path().ends_with('/') {
			let path = format!("{}/", catalog_base.path());

			catalog_base.set_path(&path);
		}

		let config = ClientConfig {
			token_endpoint,
			catalog_base,
			credentials,
			color_cache_capacity: self
				.color_cache_capacity
				.unwrap_or(ClientConfig::DEFAULT_COLOR_CACHE_CAPACITY),
			request_timeout: self.request_timeout,
		};

		config.validate()?;

		Ok(config)
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() == "https" || (url.scheme() == "http" && is_loopback(url)) {
		Ok(())
	} else {
		Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(url::Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> ClientConfigBuilder {
		ClientConfig::builder()
			.token_endpoint(
				Url::parse("https://accounts.example.com/api/token")
					.expect("Token endpoint fixture should parse."),
			)
			.catalog_base(
				Url::parse("https://api.example.com/v1")
					.expect("Catalog base fixture should parse."),
			)
			.credentials(ClientCredentials::new("client", "secret"))
	}

	#[test]
	fn builds_with_defaults() {
		let config = builder().build().expect("Valid configuration should build.");

		assert_eq!(config.color_cache_capacity, ClientConfig::DEFAULT_COLOR_CACHE_CAPACITY);
		assert_eq!(config.catalog_base.as_str(), "https://api.example.com/v1/");
		assert!(config.request_timeout.is_none());
	}

	#[test]
	fn catalog_url_keeps_base_path() {
		let config = builder().build().expect("Valid configuration should build.");
		let url = config.catalog_url("/albums/42").expect("Catalog path should resolve.");

		assert_eq!(url.as_str(), "https://api.example.com/v1/albums/42");
	}

	#[test]
	fn rejects_plain_http_on_remote_hosts() {
		let err = builder()
			.token_endpoint(
				Url::parse("http://accounts.example.com/api/token")
					.expect("Insecure endpoint fixture should parse."),
			)
			.build()
			.expect_err("Plain HTTP token endpoint should be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "token", .. }));
	}

	#[test]
	fn allows_plain_http_on_loopback() {
		let config = builder()
			.token_endpoint(
				Url::parse("http://127.0.0.1:8080/token").expect("Loopback fixture should parse."),
			)
			.catalog_base(
				Url::parse("http://localhost:9090").expect("Loopback fixture should parse."),
			)
			.build();

		assert!(config.is_ok());
	}

	#[test]
	fn rejects_invalid_values() {
		assert!(matches!(
			builder().color_cache_capacity(0).build(),
			Err(ConfigError::ZeroCacheCapacity)
		));
		assert!(matches!(
			builder().credentials(ClientCredentials::new("  ", "secret")).build(),
			Err(ConfigError::EmptyClientId)
		));
		assert!(matches!(
			ClientConfig::builder().build(),
			Err(ConfigError::MissingTokenEndpoint)
		));
	}
}
