//! Transport primitives for the token endpoint and the catalog.
//!
//! [`TokenEndpoint`] is the token store's only dependency on an HTTP stack: it exchanges the
//! encoded client credential for a raw [`TokenPayload`]. [`ReqwestTokenEndpoint`] is the
//! default implementation; tests and embedders can plug in any other transport.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Response,
	header::{ACCEPT, AUTHORIZATION},
	redirect::Policy,
};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, auth::BearerToken};
#[cfg(feature = "reqwest")]
use crate::{
	config::{ClientConfig, ConfigError},
	error::TransportError,
};

/// Boxed future returned by [`TokenEndpoint::exchange`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenPayload>> + 'a + Send>>;

/// Issues the `client_credentials` exchange against an OAuth 2.0 token endpoint.
///
/// Implementations must be `Send + Sync + 'static` so the token store can share them with the
/// in-flight refresh future that outlives any single caller.
pub trait TokenEndpoint
where
	Self: 'static + Send + Sync,
{
	/// Exchanges the base64-encoded `<id>:<secret>` credential for a new token payload.
	fn exchange<'a>(&'a self, encoded_credential: &'a str) -> TokenFuture<'a>;
}

/// Raw token payload returned by a successful exchange.
#[derive(Clone, Deserialize)]
pub struct TokenPayload {
	/// Opaque bearer token value.
	pub access_token: String,
	/// Validity duration in seconds.
	pub expires_in: i64,
	/// Token type advertised by the endpoint (usually `bearer`).
	#[serde(default)]
	pub token_type: Option<String>,
}
impl TokenPayload {
	/// Creates a payload; mostly useful for custom endpoints and tests.
	pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
		Self { access_token: access_token.into(), expires_in, token_type: Some("bearer".into()) }
	}

	/// Validates the payload and converts it into a [`BearerToken`] issued at `issued_at`.
	pub fn into_token(self, issued_at: OffsetDateTime) -> Result<BearerToken> {
		if self.access_token.is_empty() {
			return Err(Error::InvalidTokenPayload { reason: "access_token must not be empty" });
		}
		if self.expires_in <= 0 {
			return Err(Error::InvalidTokenPayload { reason: "expires_in must be positive" });
		}

		Ok(BearerToken::issued(self.access_token, issued_at, Duration::seconds(self.expires_in)))
	}
}
impl Debug for TokenPayload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPayload")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("token_type", &self.token_type)
			.finish()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Redirects are never followed: token endpoints answer directly, and a redirected catalog
/// request would leak the bearer header to another origin.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured timeout.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().redirect(Policy::none());

		if let Some(timeout) = config.request_timeout {
			builder = builder.timeout(timeout);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Reqwest-backed [`TokenEndpoint`] posting a form-encoded `client_credentials` grant.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTokenEndpoint {
	client: ReqwestHttpClient,
	url: Url,
}
#[cfg(feature = "reqwest")]
impl ReqwestTokenEndpoint {
	/// Creates an endpoint for `url` using the shared HTTP client.
	pub fn new(client: ReqwestHttpClient, url: Url) -> Self {
		Self { client, url }
	}

	/// Token endpoint URL.
	pub fn url(&self) -> &Url {
		&self.url
	}
}
#[cfg(feature = "reqwest")]
impl TokenEndpoint for ReqwestTokenEndpoint {
	fn exchange<'a>(&'a self, encoded_credential: &'a str) -> TokenFuture<'a> {
		Box::pin(async move {
			let response = self
				.client
				.post(self.url.clone())
				.header(AUTHORIZATION, format!("Basic {encoded_credential}"))
				.header(ACCEPT, "application/json")
				.form(&[("grant_type", "client_credentials")])
				.send()
				.await
				.map_err(TransportError::from)?;

			read_json(response).await
		})
	}
}

/// Reads a JSON response, mapping non-success statuses and malformed bodies into [`Error`].
#[cfg(feature = "reqwest")]
pub(crate) async fn read_json<T>(response: Response) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status().as_u16();
	let success = response.status().is_success();
	let body = response.bytes().await.map_err(TransportError::from)?;

	if !success {
		return Err(Error::status(status, String::from_utf8_lossy(&body)));
	}

	decode_json(&body, Some(status))
}

/// Decodes `body` into `T`, reporting the failing JSON path on error.
pub fn decode_json<T>(body: &[u8], status: Option<u16>) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| Error::Decode { source, status })
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn payload_decodes_and_converts() {
		let payload: TokenPayload = decode_json(
			br#"{"access_token":"abc","token_type":"bearer","expires_in":3600}"#,
			Some(200),
		)
		.expect("Token payload fixture should decode.");
		let issued = macros::datetime!(2025-06-01 12:00 UTC);
		let token = payload.into_token(issued).expect("Valid payload should convert.");

		assert_eq!(token.secret().expose(), "abc");
		assert_eq!(token.expires_at(), Some(macros::datetime!(2025-06-01 13:00 UTC)));
	}

	#[test]
	fn decode_reports_offending_path() {
		let body = br#"{"access_token":"abc","expires_in":"soon"}"#;
		let err = decode_json::<TokenPayload>(body, None)
			.expect_err("String expires_in should fail to decode.");
		let Error::Decode { source, .. } = err else {
			panic!("Expected a decode error.");
		};

		assert_eq!(source.path().to_string(), "expires_in");
	}

	#[test]
	fn non_positive_validity_is_rejected() {
		let now = OffsetDateTime::now_utc();

		assert!(matches!(
			TokenPayload::new("abc", 0).into_token(now),
			Err(Error::InvalidTokenPayload { .. })
		));
		assert!(matches!(
			TokenPayload::new("", 60).into_token(now),
			Err(Error::InvalidTokenPayload { .. })
		));
	}

	#[test]
	fn payload_debug_redacts_token() {
		assert!(!format!("{:?}", TokenPayload::new("abc-secret", 60)).contains("abc-secret"));
	}
}
