//! Client credentials and their `Authorization: Basic` encoding.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Client id/secret pair presented to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
	client_id: String,
	client_secret: TokenSecret,
}
impl ClientCredentials {
	/// Creates a credential pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: TokenSecret::new(client_secret) }
	}

	/// Returns the public client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Returns the client secret.
	pub fn client_secret(&self) -> &TokenSecret {
		&self.client_secret
	}

	/// Encodes the pair into the opaque credential the token endpoint expects.
	pub fn encode(&self) -> String {
		encode_basic(&self.client_id, self.client_secret.expose())
	}

	/// Returns the full `Authorization` header value (`Basic <encoded>`).
	pub fn authorization_header(&self) -> String {
		format!("Basic {}", self.encode())
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.finish()
	}
}

/// Encodes `<client_id>:<client_secret>` with the standard padded base64 alphabet.
pub fn encode_basic(client_id: &str, client_secret: &str) -> String {
	STANDARD.encode(format!("{client_id}:{client_secret}"))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn encodes_rfc7617_example() {
		assert_eq!(encode_basic("Aladdin", "open sesame"), "QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
	}

	#[test]
	fn header_wraps_encoded_pair() {
		let credentials = ClientCredentials::new("id", "secret");

		assert_eq!(credentials.encode(), "aWQ6c2VjcmV0");
		assert_eq!(credentials.authorization_header(), "Basic aWQ6c2VjcmV0");
	}

	#[test]
	fn empty_secret_still_encodes_separator() {
		assert_eq!(encode_basic("id", ""), "aWQ6");
	}

	#[test]
	fn debug_redacts_secret() {
		let rendered = format!("{:?}", ClientCredentials::new("public-id", "hunter2"));

		assert!(rendered.contains("public-id"));
		assert!(!rendered.contains("hunter2"));
	}
}
