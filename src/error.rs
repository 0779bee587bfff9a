//! Raw failure causes observed at the transport boundaries, plus the closed [`ErrorKind`]
//! taxonomy they are classified into.
//!
//! [`Error`] keeps everything a boundary saw (sources, status codes, body previews) so it can be
//! logged. Public authenticated operations never return it directly; the runner passes it
//! through [`classify`] exactly once and hands callers the resulting [`ErrorKind`].

mod kind;

pub use kind::*;

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Raw failure observed at a token-endpoint or catalog boundary.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] crate::config::ConfigError),
	/// No response was received (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Remote endpoint answered with a non-success status.
	#[error("Remote endpoint responded with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body, when one was readable.
		body_preview: Option<String>,
	},
	/// Response body did not match the expected JSON shape.
	#[error("Response body could not be decoded.")]
	Decode {
		/// Structured parsing failure including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response that failed to decode.
		status: Option<u16>,
	},
	/// Token endpoint returned a well-formed payload with unusable values.
	#[error("Token endpoint returned an unusable payload: {reason}.")]
	InvalidTokenPayload {
		/// Which invariant the payload violated.
		reason: &'static str,
	},
}
impl Error {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Builds a [`Error::Status`] from a status code and raw body text.
	pub fn status(status: u16, body: impl AsRef<str>) -> Self {
		let body = body.as_ref().trim();
		let body_preview = (!body.is_empty())
			.then(|| truncate_preview(body, Self::BODY_PREVIEW_LIMIT));

		Self::Status { status, body_preview }
	}

	/// Returns the HTTP status attached to the failure, if any.
	pub fn http_status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			Self::Decode { status, .. } => *status,
			_ => None,
		}
	}

	/// Returns `true` when the remote explicitly rejected the presented credential.
	///
	/// Only HTTP 401 qualifies; every other status is classified without retrying.
	pub fn is_authorization_rejection(&self) -> bool {
		matches!(self, Self::Status { status: 401, .. })
	}

	/// Classifies the failure into the domain taxonomy.
	pub fn kind(&self) -> ErrorKind {
		classify(self)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

fn truncate_preview(body: &str, limit: usize) -> String {
	if body.chars().count() <= limit {
		return body.to_owned();
	}

	let mut buf = body.chars().take(limit).collect::<String>();

	buf.push('…');

	buf
}
