//! Closed failure taxonomy surfaced by every authenticated operation.

// self
use crate::_prelude::*;

/// Classified failure reported to callers.
///
/// Assigned once where the raw [`Error`] is first observed and never re-classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ThisError)]
pub enum ErrorKind {
	/// No response from the remote (connectivity, DNS, TLS, timeout).
	#[error("The network is unavailable.")]
	Network,
	/// The remote explicitly rejected the credential.
	#[error("The credential was rejected.")]
	Unauthorized,
	/// The remote reported that the requested resource does not exist.
	#[error("The requested resource was not found.")]
	NotFound,
	/// Anything else: other statuses, malformed responses, local misconfiguration.
	#[error("An unexpected failure occurred.")]
	Unknown {
		/// HTTP status code, when the remote answered at all.
		status: Option<u16>,
	},
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Network => "network",
			Self::Unauthorized => "unauthorized",
			Self::NotFound => "not_found",
			Self::Unknown { .. } => "unknown",
		}
	}
}

/// Maps a raw failure cause into its [`ErrorKind`].
pub fn classify(error: &Error) -> ErrorKind {
	match error {
		Error::Transport(_) => ErrorKind::Network,
		Error::Status { status, .. } => classify_status(*status),
		Error::Decode { status, .. } => ErrorKind::Unknown { status: *status },
		Error::Config(_) | Error::InvalidTokenPayload { .. } => ErrorKind::Unknown { status: None },
	}
}

fn classify_status(status: u16) -> ErrorKind {
	match status {
		401 => ErrorKind::Unauthorized,
		404 => ErrorKind::NotFound,
		code => ErrorKind::Unknown { status: Some(code) },
	}
}
