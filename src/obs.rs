//! Optional observability helpers for token refreshes, authenticated operations, and cache
//! lookups.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `catalog_auth.op` with the `op` (operation
//!   kind), `stage` (call site), and `error_kind` (classified failure) fields, plus debug/warn
//!   events at refresh, retry, and extraction-failure points.
//! - Enable `metrics` to increment the `catalog_auth_op_total` counter for every
//!   attempt/success/failure/retry, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

pub(crate) use self::tracing::{debug_event, warn_event};

// self
use crate::_prelude::*;

/// Operation kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// `client_credentials` exchange against the token endpoint.
	TokenExchange,
	/// Catalog call wrapped by the authenticated-operation runner.
	Authenticated,
	/// Dominant-color lookup through the memoizing cache.
	ColorLookup,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenExchange => "token_exchange",
			OpKind::Authenticated => "authenticated",
			OpKind::ColorLookup => "color_lookup",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Second attempt after a forced token refresh.
	Retry,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
			OpOutcome::Retry => "retry",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
