//! `catalog_auth.op` spans around token exchanges, authenticated catalog calls, and color lookups.
//!
//! Every span carries `op` ([`OpKind`] label) and `stage` (call site), plus an initially empty
//! `error_kind` field. The token store and the runner fill it in through
//! [`OpSpan::record_failure`] with the classified [`ErrorKind`] label when their operation fails.

// self
use crate::{_prelude::*, obs::OpKind};

/// Future returned by [`OpSpan::instrument`]: wrapped in the span with `tracing`, unchanged
/// without it.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OpSpan::instrument`]: wrapped in the span with `tracing`, unchanged
/// without it.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// Handle to one `catalog_auth.op` span; zero-sized when `tracing` is disabled.
///
/// The token store opens one per exchange (stage `refresh`), the runner one per
/// `run_with_token` call, and the color cache one per `dominant_color` lookup. A refresh span is
/// moved into the shared refresh future, so joined callers never open a second one.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Opens an `info` span for `kind` at `stage`.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"catalog_auth.op",
				op = kind.as_str(),
				stage,
				error_kind = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs `fut` inside the span; the span is entered on every poll, never across an `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Stores the classified failure label in the span's `error_kind` field.
	pub fn record_failure(&self, kind: ErrorKind) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("error_kind", kind.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = kind;
		}
	}
}

/// `debug` event inside the current span; expands to nothing without `tracing`.
macro_rules! debug_event {
	($($arg:tt)*) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::debug!($($arg)*);
		}
	};
}
pub(crate) use debug_event;

/// `warn` event inside the current span; expands to nothing without `tracing`.
macro_rules! warn_event {
	($($arg:tt)*) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::warn!($($arg)*);
		}
	};
}
pub(crate) use warn_event;
