//! Token store with single-flight refresh.
//!
//! [`TokenStore`] owns the current [`BearerToken`] and is the only place that talks to the
//! [`TokenEndpoint`]. When the cached token is missing or expired, the first caller starts a
//! refresh and publishes it as a shared future; every caller that arrives while it is in flight
//! awaits that same future instead of issuing its own exchange. The refresh future installs the
//! new token and clears the in-flight slot under one lock, so later callers either see the new
//! token or start the next refresh, never a half-updated state.
//!
//! The store keeps only a weak handle to the in-flight refresh. A caller that stops awaiting drops
//! its own handle and the refresh carries on for the remaining waiters; once no waiter is left the
//! exchange is dropped and the next caller starts a fresh one. Tokens are stamped with the instant
//! the exchange started, so validity is never measured from a later point than the server's.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, ClientCredentials},
	error::classify,
	http::TokenEndpoint,
	obs::{self, OpKind, OpOutcome, OpSpan, debug_event, warn_event},
};

type RefreshOutput = Result<BearerToken, ErrorKind>;
type RefreshFuture = Shared<BoxFuture<'static, RefreshOutput>>;

#[derive(Default)]
struct StoreState {
	current: Option<BearerToken>,
	in_flight: Option<WeakShared<BoxFuture<'static, RefreshOutput>>>,
}
impl StoreState {
	fn live_flight(&self) -> Option<RefreshFuture> {
		self.in_flight.as_ref().and_then(WeakShared::upgrade)
	}
}

/// Owns the current bearer token and serializes refreshes into one exchange at a time.
pub struct TokenStore {
	endpoint: Arc<dyn TokenEndpoint>,
	credentials: ClientCredentials,
	state: Arc<Mutex<StoreState>>,
	metrics: Arc<StoreMetrics>,
}
impl TokenStore {
	/// Creates an empty store that exchanges `credentials` through `endpoint`.
	pub fn new(endpoint: Arc<dyn TokenEndpoint>, credentials: ClientCredentials) -> Self {
		Self {
			endpoint,
			credentials,
			state: Default::default(),
			metrics: Default::default(),
		}
	}

	/// Seeds the store with an existing token.
	pub fn with_token(self, token: BearerToken) -> Self {
		self.state.lock().current = Some(token);

		self
	}

	/// Returns a copy of the cached token, expired or not.
	pub fn current(&self) -> Option<BearerToken> {
		self.state.lock().current.clone()
	}

	/// Returns `true` while a refresh is in flight and someone is still awaiting it.
	pub fn is_refreshing(&self) -> bool {
		self.state.lock().live_flight().is_some()
	}

	/// Exchange counters for this store.
	pub fn metrics(&self) -> &StoreMetrics {
		&self.metrics
	}

	/// Returns the cached token when it is still valid, otherwise refreshes (or joins the
	/// refresh already in flight).
	pub async fn valid_token(&self) -> Result<BearerToken, ErrorKind> {
		let flight = {
			let mut state = self.state.lock();
			let now = OffsetDateTime::now_utc();

			if let Some(token) = state.current.as_ref().filter(|token| !token.is_expired_at(now)) {
				return Ok(token.clone());
			}

			self.join_or_start(&mut state)
		};

		flight.await
	}

	/// Fetches a new token regardless of the cached one, joining a refresh already in flight.
	///
	/// On failure the previously cached token stays in place.
	pub async fn force_refresh(&self) -> Result<BearerToken, ErrorKind> {
		let flight = {
			let mut state = self.state.lock();

			self.join_or_start(&mut state)
		};

		flight.await
	}

	fn join_or_start(&self, state: &mut StoreState) -> RefreshFuture {
		if let Some(flight) = state.live_flight() {
			self.metrics.record_joined();

			return flight;
		}

		let flight = self.refresh_future().shared();

		state.in_flight = flight.downgrade();

		flight
	}

	fn refresh_future(&self) -> BoxFuture<'static, RefreshOutput> {
		const KIND: OpKind = OpKind::TokenExchange;

		let endpoint = self.endpoint.clone();
		let encoded = self.credentials.encode();
		let state = self.state.clone();
		let metrics = self.metrics.clone();
		let span = OpSpan::new(KIND, "refresh");
		let failure_span = span.clone();

		span.instrument(async move {
			metrics.record_attempt();
			obs::record_outcome(KIND, OpOutcome::Attempt);
			debug_event!("Requesting a new bearer token.");

			let issued_at = OffsetDateTime::now_utc();
			let outcome =
				endpoint.exchange(&encoded).await.and_then(|payload| payload.into_token(issued_at));
			let mut state = state.lock();

			state.in_flight = None;

			match outcome {
				Ok(token) => {
					state.current = Some(token.clone());
					metrics.record_success();
					obs::record_outcome(KIND, OpOutcome::Success);
					debug_event!(
						expires_in = token.expires_in().whole_seconds(),
						"Bearer token refreshed."
					);

					Ok(token)
				},
				Err(err) => {
					let kind = classify(&err);

					metrics.record_failure();
					failure_span.record_failure(kind);
					obs::record_outcome(KIND, OpOutcome::Failure);
					warn_event!(error = %err, kind = kind.as_str(), "Token exchange failed.");

					Err(kind)
				},
			}
		})
		.boxed()
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("TokenStore")
			.field("credentials", &self.credentials)
			.field("current", &state.current)
			.field("refreshing", &state.live_flight().is_some())
			.finish()
	}
}

/// Thread-safe counters for token exchanges.
#[derive(Debug, Default)]
pub struct StoreMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	joined: AtomicU64,
}
impl StoreMetrics {
	/// Returns the number of token exchanges started.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of successful exchanges.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed exchanges.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns how many callers joined an exchange that was already in flight.
	pub fn joined(&self) -> u64 {
		self.joined.load(Ordering::Relaxed)
	}

	fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	fn record_joined(&self) {
		self.joined.fetch_add(1, Ordering::Relaxed);
	}
}
