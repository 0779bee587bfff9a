//! Shared fixtures for unit tests.

// std
use std::{
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration as StdDuration,
};
// self
use crate::{
	_prelude::*,
	auth::ClientCredentials,
	http::{TokenEndpoint, TokenFuture, TokenPayload},
	store::TokenStore,
};

/// Scripted [`TokenEndpoint`] that counts exchanges and replays queued outcomes.
///
/// Once the script runs dry every exchange succeeds with `token-<n>`, where `n` is the
/// 1-based exchange count.
#[derive(Default)]
pub(crate) struct CountingEndpoint {
	calls: AtomicUsize,
	delay: Option<StdDuration>,
	script: Mutex<Vec<Result<TokenPayload>>>,
}
impl CountingEndpoint {
	pub(crate) fn with_delay(mut self, delay: StdDuration) -> Self {
		self.delay = Some(delay);

		self
	}

	/// Queues outcomes returned by the next exchanges, in order.
	pub(crate) fn with_script(
		self,
		outcomes: impl IntoIterator<Item = Result<TokenPayload>>,
	) -> Self {
		{
			let mut script = self.script.lock();

			script.extend(outcomes);
			script.reverse();
		}

		self
	}

	pub(crate) fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenEndpoint for CountingEndpoint {
	fn exchange<'a>(&'a self, encoded_credential: &'a str) -> TokenFuture<'a> {
		Box::pin(async move {
			assert!(!encoded_credential.is_empty(), "Encoded credential must be supplied.");

			let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}

			let scripted = self.script.lock().pop();

			match scripted {
				Some(outcome) => outcome,
				None => Ok(TokenPayload::new(format!("token-{n}"), 3_600)),
			}
		})
	}
}

pub(crate) fn store_with(endpoint: Arc<CountingEndpoint>) -> TokenStore {
	TokenStore::new(endpoint, ClientCredentials::new("client", "secret"))
}
