//! Authenticated-operation runner: supplies a valid token, runs the operation, and retries
//! exactly once after a forced refresh when the remote rejects the credential.

// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	error::classify,
	obs::{self, OpKind, OpOutcome, OpSpan, debug_event},
	resource::FetchedResource,
	store::TokenStore,
};

/// Wraps operations that need a bearer token.
///
/// At most two operation invocations happen per call: the first with the store's valid token,
/// and, only if that attempt fails with an authorization rejection (HTTP 401), a second one with
/// a freshly forced token. Every other failure is classified immediately.
#[derive(Clone, Debug)]
pub struct Runner {
	store: Arc<TokenStore>,
}
impl Runner {
	/// Creates a runner backed by `store`.
	pub fn new(store: Arc<TokenStore>) -> Self {
		Self { store }
	}

	/// Token store supplying credentials.
	pub fn store(&self) -> &Arc<TokenStore> {
		&self.store
	}

	/// Runs `operation` with a valid token, retrying once after a forced refresh on rejection.
	pub async fn run_with_token<T, F, Fut>(&self, operation: F) -> FetchedResource<T>
	where
		F: Fn(BearerToken) -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		const KIND: OpKind = OpKind::Authenticated;

		let span = OpSpan::new(KIND, "run_with_token");

		obs::record_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(self.run_inner(operation)).await;

		match &result {
			FetchedResource::Success(_) => obs::record_outcome(KIND, OpOutcome::Success),
			FetchedResource::Failure(kind) => {
				span.record_failure(*kind);
				obs::record_outcome(KIND, OpOutcome::Failure);
			},
		}

		result
	}

	async fn run_inner<T, F, Fut>(&self, operation: F) -> FetchedResource<T>
	where
		F: Fn(BearerToken) -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		let token = match self.store.valid_token().await {
			Ok(token) => token,
			Err(kind) => return FetchedResource::Failure(kind),
		};

		match operation(token).await {
			Ok(value) => return FetchedResource::Success(value),
			Err(err) if err.is_authorization_rejection() => (),
			Err(err) => return FetchedResource::Failure(classify(&err)),
		}

		debug_event!("Credential rejected; forcing a token refresh.");
		obs::record_outcome(OpKind::Authenticated, OpOutcome::Retry);

		let token = match self.store.force_refresh().await {
			Ok(token) => token,
			Err(kind) => return FetchedResource::Failure(kind),
		};

		operation(token).await.map_err(|err| classify(&err)).into()
	}
}
