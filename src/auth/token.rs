//! Immutable bearer token values and their expiry arithmetic.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Short-lived bearer credential issued by the token endpoint.
///
/// Tokens are never mutated; every refresh produces a new value. Expiry is evaluated lazily
/// against the clock on each check and is inclusive of the boundary instant.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
	secret: TokenSecret,
	issued_at: OffsetDateTime,
	expires_in: Duration,
}
impl BearerToken {
	/// Creates a token issued now.
	pub fn new(value: impl Into<String>, expires_in: Duration) -> Self {
		Self::issued(value, OffsetDateTime::now_utc(), expires_in)
	}

	/// Creates a token with an explicit issue instant.
	pub fn issued(
		value: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		Self { secret: TokenSecret::new(value), issued_at, expires_in }
	}

	/// Token value; callers must avoid logging it.
	pub fn secret(&self) -> &TokenSecret {
		&self.secret
	}

	/// Instant the token was issued.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.issued_at
	}

	/// Validity duration granted by the token endpoint.
	pub fn expires_in(&self) -> Duration {
		self.expires_in
	}

	/// Expiry instant, or `None` when it lies beyond the representable range.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.issued_at.checked_add(self.expires_in)
	}

	/// Returns `true` if the token is expired at `instant` (boundary inclusive).
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		match self.expires_at() {
			Some(expires_at) => instant >= expires_at,
			None => false,
		}
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Returns the `Authorization` header value (`Bearer <token>`).
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_in", &self.expires_in)
			.finish()
	}
}
