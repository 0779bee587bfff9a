//! Two-variant outcome returned by every authenticated operation.

// self
use crate::_prelude::*;

/// Either the fetched value or the classified reason it could not be fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchedResource<T, E = ErrorKind> {
	/// The operation produced a value.
	Success(T),
	/// The operation failed.
	Failure(E),
}
impl<T, E> FetchedResource<T, E> {
	/// Returns `true` for [`FetchedResource::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	/// Returns the value, discarding a failure.
	pub fn success(self) -> Option<T> {
		match self {
			Self::Success(value) => Some(value),
			Self::Failure(_) => None,
		}
	}

	/// Returns the failure reason, discarding a value.
	pub fn failure(self) -> Option<E> {
		match self {
			Self::Success(_) => None,
			Self::Failure(reason) => Some(reason),
		}
	}

	/// Maps the success value, leaving a failure untouched.
	pub fn map<U, F>(self, f: F) -> FetchedResource<U, E>
	where
		F: FnOnce(T) -> U,
	{
		match self {
			Self::Success(value) => FetchedResource::Success(f(value)),
			Self::Failure(reason) => FetchedResource::Failure(reason),
		}
	}

	/// Converts into a standard [`Result`].
	pub fn into_result(self) -> Result<T, E> {
		match self {
			Self::Success(value) => Ok(value),
			Self::Failure(reason) => Err(reason),
		}
	}
}
impl<T, E> From<Result<T, E>> for FetchedResource<T, E> {
	fn from(result: Result<T, E>) -> Self {
		match result {
			Ok(value) => Self::Success(value),
			Err(reason) => Self::Failure(reason),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn accessors_follow_variant() {
		let ok: FetchedResource<u8> = FetchedResource::Success(7);
		let failed: FetchedResource<u8> = FetchedResource::Failure(ErrorKind::NotFound);

		assert!(ok.is_success());
		assert!(!failed.is_success());
		assert_eq!(ok.clone().success(), Some(7));
		assert_eq!(ok.failure(), None);
		assert_eq!(failed.clone().failure(), Some(ErrorKind::NotFound));
		assert_eq!(failed.into_result(), Err(ErrorKind::NotFound));
	}

	#[test]
	fn map_and_from_result() {
		let mapped = FetchedResource::<u8>::from(Ok(2)).map(|value| value * 10);

		assert_eq!(mapped, FetchedResource::Success(20));
		assert_eq!(
			FetchedResource::<u8>::from(Err(ErrorKind::Network)).map(|value| value + 1),
			FetchedResource::Failure(ErrorKind::Network)
		);
	}
}
