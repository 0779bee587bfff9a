//! Authenticated catalog access.
//!
//! Client-credentials bearer tokens with single-flight refresh, operations that retry once after
//! a credential rejection, and a bounded memoizing cache for derived values such as dominant
//! image colors.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
#[cfg(feature = "reqwest")] pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod resource;
pub mod runner;
#[cfg(feature = "reqwest")] pub mod session;
pub mod store;
#[cfg(test)] mod testutil;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, ErrorKind, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
