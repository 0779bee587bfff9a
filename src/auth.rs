//! Credential material: the client id/secret pair, its transport encoding, and the bearer
//! tokens exchanged for it.

pub mod credential;
pub mod secret;
pub mod token;

pub use credential::*;
pub use secret::*;
pub use token::*;
