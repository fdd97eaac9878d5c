//! Plumbing shared by the Google REST clients: an authenticated [`ApiClient`], a lazily
//! connected [`LazySession`], Google error payload decoding and `multipart/related` bodies.
mod client;
mod error;
pub mod multipart;
mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{ApiClient, deserialize_json};
pub use error::{Error, ErrorDetail, ErrorPayload, validate_response};
pub use gcp_auth_provider::{Credential, Scope};
pub use session::LazySession;

/// For requests without query parameters.
pub const NO_QUERY: &[(&str, &str)] = &[];

pub type Result<T> = core::result::Result<T, Error>;
