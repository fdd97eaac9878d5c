//! Object-store wrapper over the GCS JSON API, scoped to one bucket per [`GcsService`].
//!
//! Keys are flat `/`-delimited strings; folders are either zero-byte keys ending in `/` or are
//! implied by deeper keys.
mod children;
mod client;
mod error;
mod object;
mod service;
mod url;

pub use children::{direct_child_files, direct_child_folders, normalize_prefix};
pub use client::GcsClient;
pub use error::Error;
pub use object::{Object, ObjectList};
pub use service::GcsService;

pub type Result<T> = core::result::Result<T, Error>;
