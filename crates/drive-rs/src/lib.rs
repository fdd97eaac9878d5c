//! Document-store wrapper over the Drive v3 REST API: uploading and downloading whole
//! directory trees, listing folders and looking objects up by id. Shared drives are included
//! in every call.
mod client;
mod error;
mod file;
mod local;
mod query;
mod service;

pub use client::DriveClient;
pub use error::Error;
pub use file::{FOLDER_MIME, File, FileList};
pub use local::with_copy_suffix;
pub use query::list_query;
pub use service::DriveService;

/// Type alias to [`core::result::Result<T, Error>`].
pub type Result<T> = core::result::Result<T, Error>;
