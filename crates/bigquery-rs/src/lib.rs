//! Warehouse wrapper over the BigQuery v2 REST API.
//!
//! [`BigQueryClient`] owns the credential and lazily connects, [`BigQueryService`] borrows a
//! connected client and exposes dataset/table/query/load operations that reshape results into
//! [`Frame`]s, schema maps and id strings.
mod client;
mod error;
mod job;
mod options;
mod query;
pub mod resources;
mod service;
mod table_id;
mod util;

pub use client::BigQueryClient;
pub use error::Error;
pub use options::{CsvSource, PartitionType, WriteDisposition};
pub use service::BigQueryService;
pub use table_id::TableId;
pub use tabular::Frame;

/// Column name to BigQuery type name, in column order.
pub type Schema = indexmap::IndexMap<String, String>;

/// Type alias to [`core::result::Result<T, Error>`].
pub type Result<T> = core::result::Result<T, Error>;
