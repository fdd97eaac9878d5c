//! Spreadsheet wrapper over the Sheets v4 REST API: opening and creating spreadsheets, and
//! moving [`Frame`]s in and out of worksheet ranges addressed in `A1` notation.
mod cell;
mod client;
mod error;
mod range;
mod resources;
mod service;

pub use cell::{CellRef, column_index, column_letters};
pub use client::SheetsClient;
pub use error::Error;
pub use range::{ReadOptions, fill_columns, frame_from_values, frame_to_values};
pub use resources::{Spreadsheet, UpdateValuesResponse, Worksheet};
pub use service::SheetsService;
pub use tabular::Frame;

/// Type alias to [`core::result::Result<T, Error>`].
pub type Result<T> = core::result::Result<T, Error>;
