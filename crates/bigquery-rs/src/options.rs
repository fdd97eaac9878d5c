use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::Error;

/// Time unit a table is partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartitionType {
    Hour,
    Day,
    Month,
    Year,
}

impl PartitionType {
    pub const ALL: [Self; 4] = [Self::Hour, Self::Day, Self::Month, Self::Year];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Month => "MONTH",
            Self::Year => "YEAR",
        }
    }
}

impl FromStr for PartitionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| Error::InvalidPartitionType(s.to_owned()))
    }
}

/// Whether a load appends to or replaces the existing rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WriteDisposition {
    #[default]
    WriteAppend,
    WriteTruncate,
}

impl WriteDisposition {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WriteAppend => "WRITE_APPEND",
            Self::WriteTruncate => "WRITE_TRUNCATE",
        }
    }
}

impl FromStr for WriteDisposition {
    type Err = Error;

    /// Accepts the API names and the short `APPEND`/`TRUNCATE` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WRITE_APPEND" | "APPEND" => Ok(Self::WriteAppend),
            "WRITE_TRUNCATE" | "TRUNCATE" => Ok(Self::WriteTruncate),
            _ => Err(Error::InvalidWriteDisposition(s.to_owned())),
        }
    }
}

/// Where a CSV load reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSource {
    /// A `gs://` object, loaded server side.
    Uri(String),
    /// A local file, uploaded with the load job.
    Local(PathBuf),
}

impl CsvSource {
    pub fn new(source: &str) -> Self {
        if source.starts_with("gs:") {
            Self::Uri(source.to_owned())
        } else {
            Self::Local(PathBuf::from(source))
        }
    }

    pub fn local(path: impl AsRef<Path>) -> Self {
        Self::Local(path.as_ref().to_path_buf())
    }
}

impl From<&str> for CsvSource {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}
