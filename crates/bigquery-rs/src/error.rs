use crate::TableId;
use crate::resources::{ErrorProto, InsertError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("table id '{0}' must have the syntax of {{project_id}}.{{dataset_name}}.{{table_name}}")]
    InvalidTableId(String),
    #[error("table with id {0} already exists")]
    TableAlreadyExists(TableId),
    #[error("table with id {0} does not exist")]
    TableNotFound(TableId),
    #[error("time partition type must be one of HOUR, DAY, MONTH, YEAR, got '{0}'")]
    InvalidPartitionType(String),
    #[error("write disposition must be either WRITE_APPEND or WRITE_TRUNCATE, got '{0}'")]
    InvalidWriteDisposition(String),
    #[error("job {job_id} failed: {error}")]
    Job { job_id: String, error: ErrorProto },
    #[error("{} row(s) failed to insert, first: {}", .0.len(), first_insert_error(.0))]
    InsertErrors(Vec<InsertError>),
    #[error(transparent)]
    Api(#[from] net_utils::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn first_insert_error(errors: &[InsertError]) -> String {
    errors
        .first()
        .and_then(|insert| insert.errors.first().map(|err| (insert.index, err)))
        .map(|(index, err)| format!("row {index}: {err}"))
        .unwrap_or_default()
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api(err) => err.is_not_found(),
            Self::TableNotFound(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(err.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Api(err.into())
    }
}
