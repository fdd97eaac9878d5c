//! Serde bindings for the subset of BigQuery resources this crate touches.
mod dataset;
mod job;
mod query;
mod table;

pub use dataset::{Dataset, DatasetList, DatasetListItem};
pub use job::{
    Job, JobConfiguration, JobConfigurationLoad, JobConfigurationQuery, JobConfigurationTableCopy,
    JobReference, JobState, JobStatus,
};
pub use query::{GetQueryResultsResponse, QueryRequest, TableCell, TableRow};
pub use table::{
    InsertAllRequest, InsertAllResponse, InsertError, InsertRow, Table, TableFieldSchema,
    TableList, TableListItem, TableSchema, TimePartitioning,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}: {reason}")]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ErrorProto {
    pub fn is_not_found(&self) -> bool {
        self.reason == "notFound"
    }
}
