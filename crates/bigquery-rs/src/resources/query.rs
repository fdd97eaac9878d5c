use super::{ErrorProto, JobReference, TableSchema};

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub use_legacy_sql: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Shared shape of the `jobs.query` and `jobs.getQueryResults` responses.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQueryResultsResponse {
    #[serde(default)]
    pub job_reference: Option<JobReference>,
    #[serde(default)]
    pub job_complete: bool,
    #[serde(default)]
    pub schema: Option<TableSchema>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub page_token: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct TableRow {
    #[serde(rename = "f")]
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct TableCell {
    #[serde(rename = "v", default)]
    pub value: serde_json::Value,
}
