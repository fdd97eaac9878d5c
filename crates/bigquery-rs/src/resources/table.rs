use super::{ErrorProto, TableReference};
use crate::PartitionType;
use crate::util;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// `project:dataset.table`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub table_reference: TableReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_partitioning: Option<TimePartitioning>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64_str::optional"
    )]
    pub num_rows: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64_str::optional"
    )]
    pub num_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub ty: Option<String>,
}

impl Table {
    pub fn num_columns(&self) -> usize {
        self.schema.as_ref().map_or(0, |schema| schema.fields.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFieldSchema {
    pub name: String,
    /// The type name as BigQuery reports it, i.e `STRING`, `INTEGER`, `RECORD`.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<TableFieldSchema>,
}

impl TableSchema {
    pub fn from_schema(schema: &crate::Schema) -> Self {
        Self {
            fields: schema
                .iter()
                .map(|(name, ty)| TableFieldSchema {
                    name: name.clone(),
                    ty: ty.clone(),
                    mode: None,
                    fields: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn to_schema(&self) -> crate::Schema {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.ty.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePartitioning {
    #[serde(rename = "type")]
    pub ty: PartitionType,
    /// Partitions on ingestion time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl TimePartitioning {
    /// Partitions by ingestion time.
    pub fn new(ty: PartitionType) -> Self {
        Self { ty, field: None }
    }

    /// Partitions by the value of a `DATE`/`TIMESTAMP` column instead.
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList {
    #[serde(default)]
    pub tables: Vec<TableListItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListItem {
    pub id: String,
    pub table_reference: TableReference,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllRequest<'a, R> {
    #[serde(skip_serializing_if = "util::is_false")]
    pub skip_invalid_rows: bool,
    #[serde(skip_serializing_if = "util::is_false")]
    pub ignore_unknown_values: bool,
    pub rows: Vec<InsertRow<'a, R>>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRow<'a, R> {
    pub insert_id: uuid::Uuid,
    pub json: &'a R,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllResponse {
    #[serde(default)]
    pub insert_errors: Vec<InsertError>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct InsertError {
    pub index: u32,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}
