use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::resources::TableReference;

/// A fully qualified `{project}.{dataset}.{table}` id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableId {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableId {
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
            table: table.into(),
        }
    }

    /// Splits on `.`, requiring exactly three non-empty parts.
    pub fn parse(table_id: &str) -> crate::Result<Self> {
        let mut parts = table_id.split('.');

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(project), Some(dataset), Some(table), None)
                if !project.is_empty() && !dataset.is_empty() && !table.is_empty() =>
            {
                Ok(Self::new(project, dataset, table))
            }
            _ => Err(Error::InvalidTableId(table_id.to_owned())),
        }
    }

    pub fn parts(&self) -> (&str, &str, &str) {
        (&self.project, &self.dataset, &self.table)
    }

    pub(crate) fn to_reference(&self) -> TableReference {
        TableReference {
            project_id: self.project.clone(),
            dataset_id: self.dataset.clone(),
            table_id: self.table.clone(),
        }
    }
}

impl From<TableReference> for TableId {
    fn from(reference: TableReference) -> Self {
        Self {
            project: reference.project_id,
            dataset: reference.dataset_id,
            table: reference.table_id,
        }
    }
}

impl FromStr for TableId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}
