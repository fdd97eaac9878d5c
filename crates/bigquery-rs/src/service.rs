use std::path::Path;

use net_utils::ApiClient;
use tabular::Frame;

use crate::job::{insert_job, upload_job, wait_for_job};
use crate::resources::{
    Dataset, DatasetList, InsertAllRequest, InsertAllResponse, InsertRow, Job, JobConfiguration,
    JobConfigurationLoad, JobConfigurationQuery, JobConfigurationTableCopy, Table, TableList,
    TableSchema, TimePartitioning,
};
use crate::{BigQueryClient, CsvSource, Error, Schema, TableId, WriteDisposition};

/// Warehouse operations, issued through a connected [`BigQueryClient`].
#[derive(Debug, Clone, Copy)]
pub struct BigQueryService<'a> {
    client: &'a BigQueryClient,
    api: &'a ApiClient,
}

impl<'a> BigQueryService<'a> {
    /// Connects the client's session if it isn't already.
    pub async fn new(client: &'a BigQueryClient) -> crate::Result<Self> {
        let api = client.session().await?;
        Ok(Self { client, api })
    }

    fn table_url(&self, id: &TableId) -> String {
        self.client.project_url(
            &id.project,
            &format!("datasets/{}/tables/{}", id.dataset, id.table),
        )
    }

    /// `project.dataset` ids of every dataset in the project.
    pub async fn list_datasets(&self, project: &str) -> crate::Result<Vec<String>> {
        let url = self.client.project_url(project, "datasets");

        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = Vec::with_capacity(1);
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: DatasetList = self.api.get_json(&url, &query).await?;
            ids.extend(page.datasets.into_iter().map(|ds| ds.id.replace(':', ".")));

            match page.next_page_token {
                Some(next_page_token) if !next_page_token.is_empty() => {
                    page_token = Some(next_page_token)
                }
                _ => break,
            }
        }

        Ok(ids)
    }

    /// `project.dataset.table` ids of every table in the dataset. Fails if the dataset doesn't
    /// exist.
    pub async fn list_tables(&self, project: &str, dataset: &str) -> crate::Result<Vec<String>> {
        self.get_dataset(project, dataset).await?;

        let url = self
            .client
            .project_url(project, &format!("datasets/{dataset}/tables"));

        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = Vec::with_capacity(1);
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: TableList = self.api.get_json(&url, &query).await?;
            ids.extend(page.tables.into_iter().map(|table| table.id.replace(':', ".")));

            match page.next_page_token {
                Some(next_page_token) if !next_page_token.is_empty() => {
                    page_token = Some(next_page_token)
                }
                _ => break,
            }
        }

        Ok(ids)
    }

    pub async fn get_dataset(&self, project: &str, dataset: &str) -> crate::Result<Dataset> {
        let url = self
            .client
            .project_url(project, &format!("datasets/{dataset}"));
        Ok(self.api.get_json(&url, net_utils::NO_QUERY).await?)
    }

    pub async fn get_table(&self, table_id: &str) -> crate::Result<Table> {
        let id = TableId::parse(table_id)?;
        self.get_table_by_id(&id).await
    }

    async fn get_table_by_id(&self, id: &TableId) -> crate::Result<Table> {
        Ok(self
            .api
            .get_json(&self.table_url(id), net_utils::NO_QUERY)
            .await?)
    }

    /// A not-found response is `false`, every other failure is returned.
    pub async fn table_exists(&self, table_id: &str) -> crate::Result<bool> {
        let id = TableId::parse(table_id)?;
        self.exists(&id).await
    }

    async fn exists(&self, id: &TableId) -> crate::Result<bool> {
        match self.get_table_by_id(id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn validate_table_exists(&self, table_id: &str) -> crate::Result<TableId> {
        let id = TableId::parse(table_id)?;
        if !self.exists(&id).await? {
            return Err(Error::TableNotFound(id));
        }
        Ok(id)
    }

    pub async fn validate_table_does_not_exist(&self, table_id: &str) -> crate::Result<TableId> {
        let id = TableId::parse(table_id)?;
        if self.exists(&id).await? {
            return Err(Error::TableAlreadyExists(id));
        }
        Ok(id)
    }

    /// Column name to type name, in column order.
    pub async fn table_schema(&self, table_id: &str) -> crate::Result<Schema> {
        let table = self.get_table(table_id).await?;
        Ok(table
            .schema
            .as_ref()
            .map(TableSchema::to_schema)
            .unwrap_or_default())
    }

    /// `(num_rows, num_columns)`
    pub async fn table_shape(&self, table_id: &str) -> crate::Result<(u64, usize)> {
        let id = self.validate_table_exists(table_id).await?;
        let table = self.get_table_by_id(&id).await?;
        Ok((table.num_rows.unwrap_or(0), table.num_columns()))
    }

    pub async fn create_empty_table(
        &self,
        table_id: &str,
        schema: &Schema,
        partitioning: Option<TimePartitioning>,
    ) -> crate::Result<Table> {
        let id = self.validate_table_does_not_exist(table_id).await?;

        let table = Table {
            id: None,
            table_reference: id.to_reference(),
            schema: Some(TableSchema::from_schema(schema)),
            time_partitioning: partitioning,
            num_rows: None,
            num_bytes: None,
            ty: None,
        };

        let url = self
            .client
            .project_url(&id.project, &format!("datasets/{}/tables", id.dataset));
        let created: Table = self.api.post_json(&url, &table).await?;

        tracing::info!(message = "created table", table_id = %id);
        Ok(created)
    }

    /// Runs `sql` with the new table as its destination.
    pub async fn create_table_from_query(&self, table_id: &str, sql: &str) -> crate::Result<()> {
        let id = self.validate_table_does_not_exist(table_id).await?;

        let job = Job::from(JobConfiguration {
            query: Some(JobConfigurationQuery {
                query: sql.to_owned(),
                destination_table: Some(id.to_reference()),
                use_legacy_sql: false,
            }),
            ..Default::default()
        });

        let job = insert_job(self.client, &job).await?;
        wait_for_job(self.client, job).await?;
        Ok(())
    }

    /// Loads a new table from CSV. With a schema the first row is skipped as a header, without
    /// one the schema is autodetected.
    pub async fn create_table_from_csv(
        &self,
        table_id: &str,
        source: &CsvSource,
        schema: Option<&Schema>,
        partitioning: Option<TimePartitioning>,
    ) -> crate::Result<Table> {
        let id = self.validate_table_does_not_exist(table_id).await?;

        let mut load = JobConfigurationLoad::csv(id.to_reference());
        match schema {
            Some(schema) => {
                load.schema = Some(TableSchema::from_schema(schema));
                load.skip_leading_rows = Some(1);
            }
            None => load.autodetect = true,
        }
        load.time_partitioning = partitioning;

        self.run_csv_load(load, source).await?;
        self.get_table_by_id(&id).await
    }

    /// Appends to or replaces an existing table's rows from CSV with a header row.
    pub async fn insert_from_csv(
        &self,
        table_id: &str,
        source: &CsvSource,
        write_disposition: WriteDisposition,
    ) -> crate::Result<Table> {
        let id = self.validate_table_exists(table_id).await?;

        let mut load = JobConfigurationLoad::csv(id.to_reference());
        load.skip_leading_rows = Some(1);
        load.write_disposition = Some(write_disposition);

        self.run_csv_load(load, source).await?;
        self.get_table_by_id(&id).await
    }

    async fn run_csv_load(
        &self,
        mut load: JobConfigurationLoad,
        source: &CsvSource,
    ) -> crate::Result<Job> {
        let job = match source {
            CsvSource::Uri(uri) => {
                load.source_uris = vec![uri.clone()];
                let job = Job::from(JobConfiguration {
                    load: Some(load),
                    ..Default::default()
                });
                insert_job(self.client, &job).await?
            }
            CsvSource::Local(path) => {
                let data = tokio::fs::read(path).await?;
                let job = Job::from(JobConfiguration {
                    load: Some(load),
                    ..Default::default()
                });
                upload_job(self.client, &job, &data).await?
            }
        };

        wait_for_job(self.client, job).await
    }

    /// Copies `source` into a new table `destination`.
    pub async fn duplicate_table(&self, source: &str, destination: &str) -> crate::Result<()> {
        let source = self.validate_table_exists(source).await?;
        let destination = self.validate_table_does_not_exist(destination).await?;

        let job = Job::from(JobConfiguration {
            copy: Some(JobConfigurationTableCopy {
                source_table: source.to_reference(),
                destination_table: destination.to_reference(),
            }),
            ..Default::default()
        });

        let job = insert_job(self.client, &job).await?;
        wait_for_job(self.client, job).await?;
        Ok(())
    }

    pub async fn delete_table(&self, table_id: &str) -> crate::Result<()> {
        let id = self.validate_table_exists(table_id).await?;
        self.api.delete(&self.table_url(&id)).await?;
        tracing::info!(message = "deleted table", table_id = %id);
        Ok(())
    }

    pub async fn query_frame(&self, sql: &str) -> crate::Result<Frame> {
        crate::query::query_frame(self.client, sql).await
    }

    pub async fn query_file_frame(&self, path: &Path) -> crate::Result<Frame> {
        let sql = tokio::fs::read_to_string(path).await?;
        self.query_frame(&sql).await
    }

    /// Every row of an existing table.
    pub async fn table_frame(&self, table_id: &str) -> crate::Result<Frame> {
        let id = self.validate_table_exists(table_id).await?;
        self.query_frame(&format!("SELECT * FROM `{id}`")).await
    }

    /// Streams rows into an existing table. Any rejected row fails the whole call.
    pub async fn insert_rows<R>(&self, table_id: &str, rows: &[R]) -> crate::Result<()>
    where
        R: serde::Serialize,
    {
        let id = self.validate_table_exists(table_id).await?;

        let request = InsertAllRequest {
            skip_invalid_rows: false,
            ignore_unknown_values: false,
            rows: rows
                .iter()
                .map(|json| InsertRow {
                    insert_id: uuid::Uuid::new_v4(),
                    json,
                })
                .collect(),
        };

        let url = format!("{}/insertAll", self.table_url(&id));
        let resp: InsertAllResponse = self.api.post_json(&url, &request).await?;

        if !resp.insert_errors.is_empty() {
            return Err(Error::InsertErrors(resp.insert_errors));
        }

        tracing::debug!(message = "inserted rows", table_id = %id, rows = rows.len());
        Ok(())
    }
}
