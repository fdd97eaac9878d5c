//! Running queries and reshaping the result pages into a [`Frame`].
use serde_json::Value;
use tabular::Frame;

use crate::BigQueryClient;
use crate::resources::{GetQueryResultsResponse, JobReference, QueryRequest, TableRow};

/// How long a single `getQueryResults` call waits server side for the job to finish.
const RESULTS_TIMEOUT_MS: &str = "10000";

pub(crate) async fn query_frame(client: &BigQueryClient, sql: &str) -> crate::Result<Frame> {
    let api = client.session().await?;
    let url = client.project_url(client.billing_project(), "queries");

    let request = QueryRequest {
        query: sql,
        use_legacy_sql: false,
        timeout_ms: None,
    };

    let mut resp: GetQueryResultsResponse = api.post_json(&url, &request).await?;

    let Some(job_ref) = resp.job_reference.take() else {
        return Ok(into_frame(resp, Vec::new()));
    };

    while !resp.job_complete {
        tokio::time::sleep(client.poll_frequency()).await;
        resp = get_query_results(client, &job_ref, None).await?;
    }

    let mut rows = Vec::new();
    let mut page_token = resp.page_token.take();

    loop {
        match page_token {
            Some(token) if !token.is_empty() => {
                let mut page = get_query_results(client, &job_ref, Some(&token)).await?;
                rows.extend(page.rows.drain(..).map(convert_row));
                page_token = page.page_token;
            }
            _ => break,
        }
    }

    let frame = into_frame(resp, rows);
    tracing::info!(
        message = "query complete",
        job_id = %job_ref.job_id,
        rows = frame.num_rows()
    );
    Ok(frame)
}

async fn get_query_results(
    client: &BigQueryClient,
    job_ref: &JobReference,
    page_token: Option<&str>,
) -> crate::Result<GetQueryResultsResponse> {
    let api = client.session().await?;
    let url = client.project_url(&job_ref.project_id, &format!("queries/{}", job_ref.job_id));

    let mut query = vec![("timeoutMs", RESULTS_TIMEOUT_MS)];
    if let Some(location) = job_ref.location.as_deref() {
        query.push(("location", location));
    }
    if let Some(page_token) = page_token {
        query.push(("pageToken", page_token));
    }

    Ok(api.get_json(&url, &query).await?)
}

/// Builds the frame from the first page (which carries the schema) plus any later pages.
fn into_frame(first: GetQueryResultsResponse, later: Vec<Vec<Option<String>>>) -> Frame {
    let columns = first
        .schema
        .map(|schema| schema.fields.into_iter().map(|field| field.name).collect())
        .unwrap_or_default();

    let mut rows = first
        .rows
        .into_iter()
        .map(convert_row)
        .collect::<Vec<_>>();
    rows.extend(later);

    Frame::from_ragged(columns, rows)
}

fn convert_row(row: TableRow) -> Vec<Option<String>> {
    row.cells
        .into_iter()
        .map(|cell| convert_value(cell.value))
        .collect()
}

/// `NULL` is absent, scalars keep their text form, records and arrays become JSON text.
fn convert_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
