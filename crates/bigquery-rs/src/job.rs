//! Submitting jobs and waiting on them.
use reqwest::Method;

use crate::resources::{Job, JobReference, JobState};
use crate::{BigQueryClient, Error};

pub(crate) async fn insert_job(client: &BigQueryClient, job: &Job) -> crate::Result<Job> {
    let api = client.session().await?;
    let url = client.project_url(client.billing_project(), "jobs");
    Ok(api.post_json(&url, job).await?)
}

/// Sends a load job and its data as a single `multipart/related` upload.
pub(crate) async fn upload_job(
    client: &BigQueryClient,
    job: &Job,
    data: &[u8],
) -> crate::Result<Job> {
    let api = client.session().await?;
    let url = client.upload_url(client.billing_project());

    let (content_type, body) = net_utils::multipart::MultipartRelated::new()
        .json_part(job)?
        .part("application/octet-stream", data)
        .finish();

    let builder = api
        .request(Method::POST, &url)
        .await?
        .query(&[("uploadType", "multipart")])
        .header(reqwest::header::CONTENT_TYPE, content_type)
        .body(body);

    let resp = api.send(builder).await?;
    Ok(net_utils::deserialize_json(resp).await?)
}

/// Polls until the job is `DONE`, then surfaces its `errorResult` if it has one.
pub(crate) async fn wait_for_job(client: &BigQueryClient, mut job: Job) -> crate::Result<Job> {
    let Some(job_ref) = job.job_reference.clone() else {
        // nothing to poll on, only happens if the API omits the reference.
        return check_status(job, None);
    };

    loop {
        if job
            .status
            .as_ref()
            .is_some_and(|status| status.state == JobState::Done)
        {
            break;
        }

        tokio::time::sleep(client.poll_frequency()).await;
        job = get_job(client, &job_ref).await?;

        tracing::debug!(
            message = "polled job",
            job_id = %job_ref.job_id,
            state = ?job.status.as_ref().map(|status| status.state)
        );
    }

    tracing::info!(message = "job done", job_id = %job_ref.job_id);
    check_status(job, Some(&job_ref))
}

async fn get_job(client: &BigQueryClient, job_ref: &JobReference) -> crate::Result<Job> {
    let api = client.session().await?;
    let url = client.project_url(&job_ref.project_id, &format!("jobs/{}", job_ref.job_id));

    let mut query = Vec::with_capacity(1);
    if let Some(location) = job_ref.location.as_deref() {
        query.push(("location", location));
    }

    Ok(api.get_json(&url, &query).await?)
}

fn check_status(job: Job, job_ref: Option<&JobReference>) -> crate::Result<Job> {
    match job.status.as_ref().and_then(|status| status.error_result.as_ref()) {
        Some(error) => Err(Error::Job {
            job_id: job_ref
                .map(|job_ref| job_ref.job_id.clone())
                .or_else(|| job.id.clone())
                .unwrap_or_default(),
            error: error.clone(),
        }),
        None => Ok(job),
    }
}
