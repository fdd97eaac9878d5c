use std::path::Path;
use std::time::Duration;

use gcp_auth_provider::{Credential, Scope};
use net_utils::{ApiClient, LazySession};

/// The API root, without a trailing slash.
pub(crate) const DEFAULT_ROOT: &str = "https://bigquery.googleapis.com";

const SCOPES: &[Scope] = &[Scope::CloudPlatform, Scope::Drive];

const DEFAULT_POLL_FREQUENCY: Duration = Duration::from_secs(2);

/// Owns the credential and the lazily connected session. Jobs and queries are billed to
/// `billing_project`.
#[derive(Debug)]
pub struct BigQueryClient {
    billing_project: Box<str>,
    session: LazySession,
    root: Box<str>,
    poll_frequency: Duration,
}

impl BigQueryClient {
    pub fn new(billing_project: impl Into<Box<str>>, credential: Credential) -> crate::Result<Self> {
        let session = LazySession::new(credential, SCOPES, "bigquery-rs")?;

        Ok(Self {
            billing_project: billing_project.into(),
            session,
            root: Box::from(DEFAULT_ROOT),
            poll_frequency: DEFAULT_POLL_FREQUENCY,
        })
    }

    /// Uses the service account key if given, otherwise the user token file.
    pub fn from_paths(
        billing_project: impl Into<Box<str>>,
        service_account: Option<&Path>,
        authorized_user: Option<&Path>,
    ) -> crate::Result<Self> {
        let credential = Credential::from_paths(service_account, authorized_user)
            .map_err(net_utils::Error::from)?;
        Self::new(billing_project, credential)
    }

    /// Points the client at another API root, i.e an emulator.
    pub fn with_endpoint(mut self, root: impl AsRef<str>) -> Self {
        self.root = Box::from(root.as_ref().trim_end_matches('/'));
        self
    }

    /// How long to wait between checks on a running job.
    pub fn with_poll_frequency(mut self, frequency: Duration) -> Self {
        self.poll_frequency = frequency;
        self
    }

    pub fn billing_project(&self) -> &str {
        &self.billing_project
    }

    pub(crate) fn poll_frequency(&self) -> Duration {
        self.poll_frequency
    }

    pub async fn session(&self) -> crate::Result<&ApiClient> {
        self.session.get().await.map_err(crate::Error::from)
    }

    /// `{root}/bigquery/v2/projects/{project}/{path}`
    pub(crate) fn project_url(&self, project: &str, path: &str) -> String {
        if path.is_empty() {
            format!("{}/bigquery/v2/projects/{project}", self.root)
        } else {
            format!("{}/bigquery/v2/projects/{project}/{path}", self.root)
        }
    }

    pub(crate) fn upload_url(&self, project: &str) -> String {
        format!("{}/upload/bigquery/v2/projects/{project}/jobs", self.root)
    }
}
