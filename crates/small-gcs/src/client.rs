use gcp_auth_provider::{Credential, Scope};
use net_utils::{ApiClient, LazySession};

pub(crate) const DEFAULT_ROOT: &str = "https://storage.googleapis.com";

const SCOPES: &[Scope] = &[Scope::DevStorageReadWrite];

/// A GCS client. Connects on first use, then every [`crate::GcsService`] built from it shares
/// the session.
#[derive(Debug)]
pub struct GcsClient {
    session: LazySession,
    root: Box<str>,
}

impl GcsClient {
    pub fn new(credential: Credential) -> crate::Result<Self> {
        Ok(Self {
            session: LazySession::new(credential, SCOPES, "small-gcs")?,
            root: Box::from(DEFAULT_ROOT),
        })
    }

    pub fn service_account(path: impl Into<std::path::PathBuf>) -> crate::Result<Self> {
        Self::new(Credential::service_account(path))
    }

    /// Points the client at another API root, i.e a storage emulator.
    pub fn with_endpoint(mut self, root: impl AsRef<str>) -> Self {
        self.root = Box::from(root.as_ref().trim_end_matches('/'));
        self
    }

    pub(crate) fn root(&self) -> &str {
        &self.root
    }

    pub async fn session(&self) -> crate::Result<&ApiClient> {
        self.session.get().await.map_err(crate::Error::from)
    }
}
