use gcp_auth_provider::{Credential, Scope};
use net_utils::{ApiClient, LazySession};

pub(crate) const DEFAULT_ROOT: &str = "https://www.googleapis.com";

const SCOPES: &[Scope] = &[Scope::Drive];

#[derive(Debug)]
pub struct DriveClient {
    session: LazySession,
    root: Box<str>,
}

impl DriveClient {
    /// Names the user token file when no service account key is configured.
    pub const TOKEN_VAR: &'static str = "GG_DRIVE_TOKEN_PATH";

    pub fn new(credential: Credential) -> crate::Result<Self> {
        Ok(Self {
            session: LazySession::new(credential, SCOPES, "drive-rs")?,
            root: Box::from(DEFAULT_ROOT),
        })
    }

    pub fn from_env() -> crate::Result<Self> {
        let credential = Credential::from_env(Self::TOKEN_VAR).map_err(net_utils::Error::from)?;
        Self::new(credential)
    }

    /// Points the client at another API root, i.e a mock server.
    pub fn with_endpoint(mut self, root: impl AsRef<str>) -> Self {
        self.root = Box::from(root.as_ref().trim_end_matches('/'));
        self
    }

    pub async fn session(&self) -> crate::Result<&ApiClient> {
        self.session.get().await.map_err(crate::Error::from)
    }

    pub(crate) fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.root)
    }

    pub(crate) fn file_url(&self, id: &str) -> String {
        format!("{}/drive/v3/files/{id}", self.root)
    }

    pub(crate) fn upload_url(&self) -> String {
        format!("{}/upload/drive/v3/files", self.root)
    }
}
