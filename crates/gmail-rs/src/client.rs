use gcp_auth_provider::{Credential, Scope};
use net_utils::{ApiClient, LazySession};

pub(crate) const DEFAULT_ROOT: &str = "https://gmail.googleapis.com";

const SCOPES: &[Scope] = &[Scope::Gmail];

#[derive(Debug)]
pub struct GmailClient {
    session: LazySession,
    root: Box<str>,
}

impl GmailClient {
    /// Names the user token file when no service account key is configured.
    pub const TOKEN_VAR: &'static str = "GMAIL_TOKEN_PATH";

    pub fn new(credential: Credential) -> crate::Result<Self> {
        Ok(Self {
            session: LazySession::new(credential, SCOPES, "gmail-rs")?,
            root: Box::from(DEFAULT_ROOT),
        })
    }

    /// Resolves the credential from `GOOGLE_APPLICATION_CREDENTIALS`, then [`Self::TOKEN_VAR`].
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

    /// `{root}/gmail/v1/users/me/{path}`
    pub(crate) fn user_url(&self, path: &str) -> String {
        format!("{}/gmail/v1/users/me/{path}", self.root)
    }
}
