use gcp_auth_provider::{Credential, Scope};
use net_utils::{ApiClient, LazySession};

pub(crate) const SHEETS_ROOT: &str = "https://sheets.googleapis.com";

/// New spreadsheets are created through Drive so they can be placed in a folder.
pub(crate) const DRIVE_ROOT: &str = "https://www.googleapis.com";

const SCOPES: &[Scope] = &[Scope::Spreadsheets, Scope::Drive];

#[derive(Debug)]
pub struct SheetsClient {
    session: LazySession,
    sheets_root: Box<str>,
    drive_root: Box<str>,
}

impl SheetsClient {
    /// Names the user token file when no service account key is configured.
    pub const TOKEN_VAR: &'static str = "GG_SHEETS_TOKEN_PATH";

    pub fn new(credential: Credential) -> crate::Result<Self> {
        Ok(Self {
            session: LazySession::new(credential, SCOPES, "sheets-rs")?,
            sheets_root: Box::from(SHEETS_ROOT),
            drive_root: Box::from(DRIVE_ROOT),
        })
    }

    pub fn from_env() -> crate::Result<Self> {
        let credential = Credential::from_env(Self::TOKEN_VAR).map_err(net_utils::Error::from)?;
        Self::new(credential)
    }

    /// Sends both Sheets and Drive requests to `root` instead, i.e a mock server.
    pub fn with_endpoint(mut self, root: impl AsRef<str>) -> Self {
        let root = root.as_ref().trim_end_matches('/');
        self.sheets_root = Box::from(root);
        self.drive_root = Box::from(root);
        self
    }

    pub async fn session(&self) -> crate::Result<&ApiClient> {
        self.session.get().await.map_err(crate::Error::from)
    }

    /// `{root}/v4/spreadsheets/{id}{suffix}`
    pub(crate) fn spreadsheet_url(&self, id: &str, suffix: &str) -> String {
        format!("{}/v4/spreadsheets/{id}{suffix}", self.sheets_root)
    }

    pub(crate) fn drive_files_url(&self) -> String {
        format!("{}/drive/v3/files", self.drive_root)
    }
}
