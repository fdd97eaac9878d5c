use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::Error;

/// Where a client's key material lives. Owned by the client for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// A service account JSON key file.
    ServiceAccount { path: PathBuf },
    /// A persisted OAuth user token file (client id/secret + refresh token).
    AuthorizedUser { token_path: PathBuf },
    /// A fixed token, for emulators and local test servers.
    #[cfg(feature = "emulator")]
    Emulator { token: Box<str> },
}

impl Credential {
    /// Environment variable holding a service account key file path.
    pub const SERVICE_ACCOUNT_VAR: &'static str = "GOOGLE_APPLICATION_CREDENTIALS";

    pub fn service_account(path: impl Into<PathBuf>) -> Self {
        Self::ServiceAccount { path: path.into() }
    }

    pub fn authorized_user(token_path: impl Into<PathBuf>) -> Self {
        Self::AuthorizedUser {
            token_path: token_path.into(),
        }
    }

    #[cfg(feature = "emulator")]
    pub fn emulator(token: impl Into<Box<str>>) -> Self {
        Self::Emulator {
            token: token.into(),
        }
    }

    /// Picks the service account key when both are given, matching how the clients have always
    /// resolved credentials.
    pub fn from_paths(
        service_account: Option<&Path>,
        authorized_user: Option<&Path>,
    ) -> crate::Result<Self> {
        match (service_account, authorized_user) {
            (Some(path), _) => Ok(Self::service_account(path)),
            (None, Some(token_path)) => Ok(Self::authorized_user(token_path)),
            (None, None) => Err(Error::NoCredentials),
        }
    }

    /// Resolves [`Self::SERVICE_ACCOUNT_VAR`] first, then falls back to the user token file
    /// path held in `token_var` (e.g. `GMAIL_TOKEN_PATH`).
    pub fn from_env(token_var: &str) -> crate::Result<Self> {
        Self::from_lookup(token_var, |var| std::env::var_os(var))
    }

    fn from_lookup<F>(token_var: &str, mut lookup: F) -> crate::Result<Self>
    where
        F: FnMut(&str) -> Option<OsString>,
    {
        let non_empty = |value: OsString| (!value.is_empty()).then_some(value);

        if let Some(path) = lookup(Self::SERVICE_ACCOUNT_VAR).and_then(non_empty) {
            return Ok(Self::service_account(path));
        }

        match lookup(token_var).and_then(non_empty) {
            Some(path) => Ok(Self::authorized_user(path)),
            None => Err(Error::NoCredentials),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ServiceAccount { path } => Some(path),
            Self::AuthorizedUser { token_path } => Some(token_path),
            #[cfg(feature = "emulator")]
            Self::Emulator { .. } => None,
        }
    }

    /// Fails if the credential file is absent, so a misconfigured client is rejected when it's
    /// built rather than on its first request.
    pub fn validate(&self) -> crate::Result<()> {
        match self.path() {
            Some(path) if !path.is_file() => Err(Error::MissingCredentialFile(path.to_path_buf())),
            _ => Ok(()),
        }
    }
}
