use std::fmt;
use std::path::Path;
use std::sync::Arc;

use gcp_auth::{CustomServiceAccount, Token, TokenProvider};

use crate::Scope;

/// Service account key file credentials, signed and exchanged by [`gcp_auth`].
pub struct ServiceAccount {
    inner: CustomServiceAccount,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount").finish_non_exhaustive()
    }
}

impl ServiceAccount {
    pub(crate) const NAME: &'static str = "service account";

    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let inner = CustomServiceAccount::from_file(path)?;
        tracing::debug!(message = "loaded service account key", path = %path.display());
        Ok(Self { inner })
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let inner = CustomServiceAccount::from_json(json)?;
        Ok(Self { inner })
    }

    pub async fn get_token(&self, scopes: &[Scope]) -> crate::Result<Arc<Token>> {
        let scope_urls = scopes
            .iter()
            .map(|scope| scope.scope_url())
            .collect::<Vec<_>>();

        self.inner
            .token(&scope_urls)
            .await
            .map_err(crate::Error::from)
    }
}
