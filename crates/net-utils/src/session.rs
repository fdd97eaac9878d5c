use gcp_auth_provider::{Credential, Scope};
use tokio::sync::OnceCell;

use crate::ApiClient;

/// Holds a validated [`Credential`] and connects on first use. Every later call reuses the same
/// [`ApiClient`], and with it the same cached token.
#[derive(Debug)]
pub struct LazySession {
    credential: Credential,
    scopes: &'static [Scope],
    user_agent: &'static str,
    cell: OnceCell<ApiClient>,
}

impl LazySession {
    /// Fails immediately if the credential file doesn't exist. No network traffic happens here.
    pub fn new(
        credential: Credential,
        scopes: &'static [Scope],
        user_agent: &'static str,
    ) -> crate::Result<Self> {
        credential.validate()?;

        Ok(Self {
            credential,
            scopes,
            user_agent,
            cell: OnceCell::new(),
        })
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn is_connected(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> crate::Result<&ApiClient> {
        self.cell
            .get_or_try_init(|| async {
                tracing::debug!(message = "connecting session", user_agent = self.user_agent);
                ApiClient::connect(&self.credential, self.scopes, self.user_agent).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_rejected_eagerly() {
        let cred = Credential::service_account("/definitely/not/here.json");
        let err = LazySession::new(cred, &[Scope::BigQuery], "test").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Auth(gcp_auth_provider::Error::MissingCredentialFile(_))
        ));
    }

    #[tokio::test]
    async fn test_connects_once() {
        let session = LazySession::new(
            crate::test_utils::emulator_credential(),
            &[Scope::Gmail],
            "test",
        )
        .unwrap();
        assert!(!session.is_connected());

        let first = session.get().await.unwrap() as *const ApiClient;
        let second = session.get().await.unwrap() as *const ApiClient;
        assert!(session.is_connected());
        assert_eq!(first, second);
    }
}
