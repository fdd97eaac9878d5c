use std::sync::Arc;

use gcp_auth::Token;

/// Hands out a fixed, never-expiring token. Used against emulators and local test servers.
#[derive(Debug, Clone)]
pub struct EmulatorProvider {
    token: Arc<Token>,
}

impl EmulatorProvider {
    pub(crate) const NAME: &'static str = "emulator";

    pub(crate) fn new(token: &str) -> crate::Result<Self> {
        let token = serde_json::from_value(serde_json::json!({
            "access_token": token,
            "expires_in": 100_000_000,
        }))?;

        Ok(Self {
            token: Arc::new(token),
        })
    }

    pub(crate) fn get_token(&self) -> Arc<Token> {
        Arc::clone(&self.token)
    }
}
