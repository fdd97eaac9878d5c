//! Transport-independant authentication via [`Auth`]
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use http::HeaderValue;

use crate::{Credential, Scope, Token, TokenProvider};

/// Token provider + a cached `Authorization` header. Cheap to clone, clones share the cache.
#[derive(Clone)]
pub struct Auth {
    provider: Arc<TokenProvider>,
    scopes: Arc<[Scope]>,
    cached: Arc<RwLock<Option<CachedHeader>>>,
    refresh_lock: Arc<tokio::sync::Mutex<()>>,
}

#[derive(Clone)]
struct CachedHeader {
    header: HeaderValue,
    token: Arc<Token>,
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("provider", &self.provider.name())
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

fn build_header(token: &Token) -> crate::Result<HeaderValue> {
    let mut header = HeaderValue::try_from(format!("Bearer {}", token.as_str()))?;
    header.set_sensitive(true);
    Ok(header)
}

impl Auth {
    /// Loads the credential and requests the first token, so bad key material or a revoked
    /// refresh token surfaces here rather than on the first API call.
    pub async fn connect(credential: &Credential, scopes: &[Scope]) -> crate::Result<Self> {
        credential.validate()?;

        let provider = TokenProvider::load(credential).await?;
        let auth = Self::from_provider(provider, scopes);
        auth.get_header().await?;

        tracing::info!(
            message = "authenticated",
            provider = auth.provider.name(),
            scopes = %Scope::join(scopes)
        );

        Ok(auth)
    }

    pub fn from_provider(provider: TokenProvider, scopes: &[Scope]) -> Self {
        Self {
            provider: Arc::new(provider),
            scopes: Arc::from(scopes),
            cached: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Returns the cached header if the token it was built from hasn't expired.
    pub fn get_cached_header(&self) -> Option<HeaderValue> {
        let guard = self.cached.read().unwrap_or_else(PoisonError::into_inner);

        match guard.as_ref() {
            Some(cached) if !cached.token.has_expired() => Some(cached.header.clone()),
            _ => None,
        }
    }

    pub async fn get_header(&self) -> crate::Result<HeaderValue> {
        if let Some(header) = self.get_cached_header() {
            return Ok(header);
        }

        // only one task refreshes at a time, the rest wait then pick up the new header.
        let _guard = self.refresh_lock.lock().await;

        if let Some(header) = self.get_cached_header() {
            return Ok(header);
        }

        let token = self.provider.get_token(&self.scopes).await?;
        let header = build_header(&token)?;
        tracing::debug!(message = "refreshed access token", provider = self.provider.name());

        let mut guard = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CachedHeader {
            header: header.clone(),
            token,
        });

        Ok(header)
    }

    /// Drops the cached token, forcing the next [`Auth::get_header`] call to refresh.
    pub fn revoke_token(&self) {
        let mut guard = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}
