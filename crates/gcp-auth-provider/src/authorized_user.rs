use std::fmt;
use std::path::Path;
use std::sync::Arc;

use gcp_auth::Token;

use crate::{Error, Scope};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Credentials for an end user who already went through the OAuth consent flow. The persisted
/// token file must hold the client id/secret and a refresh token; access tokens are minted from
/// the refresh token on demand.
pub struct AuthorizedUser {
    client: reqwest::Client,
    client_id: Box<str>,
    client_secret: Box<str>,
    refresh_token: Box<str>,
    token_uri: Box<str>,
}

impl fmt::Debug for AuthorizedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUser")
            .field("client_id", &self.client_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, serde::Deserialize)]
struct AuthorizedUserFile {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(serde::Serialize)]
struct RefreshRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    refresh_token: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    scope: &'a str,
}

impl AuthorizedUser {
    pub(crate) const NAME: &'static str = "authorized user";

    pub async fn from_file(path: &Path) -> crate::Result<Self> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingCredentialFile(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };

        Self::from_json_bytes(&bytes)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> crate::Result<Self> {
        let AuthorizedUserFile {
            client_id,
            client_secret,
            refresh_token,
            token_uri,
        } = serde_json::from_slice(bytes)?;

        Ok(Self {
            client: reqwest::Client::new(),
            client_id: client_id.into_boxed_str(),
            client_secret: client_secret.into_boxed_str(),
            refresh_token: refresh_token.into_boxed_str(),
            token_uri: token_uri
                .unwrap_or_else(|| String::from(DEFAULT_TOKEN_URI))
                .into_boxed_str(),
        })
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    pub async fn get_token(&self, scopes: &[Scope]) -> crate::Result<Arc<Token>> {
        let scope = Scope::join(scopes);

        let request = RefreshRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "refresh_token",
            refresh_token: &self.refresh_token,
            scope: &scope,
        };

        let resp = self
            .client
            .post(&*self.token_uri)
            .form(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await?;
            return Err(Error::TokenEndpoint {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        let token: Token = serde_json::from_slice(&bytes)?;
        tracing::debug!(message = "refreshed authorized user token", client_id = %self.client_id);

        Ok(Arc::new(token))
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::routing::post;

    use super::*;

    const TOKEN_FILE: &str = r#"{
        "token": "ya29.stale",
        "refresh_token": "1//refresh",
        "token_uri": "https://oauth2.googleapis.com/token",
        "client_id": "client.apps.googleusercontent.com",
        "client_secret": "shh",
        "scopes": ["https://mail.google.com/"],
        "expiry": "2024-01-01T00:00:00Z"
    }"#;

    #[test]
    fn test_parse_token_file() {
        let user = AuthorizedUser::from_json_bytes(TOKEN_FILE.as_bytes()).unwrap();
        assert_eq!(&*user.client_id, "client.apps.googleusercontent.com");
        assert_eq!(&*user.refresh_token, "1//refresh");
        assert_eq!(user.token_uri(), "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn test_parse_defaults_token_uri() {
        let json = r#"{"client_id": "a", "client_secret": "b", "refresh_token": "c", "type": "authorized_user"}"#;
        let user = AuthorizedUser::from_json_bytes(json.as_bytes()).unwrap();
        assert_eq!(user.token_uri(), DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_parse_rejects_missing_refresh_token() {
        let json = r#"{"client_id": "a", "client_secret": "b"}"#;
        assert!(matches!(
            AuthorizedUser::from_json_bytes(json.as_bytes()),
            Err(Error::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        match AuthorizedUser::from_file(&path).await {
            Err(Error::MissingCredentialFile(missing)) => assert_eq!(missing, path),
            other => panic!("expected a missing file error, got {other:?}"),
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}/token")
    }

    #[tokio::test]
    async fn test_refresh_grant() {
        let router = Router::new().route(
            "/token",
            post(|body: String| async move {
                assert!(body.contains("grant_type=refresh_token"));
                assert!(body.contains("refresh_token=1%2F%2Frefresh"));
                axum::Json(serde_json::json!({
                    "access_token": "ya29.fresh",
                    "expires_in": 3599,
                    "token_type": "Bearer",
                }))
            }),
        );

        let mut user = AuthorizedUser::from_json_bytes(TOKEN_FILE.as_bytes()).unwrap();
        user.token_uri = serve(router).await.into_boxed_str();

        let token = user.get_token(&[Scope::Gmail]).await.unwrap();
        assert_eq!(token.as_str(), "ya29.fresh");
        assert!(!token.has_expired());
    }

    #[tokio::test]
    async fn test_refresh_grant_rejected() {
        let router = Router::new().route(
            "/token",
            post(|| async {
                (
                    axum::http::StatusCode::BAD_REQUEST,
                    r#"{"error": "invalid_grant"}"#,
                )
            }),
        );

        let mut user = AuthorizedUser::from_json_bytes(TOKEN_FILE.as_bytes()).unwrap();
        user.token_uri = serve(router).await.into_boxed_str();

        match user.get_token(&[Scope::Drive]).await {
            Err(Error::TokenEndpoint { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.contains("invalid_grant"));
            }
            other => panic!("expected a token endpoint error, got {other:?}"),
        }
    }
}
