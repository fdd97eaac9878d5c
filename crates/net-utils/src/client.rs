use gcp_auth_provider::{Auth, Credential, Scope};
use reqwest::{IntoUrl, Method, RequestBuilder, Response};

use crate::{Error, validate_response};

/// A [`reqwest::Client`] paired with the [`Auth`] that signs every request it sends.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    auth: Auth,
}

impl ApiClient {
    pub async fn connect(
        credential: &Credential,
        scopes: &[Scope],
        user_agent: &'static str,
    ) -> crate::Result<Self> {
        let auth = Auth::connect(credential, scopes).await?;

        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self::from_parts(client, auth))
    }

    pub fn from_parts(client: reqwest::Client, auth: Auth) -> Self {
        Self { client, auth }
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Starts a request with the `Authorization` header already set.
    pub async fn request<U>(&self, method: Method, url: U) -> crate::Result<RequestBuilder>
    where
        U: IntoUrl,
    {
        let header = self.auth.get_header().await?;

        Ok(self
            .client
            .request(method, url)
            .header(http::header::AUTHORIZATION, header))
    }

    /// Sends the request, mapping any non-2XX response to an [`Error`].
    pub async fn send(&self, builder: RequestBuilder) -> crate::Result<Response> {
        let resp = builder.send().await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            // the token was rejected even though we thought it was valid, make sure the
            // next request gets a fresh one.
            self.auth.revoke_token();
        }

        validate_response(resp).await
    }

    pub async fn get_json<T, U, Q>(&self, url: U, query: &Q) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
        U: IntoUrl,
        Q: serde::Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, url).await?.query(query);
        let resp = self.send(builder).await?;
        deserialize_json(resp).await
    }

    pub async fn post_json<T, U, B>(&self, url: U, body: &B) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
        U: IntoUrl,
        B: serde::Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, url).await?.json(body);
        let resp = self.send(builder).await?;
        deserialize_json(resp).await
    }

    pub async fn put_json<T, U, Q, B>(&self, url: U, query: &Q, body: &B) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
        U: IntoUrl,
        B: serde::Serialize + ?Sized,
        Q: serde::Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, url).await?.query(query).json(body);
        let resp = self.send(builder).await?;
        deserialize_json(resp).await
    }

    pub async fn delete<U: IntoUrl>(&self, url: U) -> crate::Result<()> {
        let builder = self.request(Method::DELETE, url).await?;
        self.send(builder).await?;
        Ok(())
    }
}

pub async fn deserialize_json<T>(response: Response) -> crate::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(Error::from)
}
