//! HTTP plumbing shared by every gateway.

use crate::error::ApiError;
use crate::session::SessionManager;
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

/// Thin wrapper over `reqwest::Client` that knows the API base URL and signs
/// requests with whatever token the session holds.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionManager) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request; the bearer header is attached when a token is stored.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        self.sign(self.http.request(method, url))
    }

    fn sign(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token.expose_secret()),
            None => req,
        }
    }

    /// Send and decode a JSON body into `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(req).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send and discard the body on success.
    pub async fn send_empty(&self, req: RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(req).await.map(|_| ())
    }

    async fn send_raw(&self, req: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!("request failed with {}: {}", status, body);
            return Err(ApiError::from_response(status, &body));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
