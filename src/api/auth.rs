use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use async_trait::async_trait;
use reqwest::Method;

/// Account endpoints. Issuing tokens is the server's job; these calls only
/// hand back what it issued.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct AuthGateway {
    client: ApiClient,
}

impl AuthGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for AuthGateway {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        let req = self.client.request(Method::POST, "/auth/signup").json(request);
        self.client.send_json(req).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let req = self.client.request(Method::POST, "/auth/login").json(request);
        self.client.send_json(req).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let req = self.client.request(Method::POST, "/auth/logout");
        self.client.send_empty(req).await
    }
}
