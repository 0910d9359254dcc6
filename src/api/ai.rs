use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{AiAction, AiRequest, AiResponse};
use async_trait::async_trait;
use reqwest::Method;

/// Writing assistance. One remote call, no local logic; callers make sure
/// `content` is non-empty before asking.
#[async_trait]
pub trait AiApi: Send + Sync {
    async fn assist(
        &self,
        content: &str,
        action: AiAction,
        title: Option<&str>,
    ) -> Result<String, ApiError>;
}

#[derive(Clone)]
pub struct AiGateway {
    client: ApiClient,
}

impl AiGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AiApi for AiGateway {
    async fn assist(
        &self,
        content: &str,
        action: AiAction,
        title: Option<&str>,
    ) -> Result<String, ApiError> {
        let body = AiRequest {
            content,
            action,
            title: title.unwrap_or(""),
        };
        let req = self.client.request(Method::POST, "/api/ai/assist").json(&body);
        let resp: AiResponse = self.client.send_json(req).await?;
        Ok(resp.result)
    }
}
