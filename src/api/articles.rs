use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Article, ArticleDraft, Category};
use async_trait::async_trait;
use reqwest::Method;

/// Article endpoints.
#[async_trait]
pub trait ArticleApi: Send + Sync {
    async fn list_public(&self) -> Result<Vec<Article>, ApiError>;
    async fn get_public(&self, id: i64) -> Result<Article, ApiError>;
    async fn search(
        &self,
        keyword: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Article>, ApiError>;
    async fn list_mine(&self) -> Result<Vec<Article>, ApiError>;
    async fn create(&self, draft: &ArticleDraft) -> Result<Article, ApiError>;
    async fn update(&self, id: i64, draft: &ArticleDraft) -> Result<Article, ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct ArticleGateway {
    client: ApiClient,
}

impl ArticleGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Query pairs for a search; blank keyword and absent category are left out
/// independently of each other.
pub fn search_params(
    keyword: Option<&str>,
    category: Option<Category>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(k) = keyword.filter(|k| !k.is_empty()) {
        params.push(("keyword", k.to_string()));
    }
    if let Some(c) = category {
        params.push(("category", c.as_str().to_string()));
    }
    params
}

#[async_trait]
impl ArticleApi for ArticleGateway {
    async fn list_public(&self) -> Result<Vec<Article>, ApiError> {
        let req = self.client.request(Method::GET, "/api/articles/public");
        self.client.send_json(req).await
    }

    async fn get_public(&self, id: i64) -> Result<Article, ApiError> {
        let req = self
            .client
            .request(Method::GET, &format!("/api/articles/public/{}", id));
        self.client.send_json(req).await
    }

    async fn search(
        &self,
        keyword: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Article>, ApiError> {
        let params = search_params(keyword, category);
        let mut req = self.client.request(Method::GET, "/api/articles/public/search");
        if !params.is_empty() {
            req = req.query(&params);
        }
        self.client.send_json(req).await
    }

    async fn list_mine(&self) -> Result<Vec<Article>, ApiError> {
        let req = self.client.request(Method::GET, "/api/articles/my-articles");
        self.client.send_json(req).await
    }

    async fn create(&self, draft: &ArticleDraft) -> Result<Article, ApiError> {
        let req = self.client.request(Method::POST, "/api/articles").json(draft);
        self.client.send_json(req).await
    }

    async fn update(&self, id: i64, draft: &ArticleDraft) -> Result<Article, ApiError> {
        let req = self
            .client
            .request(Method::PUT, &format!("/api/articles/{}", id))
            .json(draft);
        self.client.send_json(req).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let req = self
            .client
            .request(Method::DELETE, &format!("/api/articles/{}", id));
        self.client.send_empty(req).await
    }
}
