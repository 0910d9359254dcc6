use crate::api::{AiApi, ArticleApi, AuthApi};
use crate::error::ApiError;
use crate::models::{
    AiAction, Article, ArticleDraft, AuthResponse, Category, LoginRequest, SignupRequest,
    UserIdentity,
};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Unsigned token around an arbitrary payload.
pub fn token_with_payload(payload: &[u8]) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload);
    format!("{}.{}.signature", header, body)
}

pub fn make_token(claims: Value) -> String {
    token_with_payload(claims.to_string().as_bytes())
}

/// Token expiring an hour from now.
pub fn fresh_token() -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    make_token(serde_json::json!({"sub": "alice", "exp": exp}))
}

/// Token that expired an hour ago.
pub fn expired_token() -> String {
    let exp = chrono::Utc::now().timestamp() - 3600;
    make_token(serde_json::json!({"sub": "alice", "exp": exp}))
}

pub fn sample_user() -> UserIdentity {
    UserIdentity::new(1, "alice", "alice@example.com")
}

pub fn sample_article(id: i64, title: &str) -> Article {
    let created = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    Article {
        id,
        title: title.to_string(),
        content: format!("<p>{} body</p>", title),
        category: Category::Tech,
        tags: Some("rust, testing".to_string()),
        summary: None,
        author_name: "alice".to_string(),
        created_at: created,
        updated_at: created,
    }
}

fn status_error(status: StatusCode, message: Option<&str>) -> ApiError {
    ApiError::Status {
        status,
        message: message.map(str::to_string),
    }
}

#[derive(Default)]
struct ArticleCalls {
    searches: Vec<(Option<String>, Option<Category>)>,
    created: Vec<ArticleDraft>,
    updated: Vec<(i64, ArticleDraft)>,
    deleted: Vec<i64>,
}

#[derive(Clone)]
pub struct MockArticleApi {
    articles: Arc<Mutex<Vec<Article>>>,
    failure: Option<(StatusCode, Option<String>)>,
    calls: Arc<Mutex<ArticleCalls>>,
}

impl MockArticleApi {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: Arc::new(Mutex::new(articles)),
            failure: None,
            calls: Arc::new(Mutex::new(ArticleCalls::default())),
        }
    }

    /// Every call fails with `status`.
    pub fn failing(status: StatusCode) -> Self {
        Self::failing_with(status, None)
    }

    pub fn failing_with(status: StatusCode, message: Option<&str>) -> Self {
        Self {
            failure: Some((status, message.map(str::to_string))),
            ..Self::with_articles(Vec::new())
        }
    }

    pub fn searches(&self) -> Vec<(Option<String>, Option<Category>)> {
        self.calls.lock().expect("calls lock").searches.clone()
    }

    pub fn created(&self) -> Vec<ArticleDraft> {
        self.calls.lock().expect("calls lock").created.clone()
    }

    pub fn updated(&self) -> Vec<(i64, ArticleDraft)> {
        self.calls.lock().expect("calls lock").updated.clone()
    }

    pub fn deleted(&self) -> Vec<i64> {
        self.calls.lock().expect("calls lock").deleted.clone()
    }

    fn check(&self) -> Result<(), ApiError> {
        match &self.failure {
            Some((status, message)) => Err(status_error(*status, message.as_deref())),
            None => Ok(()),
        }
    }

    fn all(&self) -> Vec<Article> {
        self.articles.lock().expect("articles lock").clone()
    }

    fn from_draft(id: i64, draft: &ArticleDraft) -> Article {
        let mut article = sample_article(id, &draft.title);
        article.content = draft.content.clone();
        article.category = draft.category;
        article.tags = Some(draft.tags.clone());
        article.summary = Some(draft.summary.clone());
        article
    }
}

#[async_trait]
impl ArticleApi for MockArticleApi {
    async fn list_public(&self) -> Result<Vec<Article>, ApiError> {
        self.check()?;
        Ok(self.all())
    }

    async fn get_public(&self, id: i64) -> Result<Article, ApiError> {
        self.check()?;
        self.all()
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| status_error(StatusCode::NOT_FOUND, Some("Article not found")))
    }

    async fn search(
        &self,
        keyword: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Article>, ApiError> {
        self.calls
            .lock()
            .expect("calls lock")
            .searches
            .push((keyword.map(str::to_string), category));
        self.check()?;
        Ok(self.all())
    }

    async fn list_mine(&self) -> Result<Vec<Article>, ApiError> {
        self.check()?;
        Ok(self.all())
    }

    async fn create(&self, draft: &ArticleDraft) -> Result<Article, ApiError> {
        self.check()?;
        self.calls
            .lock()
            .expect("calls lock")
            .created
            .push(draft.clone());
        let id = self.all().len() as i64 + 100;
        Ok(Self::from_draft(id, draft))
    }

    async fn update(&self, id: i64, draft: &ArticleDraft) -> Result<Article, ApiError> {
        self.check()?;
        self.calls
            .lock()
            .expect("calls lock")
            .updated
            .push((id, draft.clone()));
        Ok(Self::from_draft(id, draft))
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.check()?;
        self.calls.lock().expect("calls lock").deleted.push(id);
        self.articles
            .lock()
            .expect("articles lock")
            .retain(|a| a.id != id);
        Ok(())
    }
}

#[derive(Clone)]
pub struct MockAiApi {
    result: Option<String>,
    calls: Arc<Mutex<Vec<(String, AiAction, Option<String>)>>>,
}

impl MockAiApi {
    pub fn new(result: &str) -> Self {
        Self {
            result: Some(result.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, AiAction, Option<String>)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl AiApi for MockAiApi {
    async fn assist(
        &self,
        content: &str,
        action: AiAction,
        title: Option<&str>,
    ) -> Result<String, ApiError> {
        self.calls.lock().expect("calls lock").push((
            content.to_string(),
            action,
            title.map(str::to_string),
        ));
        self.result
            .clone()
            .ok_or_else(|| status_error(StatusCode::BAD_GATEWAY, None))
    }
}

#[derive(Clone)]
pub struct MockAuthApi {
    response: Result<(String, UserIdentity), Option<String>>,
    calls: Arc<Mutex<usize>>,
}

impl MockAuthApi {
    pub fn succeeding(token: &str, user: UserIdentity) -> Self {
        Self {
            response: Ok((token.to_string(), user)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Every call fails with 401 and the given server message.
    pub fn rejecting(message: Option<&str>) -> Self {
        Self {
            response: Err(message.map(str::to_string)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().expect("calls lock")
    }

    fn respond(&self) -> Result<AuthResponse, ApiError> {
        *self.calls.lock().expect("calls lock") += 1;
        match &self.response {
            Ok((token, user)) => Ok(AuthResponse {
                token: token.clone(),
                user: user.clone(),
            }),
            Err(message) => Err(status_error(StatusCode::UNAUTHORIZED, message.as_deref())),
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn signup(&self, _request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.respond()
    }

    async fn login(&self, _request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.respond()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.respond().map(|_| ())
    }
}
