//! In-process fake of the Knowledge Hub API for integration tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: &'static str,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct FakeState {
    pub articles: Vec<Value>,
    pub seen: Vec<Seen>,
}

pub type Shared = Arc<Mutex<FakeState>>;

pub struct FakeServer {
    pub url: String,
    pub state: Shared,
}

impl FakeServer {
    pub fn seen(&self) -> Vec<Seen> {
        self.state.lock().unwrap().seen.clone()
    }

    pub fn last(&self) -> Seen {
        self.seen().last().cloned().expect("no request recorded")
    }

    pub fn article_ids(&self) -> Vec<i64> {
        self.state
            .lock()
            .unwrap()
            .articles
            .iter()
            .filter_map(|a| a["id"].as_i64())
            .collect()
    }
}

pub fn jwt(exp_offset_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "bob", "exp": exp}).to_string());
    format!("{}.{}.sig", header, payload)
}

pub fn article_json(id: i64, title: &str, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": format!("<p>{} content</p>", title),
        "category": category,
        "tags": "rust, web",
        "summary": null,
        "authorName": "bob",
        "createdAt": "2024-05-02T10:15:00",
        "updatedAt": "2024-05-02T10:15:00"
    })
}

pub async fn spawn(articles: Vec<Value>) -> FakeServer {
    let state: Shared = Arc::new(Mutex::new(FakeState {
        articles,
        seen: Vec::new(),
    }));

    let app = Router::new()
        .route("/api/articles/public", get(list_public))
        .route("/api/articles/public/search", get(search))
        .route("/api/articles/public/{id}", get(get_public))
        .route("/api/articles/my-articles", get(list_mine))
        .route("/api/articles", post(create))
        .route("/api/articles/{id}", put(update).delete(delete))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/api/ai/assist", post(assist))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeServer {
        url: format!("http://{}", addr),
        state,
    }
}

fn record(
    state: &Shared,
    method: &'static str,
    path: String,
    query: Option<String>,
    headers: &HeaderMap,
    body: Option<Value>,
) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().seen.push(Seen {
        method,
        path,
        query,
        authorization,
        body,
    });
}

fn message(status: StatusCode, msg: &str) -> axum::response::Response {
    (status, Json(json!({ "message": msg }))).into_response()
}

async fn list_public(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    record(&state, "GET", "/api/articles/public".into(), None, &headers, None);
    let articles = state.lock().unwrap().articles.clone();
    Json(Value::Array(articles))
}

async fn search(
    State(state): State<Shared>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> impl IntoResponse {
    record(
        &state,
        "GET",
        "/api/articles/public/search".into(),
        query.clone(),
        &headers,
        None,
    );
    let keyword = query
        .as_deref()
        .unwrap_or("")
        .split('&')
        .find_map(|pair| pair.strip_prefix("keyword="))
        .unwrap_or("")
        .to_lowercase();
    let hits: Vec<Value> = state
        .lock()
        .unwrap()
        .articles
        .iter()
        .filter(|a| {
            a["title"]
                .as_str()
                .map(|t| t.to_lowercase().contains(&keyword))
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    Json(Value::Array(hits))
}

async fn get_public(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> axum::response::Response {
    record(
        &state,
        "GET",
        format!("/api/articles/public/{}", id),
        None,
        &headers,
        None,
    );
    let found = state
        .lock()
        .unwrap()
        .articles
        .iter()
        .find(|a| a["id"].as_i64() == Some(id))
        .cloned();
    match found {
        Some(article) => Json(article).into_response(),
        None => message(StatusCode::NOT_FOUND, "Article not found"),
    }
}

async fn list_mine(State(state): State<Shared>, headers: HeaderMap) -> axum::response::Response {
    record(
        &state,
        "GET",
        "/api/articles/my-articles".into(),
        None,
        &headers,
        None,
    );
    if headers.get("authorization").is_none() {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let articles = state.lock().unwrap().articles.clone();
    Json(Value::Array(articles)).into_response()
}

/// A draft titled "Malformed" gets a 201 whose body is not an article.
async fn create(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    record(&state, "POST", "/api/articles".into(), None, &headers, Some(body.clone()));
    if body["title"] == "Malformed" {
        return (StatusCode::CREATED, Json(json!({ "foo": 1 }))).into_response();
    }
    let mut guard = state.lock().unwrap();
    let id = guard.articles.len() as i64 + 1;
    let mut article = article_json(id, body["title"].as_str().unwrap_or(""), "Tech");
    article["content"] = body["content"].clone();
    article["category"] = body["category"].clone();
    guard.articles.push(article.clone());
    (StatusCode::CREATED, Json(article)).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    record(
        &state,
        "PUT",
        format!("/api/articles/{}", id),
        None,
        &headers,
        Some(body.clone()),
    );
    let mut guard = state.lock().unwrap();
    match guard.articles.iter_mut().find(|a| a["id"].as_i64() == Some(id)) {
        Some(article) => {
            article["title"] = body["title"].clone();
            article["updatedAt"] = json!("2024-06-01T08:00:00");
            Json(article.clone()).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Article not found"),
    }
}

/// Article 999 belongs to someone else.
async fn delete(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> axum::response::Response {
    record(
        &state,
        "DELETE",
        format!("/api/articles/{}", id),
        None,
        &headers,
        None,
    );
    if id == 999 {
        return message(StatusCode::FORBIDDEN, "Not your article");
    }
    state
        .lock()
        .unwrap()
        .articles
        .retain(|a| a["id"].as_i64() != Some(id));
    StatusCode::NO_CONTENT.into_response()
}

fn auth_body(email: &str) -> Value {
    json!({
        "token": jwt(3600),
        "user": {"id": 7, "username": "bob", "email": email, "role": "writer"}
    })
}

async fn signup(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    record(&state, "POST", "/auth/signup".into(), None, &headers, Some(body.clone()));
    let email = body["email"].as_str().unwrap_or("");
    if email == "taken@example.com" {
        return message(StatusCode::BAD_REQUEST, "Email already registered");
    }
    Json(auth_body(email)).into_response()
}

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    record(&state, "POST", "/auth/login".into(), None, &headers, Some(body.clone()));
    if body["password"] == "wrong-password" {
        return message(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    Json(auth_body(body["email"].as_str().unwrap_or(""))).into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    record(&state, "POST", "/auth/logout".into(), None, &headers, None);
    StatusCode::OK
}

/// Echoes the action and title so tests can see what was sent.
async fn assist(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    record(&state, "POST", "/api/ai/assist".into(), None, &headers, Some(body.clone()));
    if body["content"].as_str().unwrap_or("").is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let result = format!(
        "{} for '{}'",
        body["action"].as_str().unwrap_or(""),
        body["title"].as_str().unwrap_or("")
    );
    Json(json!({ "result": result })).into_response()
}
