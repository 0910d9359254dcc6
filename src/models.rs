//! Wire types shared with the Knowledge Hub API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Article categories known to both client and server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Tech,
    #[serde(rename = "AI")]
    Ai,
    Backend,
    Frontend,
    DevOps,
    Database,
    Mobile,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Tech,
        Category::Ai,
        Category::Backend,
        Category::Frontend,
        Category::DevOps,
        Category::Database,
        Category::Mobile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tech => "Tech",
            Category::Ai => "AI",
            Category::Backend => "Backend",
            Category::Frontend => "Frontend",
            Category::DevOps => "DevOps",
            Category::Database => "Database",
            Category::Mobile => "Mobile",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Matches the wire names exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                format!("Unknown category '{}'. Use one of: {}", s, names.join(", "))
            })
    }
}

/// Signed-in user as returned by signup/login.
///
/// The server owns this payload's shape, so it is kept as the JSON it sent
/// and stored back verbatim. The accessors read the fields the client shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(Value);

impl UserIdentity {
    pub fn new(id: i64, username: &str, email: &str) -> Self {
        UserIdentity(serde_json::json!({
            "id": id,
            "username": username,
            "email": email,
        }))
    }

    pub fn from_value(value: Value) -> Self {
        UserIdentity(value)
    }

    pub fn id(&self) -> Option<&Value> {
        self.get("id")
    }

    pub fn username(&self) -> Option<&str> {
        self.get("username").and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    /// Any field of the payload, when it is an object.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|m| m.get(name))
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of a successful signup or login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default = "no_user")]
    pub user: UserIdentity,
}

fn no_user() -> UserIdentity {
    UserIdentity(Value::Null)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub author_name: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

impl Article {
    /// True once the article has been edited after creation.
    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(crate::display::split_tags)
            .unwrap_or_default()
    }
}

/// Validated article body for create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: String,
    pub summary: String,
}

/// Writing aids offered by the AI endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiAction {
    Improve,
    Summarize,
    SuggestTags,
    SuggestTitle,
}

impl AiAction {
    pub const ALL: [AiAction; 4] = [
        AiAction::Improve,
        AiAction::Summarize,
        AiAction::SuggestTags,
        AiAction::SuggestTitle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiAction::Improve => "IMPROVE",
            AiAction::Summarize => "SUMMARIZE",
            AiAction::SuggestTags => "SUGGEST_TAGS",
            AiAction::SuggestTitle => "SUGGEST_TITLE",
        }
    }
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiAction {
    type Err = String;

    /// Accepts the wire name in any case, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        AiAction::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown AI action '{}'. Use: improve, summarize, suggest-tags, suggest-title",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AiRequest<'a> {
    pub content: &'a str,
    pub action: AiAction,
    pub title: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiResponse {
    pub result: String,
}

/// Article timestamps arrive either as RFC 3339 or as zone-less ISO-8601
/// (what a Java `LocalDateTime` serializes to). Both are held as naive UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(NAIVE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}
