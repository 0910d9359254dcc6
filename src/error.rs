use reqwest::StatusCode;
use serde::Deserialize;

/// Failure of a call to the Knowledge Hub API.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{}", status_text(.status, .message))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The bits of an error body the client cares about.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn status_text(status: &StatusCode, message: &Option<String>) -> String {
    match message {
        Some(m) => m.to_string(),
        None => format!("Request failed with status code {}", status.as_u16()),
    }
}

impl ApiError {
    /// Build from a non-2xx response body, picking out the server's `message`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        ApiError::Status { status, message }
    }

    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }

    /// Server message when there is one, otherwise the caller's wording.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Input rejected before any request is made.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),
}
