//! View controllers.
//!
//! Each controller owns the state one screen would hold and reports outcomes
//! as [`Notice`]s. Gateway errors never escape a controller: they are logged
//! or turned into an error notice.

pub mod auth;
pub mod detail;
pub mod editor;
pub mod home;
pub mod my_articles;
pub mod navbar;

pub use auth::{AuthController, LoginForm, SignupForm};
pub use detail::ArticleDetailView;
pub use editor::{ArticleEditor, ArticleForm};
pub use home::HomeView;
pub use my_articles::MyArticlesView;
pub use navbar::{NavItem, Navbar};

use crate::guard::Route;
use std::fmt;

/// User-facing message produced by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn success(msg: impl Into<String>) -> Self {
        Notice::Success(msg.into())
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Notice::Warning(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Notice::Error(msg.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Warning(m) | Notice::Error(m) => m,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Notice::Success(_) => "✓",
            Notice::Warning(_) => "!",
            Notice::Error(_) => "✗",
        };
        write!(f, "{} {}", symbol, self.message())
    }
}

/// Result of a form submission: what to tell the user and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub notice: Notice,
    pub navigate: Option<Route>,
}

impl Outcome {
    pub fn stay(notice: Notice) -> Self {
        Self {
            notice,
            navigate: None,
        }
    }

    pub fn go(notice: Notice, route: Route) -> Self {
        Self {
            notice,
            navigate: Some(route),
        }
    }
}
