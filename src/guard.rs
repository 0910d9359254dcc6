//! Route table and the authorization gate in front of protected views.

use crate::session::SessionManager;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    ArticleDetail(i64),
    Login,
    Signup,
    NewArticle,
    EditArticle(i64),
    MyArticles,
}

impl Route {
    /// Parse a client path. Unknown or relative paths yield None; the empty
    /// path is the root.
    pub fn parse(path: &str) -> Option<Route> {
        if path.is_empty() {
            return Some(Route::Home);
        }
        let trimmed = path.strip_prefix('/')?.trim_end_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["signup"] => Some(Route::Signup),
            ["my-articles"] => Some(Route::MyArticles),
            ["articles", "new"] => Some(Route::NewArticle),
            ["articles", "edit", id] => id.parse().ok().map(Route::EditArticle),
            ["articles", id] => id.parse().ok().map(Route::ArticleDetail),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::ArticleDetail(id) => format!("/articles/{}", id),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::NewArticle => "/articles/new".to_string(),
            Route::EditArticle(id) => format!("/articles/edit/{}", id),
            Route::MyArticles => "/my-articles".to_string(),
        }
    }

    /// Views that only make sense for a signed-in user.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::NewArticle | Route::EditArticle(_) | Route::MyArticles
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of asking to enter a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    /// `replace` means the redirect overwrites the current history entry,
    /// so going back never lands on the protected view.
    Redirect { to: Route, replace: bool },
}

pub struct RouteGuard {
    session: SessionManager,
}

impl RouteGuard {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    /// True while a valid session exists. Reading the session may clear an
    /// expired one.
    pub fn is_authorized(&self) -> bool {
        self.session.current_user().is_some()
    }

    pub fn check(&self, route: Route) -> Navigation {
        if !route.requires_auth() || self.is_authorized() {
            return Navigation::Render(route);
        }
        tracing::debug!("{} requires login, redirecting", route);
        Navigation::Redirect {
            to: Route::Login,
            replace: true,
        }
    }
}
