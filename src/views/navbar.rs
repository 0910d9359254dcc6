use crate::guard::Route;
use crate::models::UserIdentity;
use crate::session::SessionManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Link { label: &'static str, route: Route },
    Greeting(String),
    Logout,
}

/// Top menu; contents depend on whether someone is signed in.
#[derive(Debug, Default)]
pub struct Navbar {
    pub user: Option<UserIdentity>,
}

impl Navbar {
    pub fn from_session(session: &SessionManager) -> Self {
        Self {
            user: session.current_user(),
        }
    }

    pub fn items(&self) -> Vec<NavItem> {
        let mut items = vec![NavItem::Link {
            label: "Home",
            route: Route::Home,
        }];

        match &self.user {
            Some(user) => {
                items.push(NavItem::Link {
                    label: "New Article",
                    route: Route::NewArticle,
                });
                items.push(NavItem::Link {
                    label: "My Articles",
                    route: Route::MyArticles,
                });
                items.push(NavItem::Greeting(format!(
                    "Hi, {}",
                    user.username().unwrap_or_default()
                )));
                items.push(NavItem::Logout);
            }
            None => {
                items.push(NavItem::Link {
                    label: "Login",
                    route: Route::Login,
                });
                items.push(NavItem::Link {
                    label: "Sign Up",
                    route: Route::Signup,
                });
            }
        }
        items
    }
}
