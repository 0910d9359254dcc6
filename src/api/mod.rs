//! Typed gateways to the Knowledge Hub API.
//!
//! Each gateway is a thin set of request functions over [`ApiClient`]. The
//! traits exist so view controllers can be driven by mocks in tests.

pub mod ai;
pub mod articles;
pub mod auth;

pub use ai::{AiApi, AiGateway};
pub use articles::{ArticleApi, ArticleGateway};
pub use auth::{AuthApi, AuthGateway};

use crate::client::ApiClient;

/// All three gateways over one shared client.
#[derive(Clone)]
pub struct Gateways {
    pub articles: ArticleGateway,
    pub auth: AuthGateway,
    pub ai: AiGateway,
}

impl Gateways {
    pub fn new(client: ApiClient) -> Self {
        Self {
            articles: ArticleGateway::new(client.clone()),
            auth: AuthGateway::new(client.clone()),
            ai: AiGateway::new(client),
        }
    }
}
