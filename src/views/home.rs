//! Public article listing with keyword/category search.

use crate::api::ArticleApi;
use crate::error::ApiError;
use crate::models::{Article, Category};

/// Identifies one fetch. Only the most recently issued ticket may update the
/// list; answers to superseded requests are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct HomeView {
    pub articles: Vec<Article>,
    pub loading: bool,
    pub keyword: String,
    pub category: Option<Category>,
    generation: u64,
}

impl HomeView {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Fetch every public article.
    pub async fn load<A: ArticleApi + ?Sized>(&mut self, api: &A) {
        let ticket = self.begin();
        let result = api.list_public().await;
        self.complete(ticket, result);
    }

    /// Fetch with the current keyword and category.
    pub async fn search<A: ArticleApi + ?Sized>(&mut self, api: &A) {
        let ticket = self.begin();
        let keyword = self.keyword.trim().to_string();
        let result = api.search(Some(keyword.as_str()), self.category).await;
        self.complete(ticket, result);
    }

    /// Clear the filters and show everything again.
    pub async fn reset<A: ArticleApi + ?Sized>(&mut self, api: &A) {
        self.keyword.clear();
        self.category = None;
        self.load(api).await;
    }

    /// Mark a new fetch as in flight.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        Ticket(self.generation)
    }

    /// Apply a fetch result. Returns false when the ticket was superseded and
    /// the result ignored.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Vec<Article>, ApiError>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                "dropping stale article list (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }

        match result {
            Ok(articles) => self.articles = articles,
            Err(e) => tracing::error!("Error fetching articles: {}", e),
        }
        self.loading = false;
        true
    }
}
