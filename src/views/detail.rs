use crate::api::ArticleApi;
use crate::models::Article;

/// Single article page.
#[derive(Debug, Default)]
pub struct ArticleDetailView {
    pub article: Option<Article>,
    pub loading: bool,
}

impl ArticleDetailView {
    pub fn new() -> Self {
        Self {
            article: None,
            loading: true,
        }
    }

    pub async fn load<A: ArticleApi + ?Sized>(&mut self, api: &A, id: i64) {
        self.loading = true;
        match api.get_public(id).await {
            Ok(article) => self.article = Some(article),
            Err(e) => {
                tracing::error!("Error fetching article {}: {}", id, e);
                self.article = None;
            }
        }
        self.loading = false;
    }

    /// Loaded, but nothing to show.
    pub fn not_found(&self) -> bool {
        !self.loading && self.article.is_none()
    }
}
