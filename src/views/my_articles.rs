//! The signed-in author's own articles, with delete.

use super::Notice;
use crate::api::ArticleApi;
use crate::models::Article;

#[derive(Debug, Default)]
pub struct MyArticlesView {
    pub articles: Vec<Article>,
    pub loading: bool,
}

impl MyArticlesView {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            loading: true,
        }
    }

    pub async fn load<A: ArticleApi + ?Sized>(&mut self, api: &A) {
        match api.list_mine().await {
            Ok(articles) => self.articles = articles,
            Err(e) => tracing::error!("Error fetching articles: {}", e),
        }
        self.loading = false;
    }

    /// Delete after the user confirmed. The article leaves the list only once
    /// the server has accepted the delete; on failure the list is untouched.
    /// Returns None when the user backed out.
    pub async fn delete<A: ArticleApi + ?Sized>(
        &mut self,
        api: &A,
        id: i64,
        confirmed: bool,
    ) -> Option<Notice> {
        if !confirmed {
            return None;
        }

        match api.delete(id).await {
            Ok(()) => {
                self.articles.retain(|a| a.id != id);
                Some(Notice::success("Article deleted successfully!"))
            }
            Err(e) => {
                tracing::warn!("delete of article {} failed: {}", id, e);
                Some(Notice::error("Failed to delete article"))
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
