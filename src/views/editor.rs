//! Create/edit form for an article, including the AI writing aids.

use super::{Notice, Outcome};
use crate::api::{AiApi, ArticleApi};
use crate::display::strip_markup;
use crate::error::ValidationError;
use crate::guard::Route;
use crate::models::{AiAction, Article, ArticleDraft, Category};

pub const TITLE_MAX_CHARS: usize = 200;

/// Editable fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    pub category: Option<Category>,
    pub tags: String,
    pub summary: String,
}

impl ArticleForm {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
            category: Some(article.category),
            tags: article.tags.clone().unwrap_or_default(),
            summary: article.summary.clone().unwrap_or_default(),
        }
    }

    /// Check required fields and limits, producing the body to send.
    pub fn validate(&self) -> Result<ArticleDraft, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Required("Title"));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: "Title",
                max: TITLE_MAX_CHARS,
            });
        }
        let category = self.category.ok_or(ValidationError::Required("Category"))?;
        if strip_markup(&self.content).trim().is_empty() {
            return Err(ValidationError::Required("Content"));
        }

        Ok(ArticleDraft {
            title: title.to_string(),
            content: self.content.clone(),
            category,
            tags: self.tags.trim().to_string(),
            summary: self.summary.trim().to_string(),
        })
    }

    /// Put an AI suggestion into the one field its action targets.
    pub fn apply_suggestion(&mut self, action: AiAction, suggestion: String) {
        match action {
            AiAction::Improve => self.content = suggestion,
            AiAction::Summarize => self.summary = suggestion,
            AiAction::SuggestTags => self.tags = suggestion,
            AiAction::SuggestTitle => self.title = suggestion,
        }
    }
}

/// Editor state. `id` is set when editing an existing article.
#[derive(Debug, Default)]
pub struct ArticleEditor {
    pub id: Option<i64>,
    pub form: ArticleForm,
    pub saving: bool,
    pub ai_busy: bool,
    pub error: Option<String>,
}

impl ArticleEditor {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Pull the existing article into the form (edit mode only).
    pub async fn load<A: ArticleApi + ?Sized>(&mut self, api: &A) {
        let Some(id) = self.id else {
            return;
        };
        match api.get_public(id).await {
            Ok(article) => {
                self.form = ArticleForm::from_article(&article);
                self.error = None;
            }
            Err(e) => {
                tracing::error!("Error loading article {} for edit: {}", id, e);
                self.error = Some("Failed to load article".to_string());
            }
        }
    }

    /// Validate, then create or update. On success the caller should move on
    /// to the author's article list.
    pub async fn submit<A: ArticleApi + ?Sized>(&mut self, api: &A) -> Outcome {
        self.error = None;
        let draft = match self.form.validate() {
            Ok(draft) => draft,
            Err(e) => return Outcome::stay(Notice::error(e.to_string())),
        };

        self.saving = true;
        let result = match self.id {
            Some(id) => api.update(id, &draft).await.map(|_| "Article updated successfully!"),
            None => api.create(&draft).await.map(|_| "Article created successfully!"),
        };
        self.saving = false;

        match result {
            Ok(msg) => Outcome::go(Notice::success(msg), Route::MyArticles),
            Err(e) => Outcome::stay(Notice::error(e.user_message("Failed to save article"))),
        }
    }

    /// Ask the AI service for help and apply the answer to the form.
    /// Empty content is refused locally without calling the service.
    pub async fn assist<A: AiApi + ?Sized>(&mut self, api: &A, action: AiAction) -> Notice {
        if self.form.content.is_empty() {
            return Notice::warning("Please write some content first");
        }

        self.ai_busy = true;
        let title = Some(self.form.title.as_str());
        let result = api.assist(&self.form.content, action, title).await;
        self.ai_busy = false;

        match result {
            Ok(suggestion) => {
                self.form.apply_suggestion(action, suggestion);
                Notice::success("AI assistance applied!")
            }
            Err(e) => {
                tracing::warn!("AI assist {} failed: {}", action, e);
                Notice::error("AI assistance failed. Please try again.")
            }
        }
    }
}
