//! Formatting helpers for printing articles.

use crate::models::Article;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

pub const PREVIEW_CHARS: usize = 150;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// "Jan 5, 2025"
pub fn format_date_short(dt: &NaiveDateTime) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// "January 5, 2025 at 03:04 PM"
pub fn format_date_long(dt: &NaiveDateTime) -> String {
    dt.format("%B %-d, %Y at %I:%M %p").to_string()
}

pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

/// Summary if the author wrote one, otherwise the opening of the content.
/// With `strip` set, markup tags are removed from the excerpt.
pub fn preview(article: &Article, strip: bool) -> String {
    if let Some(summary) = article.summary.as_deref().filter(|s| !s.is_empty()) {
        return summary.to_string();
    }

    let excerpt: String = article.content.chars().take(PREVIEW_CHARS).collect();
    let excerpt = if strip { strip_markup(&excerpt) } else { excerpt };
    format!("{}...", excerpt)
}

pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// One-line listing used by `list`, `search` and `mine`.
pub fn article_line(article: &Article) -> String {
    format!(
        "#{:<5} [{}] {} (by {}, {})",
        article.id,
        article.category,
        article.title,
        article.author_name,
        format_date_short(&article.created_at)
    )
}

/// Full card for `show`.
pub fn article_detail(article: &Article) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{}] {}\n", article.category, article.title));
    out.push_str(&format!(
        "By {} | Published on {}",
        article.author_name,
        format_date_long(&article.created_at)
    ));
    if article.was_updated() {
        out.push_str(&format!(
            " | Updated on {}",
            format_date_long(&article.updated_at)
        ));
    }
    out.push('\n');

    let tags = article.tag_list();
    if !tags.is_empty() {
        let tags: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
        out.push_str(&tags.join(" "));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&article.content);
    out
}
