//! Client-side filtering and pagination over a fully fetched article
//! collection.

use crate::models::{Article, ArticleQuery, Page};

/// Keeps the articles matching `keyword` (case-insensitive substring over
/// title, content, summary and tag names). A missing or blank keyword keeps
/// everything.
pub fn keyword_filter<'a>(articles: &'a [Article], keyword: Option<&str>) -> Vec<&'a Article> {
    match normalized_keyword(keyword) {
        Some(needle) => articles
            .iter()
            .filter(|article| article.matches_keyword(&needle))
            .collect(),
        None => articles.iter().collect(),
    }
}

fn normalized_keyword(keyword: Option<&str>) -> Option<String> {
    keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase)
}

/// Applies keyword, status and category filters in that order, then slices
/// out the requested page.
///
/// The input is never modified and relative order is preserved. A page below
/// 1 is treated as page 1; a page past the end yields an empty list.
pub fn query_articles(articles: &[Article], query: &ArticleQuery) -> Page<Article> {
    let filter = &query.filter;
    let category = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let matching: Vec<&Article> = keyword_filter(articles, filter.keyword.as_deref())
        .into_iter()
        .filter(|article| filter.status.map_or(true, |status| article.status == status))
        .filter(|article| category.map_or(true, |category| article.category == category))
        .collect();

    let total = matching.len();
    let page = query.page.max(1);
    let start = (page - 1).saturating_mul(query.page_size);
    let list = matching
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .cloned()
        .collect();

    log::debug!(
        "Article query page {} (size {}) matched {} of {}",
        page,
        query.page_size,
        total,
        articles.len()
    );

    Page {
        list,
        total,
        page,
        page_size: query.page_size,
    }
}
